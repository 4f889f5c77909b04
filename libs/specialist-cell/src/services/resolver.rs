// libs/specialist-cell/src/services/resolver.rs
use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_store::DirectoryStore;

use crate::models::{ResolveError, ServiceMatch};

/// Maps a free-text service name to a qualified, active specialist and the
/// treatment definition that drives the appointment duration.
///
/// Matching runs through an ordered list of strategies, first match wins:
/// an exact treatment-name match, then a specialty-name fallback. Within a
/// strategy the store returns candidates ordered by ascending id and the
/// first qualifying pair is picked, so repeated calls resolve the same way.
pub struct SpecialistResolver {
    store: Arc<dyn DirectoryStore>,
}

impl SpecialistResolver {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, service_name: &str) -> Result<ServiceMatch, ResolveError> {
        debug!("Resolving specialist for service: {}", service_name);

        if let Some(found) = self.match_by_treatment_name(service_name).await? {
            info!(
                "Resolved service '{}' to specialist {} via treatment match",
                service_name, found.specialist.id
            );
            return Ok(found);
        }

        if let Some(found) = self.match_by_specialty_name(service_name).await? {
            info!(
                "Resolved service '{}' to specialist {} via specialty fallback",
                service_name, found.specialist.id
            );
            return Ok(found);
        }

        warn!("No specialist found for service: {}", service_name);
        Err(ResolveError::ServiceNotFound(service_name.to_string()))
    }

    /// Strategy 1: an active treatment named exactly like the service, plus
    /// the first active specialist in that treatment's specialty.
    async fn match_by_treatment_name(
        &self,
        service_name: &str,
    ) -> Result<Option<ServiceMatch>, ResolveError> {
        let treatment = match self.store.active_treatment_by_name(service_name).await? {
            Some(treatment) => treatment,
            None => return Ok(None),
        };

        let specialists = self
            .store
            .active_specialists_in_specialty(treatment.specialty_id)
            .await?;

        Ok(specialists
            .into_iter()
            .next()
            .map(|specialist| ServiceMatch { specialist, treatment }))
    }

    /// Strategy 2: the service names a specialty instead of a treatment;
    /// pick the first active treatment and specialist under it.
    async fn match_by_specialty_name(
        &self,
        service_name: &str,
    ) -> Result<Option<ServiceMatch>, ResolveError> {
        let specialty = match self.store.specialty_by_name(service_name).await? {
            Some(specialty) => specialty,
            None => return Ok(None),
        };

        let treatment = self
            .store
            .active_treatments_in_specialty(specialty.id)
            .await?
            .into_iter()
            .next();
        let specialist = self
            .store
            .active_specialists_in_specialty(specialty.id)
            .await?
            .into_iter()
            .next();

        match (specialist, treatment) {
            (Some(specialist), Some(treatment)) => {
                Ok(Some(ServiceMatch { specialist, treatment }))
            }
            _ => Ok(None),
        }
    }
}

use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub backend_url: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                warn!("JWT_SECRET not set, using empty value");
                String::new()
            }),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            mail_api_url: env::var("MAIL_API_URL").unwrap_or_else(|_| {
                warn!("MAIL_API_URL not set, outbound email disabled");
                String::new()
            }),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@clinicawenka.com".to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn is_mailer_configured(&self) -> bool {
        !self.mail_api_url.is_empty() && !self.mail_api_key.is_empty()
    }
}

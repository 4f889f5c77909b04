use tracing::warn;

use crate::models::BookingEmailContext;
use crate::services::mailer::Notifier;
use crate::services::templates;

/// Sends the post-booking emails: confirmation to the patient, notification
/// with the confirm link to the specialist. Best effort, one attempt per
/// recipient; a failed send is logged and never reaches the booking caller.
pub async fn dispatch_booking_emails(
    notifier: &dyn Notifier,
    ctx: &BookingEmailContext,
    confirm_url: &str,
) {
    let (subject, body) = templates::patient_confirmation(ctx);
    if let Err(e) = notifier.send(&ctx.patient_email, &subject, &body).await {
        warn!(
            "Failed to send confirmation email to patient {}: {}",
            ctx.patient_email, e
        );
    }

    let (subject, body) = templates::specialist_notification(ctx, confirm_url);
    if let Err(e) = notifier.send(&ctx.specialist_email, &subject, &body).await {
        warn!(
            "Failed to send notification email to specialist {}: {}",
            ctx.specialist_email, e
        );
    }
}

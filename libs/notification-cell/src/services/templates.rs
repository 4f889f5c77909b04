use shared_models::records::AppointmentStatus;

use crate::models::BookingEmailContext;

/// Display label for a status inside an email body.
fn status_label(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "Programada",
        AppointmentStatus::Confirmed => "Confirmada",
        AppointmentStatus::Cancelled => "Cancelada",
        AppointmentStatus::Completed => "Completada",
    }
}

fn detail_row(label: &str, value: &str) -> String {
    format!(
        r#"<tr><td style="padding:8px 16px;font-weight:600;color:#1e40af;">{}</td><td style="padding:8px 16px;color:#1e3a5f;">{}</td></tr>"#,
        label, value
    )
}

/// Confirmation email sent to the patient after a successful booking.
pub fn patient_confirmation(ctx: &BookingEmailContext) -> (String, String) {
    let subject = "Cita Confirmada - Clínica Wenka".to_string();

    let body = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family:Arial,sans-serif;background:#e0f2fe;padding:24px;">
  <div style="max-width:600px;margin:0 auto;background:#ffffff;border-radius:12px;overflow:hidden;">
    <div style="background:#1e3a8a;color:#ffffff;padding:32px;text-align:center;">
      <h1 style="margin:0;">Cita Agendada</h1>
      <p style="margin:8px 0 0;">Tu cita ha sido registrada exitosamente</p>
    </div>
    <div style="padding:32px;">
      <p>Estimado(a) <strong>{patient}</strong>,</p>
      <p>Nos complace confirmar que tu cita en Clínica Wenka ha sido registrada.
         A continuación los detalles de tu próxima consulta:</p>
      <table style="width:100%;border-collapse:collapse;background:#f0f9ff;border-radius:8px;">
        {service_row}
        {date_row}
        {time_row}
        {specialist_row}
        {status_row}
      </table>
      <p style="color:#78350f;background:#fef3c7;padding:16px;border-radius:8px;">
        Por favor llega 10 minutos antes de tu cita y trae tu identificación oficial.
        Si necesitas cancelar, hazlo con 24 horas de anticipación.
      </p>
    </div>
    <div style="background:#f8fafc;padding:24px;text-align:center;color:#64748b;">
      <strong style="color:#1e3a8a;">Clínica Wenka</strong><br>
      Tu salud es nuestra prioridad<br>
      <small>Este es un mensaje automático, por favor no respondas a este correo.</small>
    </div>
  </div>
</body>
</html>"#,
        patient = ctx.patient_name,
        service_row = detail_row("Servicio", &ctx.treatment),
        date_row = detail_row("Fecha", &ctx.date),
        time_row = detail_row("Hora", &ctx.time),
        specialist_row = detail_row("Especialista", &ctx.specialist_name),
        status_row = detail_row("Estado", status_label(ctx.status)),
    );

    (subject, body)
}

/// Notification sent to the specialist, carrying the one-click confirm link.
pub fn specialist_notification(ctx: &BookingEmailContext, confirm_url: &str) -> (String, String) {
    let subject = "Nueva Cita Agendada - Clínica Wenka".to_string();

    let body = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family:Arial,sans-serif;background:#e0f2fe;padding:24px;">
  <div style="max-width:600px;margin:0 auto;background:#ffffff;border-radius:12px;overflow:hidden;">
    <div style="background:#1e3a8a;color:#ffffff;padding:32px;text-align:center;">
      <h1 style="margin:0;">Nueva Cita Agendada</h1>
      <p style="margin:8px 0 0;">Requiere tu confirmación</p>
    </div>
    <div style="padding:32px;">
      <p>Dr(a). <strong>{specialist}</strong>,</p>
      <p>Se ha registrado una nueva cita en el sistema que requiere tu confirmación.
         A continuación los detalles de la consulta:</p>
      <table style="width:100%;border-collapse:collapse;background:#f0f9ff;border-radius:8px;">
        {patient_row}
        {phone_row}
        {service_row}
        {date_row}
        {time_row}
        {reason_row}
      </table>
      <p style="text-align:center;margin:32px 0;">
        <a href="{confirm_url}"
           style="background:#2563eb;color:#ffffff;padding:14px 40px;border-radius:24px;text-decoration:none;font-weight:600;">
          Confirmar Cita
        </a>
      </p>
      <p style="color:#78350f;background:#fef3c7;padding:16px;border-radius:8px;">
        Si no puedes atender esta cita, por favor notifica al paciente lo antes
        posible para reagendar.
      </p>
    </div>
    <div style="background:#f8fafc;padding:24px;text-align:center;color:#64748b;">
      <strong style="color:#1e3a8a;">Clínica Wenka</strong><br>
      Sistema de Gestión de Citas<br>
      <small>Este es un mensaje automático del sistema.</small>
    </div>
  </div>
</body>
</html>"#,
        specialist = ctx.specialist_name,
        patient_row = detail_row("Paciente", &ctx.patient_name),
        phone_row = detail_row("Teléfono", &ctx.patient_phone),
        service_row = detail_row("Servicio", &ctx.treatment),
        date_row = detail_row("Fecha", &ctx.date),
        time_row = detail_row("Hora", &ctx.time),
        reason_row = detail_row("Motivo", &ctx.reason),
        confirm_url = confirm_url,
    );

    (subject, body)
}

pub mod dispatch;
pub mod mailer;
pub mod templates;

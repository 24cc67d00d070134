//! Email service.
//!
//! Mail delivery is best-effort throughout the platform: a failed send
//! degrades to a logged warning and never fails the primary operation.

use agora_common::{config::EmailConfig, AppError, AppResult};
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Email service backed by async SMTP.
#[derive(Clone)]
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailService {
    /// Create a new email service from configuration.
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Upstream(format!("SMTP configuration invalid: {e}")))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| AppError::Upstream(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Send a plain-text email.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send email: {e}")))?;

        Ok(())
    }

    /// Send an enrollment confirmation.
    pub async fn send_enrollment_confirmation(
        &self,
        to: &str,
        applicant_name: &str,
        course_name: &str,
    ) -> AppResult<()> {
        let subject = format!("Enrollment received: {course_name}");
        let body = format!(
            "Hi {applicant_name},\n\n\
             We received your enrollment request for \"{course_name}\". \
             We will be in touch once it has been reviewed.\n\n\
             The Agora team"
        );
        self.send(to, &subject, &body).await
    }
}

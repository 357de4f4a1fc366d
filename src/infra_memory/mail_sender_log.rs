use crate::domain_port::*;

/// Mail "delivery" for environments without an outbound relay: the message
/// lands in the log and nowhere else.
pub struct LogMailSender;

#[async_trait::async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "outbound mail (log sink)"
        );
        Ok(())
    }
}

use serde_json::json;
use thiserror::Error;

use crate::config::MailerConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail provider rejected message: {0}")]
    Provider(String),
}

/// Client for an HTTP mail provider. Only plain-text transactional mail is
/// needed here (password reset instructions).
pub struct Mailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_email: String,
    from_name: String,
}

impl Mailer {
    pub fn new(config: &MailerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": { "email": self.from_email, "name": self.from_name },
                "to": [{ "email": to }],
                "subject": subject,
                "text": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Provider(format!("{}: {}", status, body)));
        }
        Ok(())
    }
}

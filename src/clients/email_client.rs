use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::helpers::relay_error::RelayError;
use crate::models::booking_email::NotificationMessage;

/// Send request of a Resend compatible transactional email API.
#[derive(Serialize, Debug)]
struct SendEmailRequest<'a> {
    from: String,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

pub struct EmailClient {
    http_client: Client,
    api_url: String,
    api_key: Option<String>,
    admin_email: Option<String>,
    sender_email: Option<String>,
    sender_name: String,
}

impl EmailClient {
    pub fn new(http_client: Client, config: &Config) -> Self {
        Self {
            http_client,
            api_url: config.email_api_url.trim_end_matches('/').to_string(),
            api_key: config.email_api_key.clone(),
            admin_email: config.admin_email.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        }
    }

    /// Sends the message to the administrator, once.
    pub async fn send_to_admin(&self, message: &NotificationMessage) -> Result<(), RelayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RelayError::MissingConfig("EMAIL_API_KEY"))?;
        let admin_email = self
            .admin_email
            .as_deref()
            .ok_or(RelayError::MissingConfig("ADMIN_EMAIL"))?;
        let sender_email = self
            .sender_email
            .as_deref()
            .ok_or(RelayError::MissingConfig("SENDER_EMAIL"))?;

        let url = format!("{}/emails", self.api_url);
        let request = SendEmailRequest {
            from: format!("{} <{}>", self.sender_name, sender_email),
            to: vec![admin_email],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .http_client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|source| RelayError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamRejected { url, status, body });
        }

        info!("Booking notification sent to {}", admin_email);
        Ok(())
    }
}

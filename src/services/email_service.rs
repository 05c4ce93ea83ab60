use reqwest::Client;
use serde::Serialize;

use crate::config::Config;

#[derive(Serialize)]
struct MailpitContact {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
}

#[derive(Serialize)]
struct MailpitPayload {
    #[serde(rename = "From")]
    from: MailpitContact,
    #[serde(rename = "To")]
    to: Vec<MailpitContact>,
    #[serde(rename = "Subject")]
    subject: String,
    #[serde(rename = "HTML")]
    html: String,
}

#[derive(Serialize)]
struct ApiSender {
    name: String,
    email: String,
}

#[derive(Serialize)]
struct ApiRecipient {
    email: String,
}

#[derive(Serialize)]
struct ApiPayload {
    sender: ApiSender,
    to: Vec<ApiRecipient>,
    subject: String,
    #[serde(rename = "htmlContent")]
    html_content: String,
}

/// Outbound mail. Goes through the transactional mail API when an API key is
/// configured, a local Mailpit instance otherwise.
#[derive(Clone)]
pub struct EmailService {
    client: Client,
    is_production: bool,
    api_key: String,
    from_email: String,
    mailpit_url: String,
}

impl EmailService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            is_production: !config.mail_api_key.is_empty(),
            api_key: config.mail_api_key.clone(),
            from_email: config.smtp_from.clone(),
            mailpit_url: "http://localhost:8025/api/v1/send".to_string(),
        }
    }

    pub async fn send(&self, to_email: &str, subject: &str, html: &str) -> Result<(), String> {
        if self.is_production {
            let payload = ApiPayload {
                sender: ApiSender {
                    name: "Inkpress".to_string(),
                    email: self.from_email.clone(),
                },
                to: vec![ApiRecipient {
                    email: to_email.to_string(),
                }],
                subject: subject.to_string(),
                html_content: html.to_string(),
            };

            let res = self
                .client
                .post("https://api.brevo.com/v3/smtp/email")
                .header("api-key", &self.api_key)
                .json(&payload)
                .send()
                .await
                .map_err(|e| e.to_string())?;

            if !res.status().is_success() {
                return Err(format!("mail API returned {}", res.status()));
            }
        } else {
            let payload = MailpitPayload {
                from: MailpitContact {
                    name: "Inkpress".to_string(),
                    email: self.from_email.clone(),
                },
                to: vec![MailpitContact {
                    name: to_email.to_string(),
                    email: to_email.to_string(),
                }],
                subject: subject.to_string(),
                html: html.to_string(),
            };

            self.client
                .post(&self.mailpit_url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    pub async fn send_welcome(&self, to_email: &str, username: &str) -> Result<(), String> {
        let html = format!(
            "<h1>Welcome, {username}!</h1>\
             <p>Your account has been created. You can now log in and start writing.</p>"
        );
        self.send(to_email, "Welcome to Inkpress", &html).await
    }
}

//! Outgoing mail for contact form submissions.
use async_trait::async_trait;
use log::info;

use crate::contact::ContactPayload;
use crate::errors::MailError;

/// A contact submission shaped for delivery.
///
/// Optional form fields are normalized here, so every [`Mailer`] sees the same
/// placeholder text for a missing company or budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub company: String,
    pub budget: String,
    pub locale: String,
    pub message: String,
}

impl ContactMessage {
    pub fn from_payload(payload: &ContactPayload) -> Self {
        Self {
            name: payload.name.clone(),
            email: payload.email.clone(),
            company: if payload.company.is_empty() {
                "N/A".to_string()
            } else {
                payload.company.clone()
            },
            budget: if payload.budget.is_empty() {
                "Not specified".to_string()
            } else {
                payload.budget.clone()
            },
            locale: payload.locale.clone(),
            message: payload.message.clone(),
        }
    }

    pub fn subject(&self) -> String {
        format!("New Contact Form Submission from {}", self.name)
    }

    /// Plain-text body, one labelled line per field with the message at the end.
    pub fn body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nCompany: {}\nBudget: {}\nLanguage: {}\n\nMessage:\n{}",
            self.name, self.email, self.company, self.budget, self.locale, self.message
        )
    }
}

/// Delivers contact messages to the studio inbox.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Logs submissions instead of sending them.
///
/// Stands in until a transactional mail provider is wired up; the log line
/// carries everything needed to follow up by hand.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), MailError> {
        info!(
            "Contact form submission: name={} email={} company={} budget={} locale={} message_length={}",
            message.name,
            message.email,
            message.company,
            message.budget,
            message.locale,
            message.message.chars().count(),
        );
        Ok(())
    }
}

//! Contact form payloads and validation.
//!
//! The form posts JSON to `/api/contact`. Validation mirrors the client-side
//! checks field by field, so the API can return the same messages the form shows.
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shortest accepted message body, in characters, after trimming.
pub const MIN_MESSAGE_CHARS: usize = 20;
/// Longest accepted message body, in characters. The form caps its textarea at
/// the same value.
pub const MAX_MESSAGE_CHARS: usize = 2000;

// Intentionally loose: one @, at least one dot after it, no whitespace.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A contact form submission, as posted by the site.
///
/// Every field defaults to empty so a sparse body deserializes fine and fails
/// validation instead of failing to parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub company: String,
    pub budget: String,
    pub message: String,
    /// Locale the form was submitted from. Display metadata only, passed along
    /// to the outgoing message untouched.
    pub locale: String,
    /// Honeypot. The form hides this field, so a human never fills it.
    pub website: String,
}

/// A single failed validation check, addressed to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ContactPayload {
    /// Checks every field and returns all failures at once, in form order.
    ///
    /// An empty vector means the payload is acceptable.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "Name is required",
            });
        }

        if self.email.trim().is_empty() {
            errors.push(FieldError {
                field: "email",
                message: "Email is required",
            });
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "Please enter a valid email",
            });
        }

        let message = self.message.trim();
        if message.is_empty() {
            errors.push(FieldError {
                field: "message",
                message: "Message is required",
            });
        } else {
            let chars = message.chars().count();
            if chars < MIN_MESSAGE_CHARS {
                errors.push(FieldError {
                    field: "message",
                    message: "Message must be at least 20 characters",
                });
            } else if chars > MAX_MESSAGE_CHARS {
                errors.push(FieldError {
                    field: "message",
                    message: "Message must be at most 2000 characters",
                });
            }
        }

        errors
    }

    /// Whether the honeypot field was filled in.
    pub fn is_spam(&self) -> bool {
        !self.website.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> ContactPayload {
        ContactPayload {
            name: "Mina Petrović".to_string(),
            email: "mina@example.com".to_string(),
            company: "Studio Mina".to_string(),
            budget: "10k-25k".to_string(),
            message: "We are looking for a partner for our next campaign.".to_string(),
            locale: "sr".to_string(),
            website: String::new(),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(valid_payload().validate().is_empty());
    }

    #[test]
    fn test_empty_payload_reports_required_fields() {
        let errors = ContactPayload::default().validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["name", "email", "message"]);
        assert!(errors.iter().all(|e| e.message.ends_with("is required")));
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        for email in ["plainaddress", "missing@dot", "two words@example.com", "@example.com"] {
            let payload = ContactPayload {
                email: email.to_string(),
                ..valid_payload()
            };
            let errors = payload.validate();
            assert_eq!(errors.len(), 1, "email {email:?} should fail");
            assert_eq!(errors[0].message, "Please enter a valid email");
        }
    }

    #[test]
    fn test_message_length_bounds() {
        let too_short = ContactPayload {
            message: "Call me back please".to_string(), // 19 chars
            ..valid_payload()
        };
        assert_eq!(
            too_short.validate()[0].message,
            "Message must be at least 20 characters"
        );

        let at_minimum = ContactPayload {
            message: "Call me back please!".to_string(), // 20 chars
            ..valid_payload()
        };
        assert!(at_minimum.validate().is_empty());

        let too_long = ContactPayload {
            message: "x".repeat(MAX_MESSAGE_CHARS + 1),
            ..valid_payload()
        };
        assert_eq!(
            too_long.validate()[0].message,
            "Message must be at most 2000 characters"
        );
    }

    #[test]
    fn test_message_length_counts_characters_not_bytes() {
        // 20 Cyrillic characters are 40 bytes but must pass the minimum.
        let payload = ContactPayload {
            message: "ш".repeat(MIN_MESSAGE_CHARS),
            ..valid_payload()
        };
        assert!(payload.validate().is_empty());
    }

    #[test]
    fn test_whitespace_only_message_is_required() {
        let payload = ContactPayload {
            message: "   \n\t  ".to_string(),
            ..valid_payload()
        };
        assert_eq!(payload.validate()[0].message, "Message is required");
    }

    #[test]
    fn test_honeypot() {
        assert!(!valid_payload().is_spam());

        let bot = ContactPayload {
            website: "https://spam.example".to_string(),
            ..valid_payload()
        };
        assert!(bot.is_spam());
    }
}

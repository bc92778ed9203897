#![doc = include_str!("../README.md")]

pub mod contact;
pub mod content;
pub mod errors;
pub mod locale;
pub mod mailer;
pub mod rate_limit;

// Exports for the server and for tests
pub use contact::{ContactPayload, FieldError};
pub use content::{ContentStore, Post, Project};
pub use locale::Locale;
pub use mailer::{ContactMessage, LogMailer, Mailer};
pub use rate_limit::RateLimiter;

//! Locales the site is published in.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::UnknownLocale;

/// A locale served by the site.
///
/// Content lives under one directory per locale (`content/en/`, `content/sr/`) and
/// API routes carry the locale as their first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English, the default locale.
    #[default]
    En,
    /// Serbian.
    Sr,
}

impl Locale {
    /// Every locale the site serves.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Sr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Sr => "sr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    // Locales are matched exactly as they appear in URLs, all lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "sr" => Ok(Locale::Sr),
            _ => Err(UnknownLocale {
                locale: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_roundtrip() {
        for locale in Locale::ALL {
            assert_eq!(locale.as_str().parse::<Locale>().unwrap(), locale);
        }
    }

    #[test]
    fn test_unknown_locale() {
        assert!("de".parse::<Locale>().is_err());
        assert!("EN".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Locale::default(), Locale::En);
    }
}

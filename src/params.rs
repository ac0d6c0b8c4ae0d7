//! Generation parameters and their validation.

use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;

pub const MIN_PASSWORD_LENGTH: u32 = 8;
pub const MAX_PASSWORD_LENGTH: u32 = 32;
pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 10;
pub const MIN_WORDS: u32 = 2;
pub const MAX_WORDS: u32 = 8;

/// Parameters of a password generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParameters {
    pub length: u32,
    pub count: u32,
    pub include_upper: bool,
    pub include_lower: bool,
    pub include_digits: bool,
    pub include_symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            length: 16,
            count: 5,
            include_upper: true,
            include_lower: true,
            include_digits: true,
            include_symbols: true,
            exclude_ambiguous: false,
        }
    }
}

/// Word separator of a passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Separator {
    #[default]
    #[serde(rename = "-")]
    Hyphen,
    #[serde(rename = "_")]
    Underscore,
    #[serde(rename = " ")]
    Space,
    #[serde(rename = ".")]
    Dot,
}

impl Separator {
    pub const ALL: [Separator; 4] = [
        Separator::Hyphen,
        Separator::Underscore,
        Separator::Space,
        Separator::Dot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Hyphen => "-",
            Separator::Underscore => "_",
            Separator::Space => " ",
            Separator::Dot => ".",
        }
    }

    /// Parses one of `-`, `_`, ` `, `.`.
    pub fn from_symbol(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a passphrase generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassphraseParameters {
    pub num_words: u32,
    pub separator: Separator,
    pub count: u32,
}

impl Default for PassphraseParameters {
    fn default() -> Self {
        Self {
            num_words: 4,
            separator: Separator::Hyphen,
            count: 5,
        }
    }
}

/// Parameters a generation session can dispatch.
pub trait GenerationRequest: Clone {
    /// Checks ranges and invariants before the request may leave the client.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl GenerationRequest for GenerationParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        check_range(self.length, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH, |value, min, max| {
            ValidationError::LengthOutOfRange { value, min, max }
        })?;
        check_count(self.count)?;

        let any_class =
            self.include_upper || self.include_lower || self.include_digits || self.include_symbols;
        if !any_class {
            return Err(ValidationError::NoCharacterClass);
        }
        Ok(())
    }
}

impl GenerationRequest for PassphraseParameters {
    fn validate(&self) -> Result<(), ValidationError> {
        check_range(self.num_words, MIN_WORDS, MAX_WORDS, |value, min, max| {
            ValidationError::WordCountOutOfRange { value, min, max }
        })?;
        check_count(self.count)
    }
}

fn check_count(count: u32) -> Result<(), ValidationError> {
    check_range(count, MIN_COUNT, MAX_COUNT, |value, min, max| {
        ValidationError::CountOutOfRange { value, min, max }
    })
}

fn check_range(
    value: u32,
    min: u32,
    max: u32,
    err: impl FnOnce(u32, u32, u32) -> ValidationError,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(err(value, min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GenerationParameters::default().validate(), Ok(()));
        assert_eq!(PassphraseParameters::default().validate(), Ok(()));
    }

    #[test]
    fn test_all_classes_disabled() {
        let params = GenerationParameters {
            include_upper: false,
            include_lower: false,
            include_digits: false,
            include_symbols: false,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ValidationError::NoCharacterClass));
    }

    #[test]
    fn test_single_class_is_enough() {
        let params = GenerationParameters {
            include_upper: false,
            include_lower: false,
            include_digits: true,
            include_symbols: false,
            ..Default::default()
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_length_bounds() {
        for length in [8, 32] {
            let params = GenerationParameters { length, ..Default::default() };
            assert_eq!(params.validate(), Ok(()));
        }
        let params = GenerationParameters { length: 7, ..Default::default() };
        assert_eq!(
            params.validate(),
            Err(ValidationError::LengthOutOfRange { value: 7, min: 8, max: 32 })
        );
        let params = GenerationParameters { length: 33, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_count_bounds() {
        let params = GenerationParameters { count: 0, ..Default::default() };
        assert!(matches!(params.validate(), Err(ValidationError::CountOutOfRange { .. })));
        let params = PassphraseParameters { count: 11, ..Default::default() };
        assert!(matches!(params.validate(), Err(ValidationError::CountOutOfRange { .. })));
    }

    #[test]
    fn test_word_bounds() {
        let params = PassphraseParameters { num_words: 1, ..Default::default() };
        assert_eq!(
            params.validate(),
            Err(ValidationError::WordCountOutOfRange { value: 1, min: 2, max: 8 })
        );
        let params = PassphraseParameters { num_words: 8, ..Default::default() };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_separator_symbols() {
        assert_eq!(Separator::from_symbol("_"), Some(Separator::Underscore));
        assert_eq!(Separator::from_symbol(" "), Some(Separator::Space));
        assert_eq!(Separator::from_symbol("+"), None);
        assert_eq!(serde_json::to_string(&Separator::Dot).unwrap(), "\".\"");
    }
}

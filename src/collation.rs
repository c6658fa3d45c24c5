// Locale-aware ordering of area names, injected into the pipeline

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::Locale;
use icu_provider::DataLocale;
use std::cmp::Ordering;

use crate::error::CollationError;

/// Compares two area names for sorting
pub trait Collation {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// ICU collator at primary strength: case and accent variants of a
/// letter compare equal, locale-specific letters keep their place
/// (in Finnish å, ä and ö come after z).
pub struct LocaleCollator {
    locale: String,
    collator: Collator,
}

impl LocaleCollator {
    pub fn new(locale: &str) -> Result<Self, CollationError> {
        let parsed: Locale = locale.parse().map_err(|e| CollationError {
            locale: locale.to_string(),
            message: format!("{:?}", e),
        })?;

        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Primary);

        let collator = Collator::try_new(&DataLocale::from(&parsed), options).map_err(|e| {
            CollationError {
                locale: locale.to_string(),
                message: format!("{:?}", e),
            }
        })?;

        Ok(LocaleCollator {
            locale: locale.to_string(),
            collator,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl Collation for LocaleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

/// Raw code point order. Only useful to show what locale collation changes.
pub struct CodePointOrder;

impl Collation for CodePointOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

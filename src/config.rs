//! Optional TOML overrides for the factory price book, loaded once at
//! startup. Mainly here because the LV2 default system cost was never
//! confirmed against the pricing guide and has to stay adjustable without a
//! rebuild; the subscription bases and flat add-on costs ride along.
//!
//! ```toml
//! [system_costs]
//! lv2 = 61500
//!
//! [subscription]
//! mp3 = 89.0
//!
//! [flat_addons]
//! solar = 3400
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::{Addon, Family, PriceBook};

#[derive(Debug, Default, Deserialize)]
pub struct BookOverrides {
    #[serde(default)]
    pub system_costs: FamilyValues,
    #[serde(default)]
    pub subscription: FamilyValues,
    #[serde(default)]
    pub flat_addons: FlatAddonValues,
}

#[derive(Debug, Default, Deserialize)]
pub struct FamilyValues {
    pub mp3: Option<f64>,
    pub lv2: Option<f64>,
}

impl FamilyValues {
    fn get(&self, family: Family) -> Option<f64> {
        match family {
            Family::Mp3 => self.mp3,
            Family::Lv2 => self.lv2,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FlatAddonValues {
    pub solar: Option<f64>,
    pub ups: Option<f64>,
}

pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<BookOverrides, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

impl BookOverrides {
    /// Patch the given book in place; unset fields leave the factory value.
    pub fn apply(&self, book: &mut PriceBook) {
        for family in Family::ALL {
            if let Some(cost) = self.system_costs.get(family) {
                info!(family = family.label(), cost, "overriding default system cost");
                book.set_system_cost_default(family, cost);
            }
            if let Some(base) = self.subscription.get(family) {
                info!(family = family.label(), base, "overriding subscription base");
                book.set_subscription_base(family, base);
            }
        }
        if let Some(cost) = self.flat_addons.solar {
            book.set_flat_addon_cost(Addon::Solar, cost);
        }
        if let Some(cost) = self.flat_addons.ups {
            book.set_flat_addon_cost(Addon::Ups, cost);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_overrides() {
        let overrides: BookOverrides = toml::from_str(
            r#"
            [system_costs]
            lv2 = 61500

            [flat_addons]
            solar = 3400
            "#,
        )
        .expect("valid toml");

        assert_eq!(overrides.system_costs.lv2, Some(61_500.0));
        assert_eq!(overrides.system_costs.mp3, None);
        assert_eq!(overrides.flat_addons.solar, Some(3_400.0));
    }

    #[test]
    fn apply_patches_only_the_named_cells() {
        let overrides: BookOverrides = toml::from_str(
            r#"
            [system_costs]
            lv2 = 61500

            [subscription]
            mp3 = 95.0
            "#,
        )
        .expect("valid toml");

        let mut book = PriceBook::default();
        overrides.apply(&mut book);

        assert_eq!(book.system_cost_default(Family::Lv2), 61_500.0);
        assert_eq!(book.system_cost_default(Family::Mp3), 50_000.0);
        assert_eq!(book.subscription_base(Family::Mp3), 95.0);
        assert_eq!(book.subscription_base(Family::Lv2), 109.0);
    }

    #[test]
    fn empty_file_is_a_noop() {
        let overrides: BookOverrides = toml::from_str("").expect("valid toml");
        let mut book = PriceBook::default();
        overrides.apply(&mut book);
        assert_eq!(book, PriceBook::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_overrides("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

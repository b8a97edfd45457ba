//! Pure aggregation of the derived state into quote totals. Recomputing on
//! an unchanged input always yields identical output.

use std::collections::BTreeMap;

use super::entities::{Addon, AddonInput, Family, ResolvedAddon, SizeTier, Vertical};
use super::pricebook::PriceBook;

/// Flat monthly surcharge for high-usage sites.
pub const HIGH_USAGE_SURCHARGE: f64 = 20.0;

/// Discount factor when the subscription is billed annually.
pub const ANNUAL_BILLING_FACTOR: f64 = 0.9;

/// Round to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate totals shown in the summary and the export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuoteTotals {
    pub adders_total: f64,
    pub one_time_total: f64,
    pub ase_annual: f64,
    pub subscription_monthly: f64,
}

/// Sum of the enabled add-on prices. Disabled add-ons resolve to `None` and
/// contribute zero.
pub fn adders_total(resolved: &BTreeMap<Addon, Option<ResolvedAddon>>) -> f64 {
    resolved
        .values()
        .flatten()
        .map(|addon| addon.price)
        .sum()
}

/// Annual service fee: base amount for the system plus one increment per
/// enabled add-on. UPS never contributes.
pub fn ase_annual(
    book: &PriceBook,
    family: Family,
    size: SizeTier,
    inputs: &BTreeMap<Addon, AddonInput>,
) -> f64 {
    let increments: f64 = Addon::ALL
        .into_iter()
        .filter(|addon| {
            addon.counts_toward_ase()
                && inputs.get(addon).is_some_and(|input| input.enabled)
        })
        .map(|addon| book.ase_increment(family, size, addon))
        .sum();
    book.ase_base(family, size) + increments
}

/// Monthly subscription fee. Rounding happens once after the multiplier and
/// surcharge, then a second time after the annual-billing discount.
pub fn subscription_monthly(
    book: &PriceBook,
    family: Family,
    vertical: Vertical,
    high_usage: bool,
    annual_billing: bool,
) -> f64 {
    let surcharge = if high_usage { HIGH_USAGE_SURCHARGE } else { 0.0 };
    let monthly = round2(book.subscription_base(family) * vertical.multiplier() + surcharge);
    if annual_billing {
        round2(monthly * ANNUAL_BILLING_FACTOR)
    } else {
        monthly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::addons::resolve_all;

    fn inputs_with(enabled: &[Addon]) -> BTreeMap<Addon, AddonInput> {
        Addon::ALL
            .into_iter()
            .map(|addon| {
                (
                    addon,
                    AddonInput {
                        enabled: enabled.contains(&addon),
                        size_override: None,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn ase_base_plus_enabled_increments() {
        let book = PriceBook::default();
        let inputs = inputs_with(&[Addon::Foam]);
        // MP3 size M: base 895 + foam increment 119.
        assert_eq!(ase_annual(&book, Family::Mp3, SizeTier::M, &inputs), 1_014.0);
    }

    #[test]
    fn ups_never_contributes_to_ase() {
        let book = PriceBook::default();
        let without = inputs_with(&[Addon::Foam]);
        let with = inputs_with(&[Addon::Foam, Addon::Ups]);
        assert_eq!(
            ase_annual(&book, Family::Mp3, SizeTier::M, &without),
            ase_annual(&book, Family::Mp3, SizeTier::M, &with),
        );

        // ...but it does move the adders total.
        let resolved_without = resolve_all(&without, Family::Mp3, SizeTier::M, &book, 0.5);
        let resolved_with = resolve_all(&with, Family::Mp3, SizeTier::M, &book, 0.5);
        assert!(adders_total(&resolved_with) > adders_total(&resolved_without));
    }

    #[test]
    fn all_disabled_means_zero_adders() {
        let book = PriceBook::default();
        let inputs = inputs_with(&[]);
        let resolved = resolve_all(&inputs, Family::Mp3, SizeTier::M, &book, 0.5);
        assert_eq!(adders_total(&resolved), 0.0);
    }

    #[test]
    fn subscription_annual_billing_rounds_twice() {
        let book = PriceBook::default();
        // MP3 base 89 * 1.0, annual: round2(89.0 * 0.9) = 80.10.
        let monthly =
            subscription_monthly(&book, Family::Mp3, Vertical::Residential, false, true);
        assert_eq!(monthly, 80.10);
    }

    #[test]
    fn subscription_multiplier_and_surcharge() {
        let book = PriceBook::default();
        // 89 * 1.25 + 20 = 131.25.
        let monthly =
            subscription_monthly(&book, Family::Mp3, Vertical::Commercial, true, false);
        assert_eq!(monthly, 131.25);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let book = PriceBook::default();
        let inputs = inputs_with(&[Addon::Foam, Addon::Booster, Addon::Solar]);
        let resolved = resolve_all(&inputs, Family::Lv2, SizeTier::L, &book, 0.45);
        let first = adders_total(&resolved);
        let second = adders_total(&resolved);
        assert_eq!(first, second);
        assert_eq!(
            ase_annual(&book, Family::Lv2, SizeTier::L, &inputs),
            ase_annual(&book, Family::Lv2, SizeTier::L, &inputs),
        );
    }
}

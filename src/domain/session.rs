//! The editing session: owns the price book and every raw input, and keeps
//! the derived triad consistent after each mutation. Single-threaded and
//! synchronous; nothing here persists beyond the session.

use std::collections::BTreeMap;

use tracing::debug;

use super::addons::resolve_all;
use super::entities::{
    Addon, AddonInput, BaseTriad, EditedField, Family, MarginPreset, ResolvedAddon, SizeTier,
    Vertical,
};
use super::pricebook::PriceBook;
use super::reconcile::{clamp_margin, reconcile};
use super::totals::{adders_total, ase_annual, subscription_monthly, QuoteTotals};

const DEFAULT_MARGIN: f64 = 0.50;
const DEFAULT_ADDON_MARGIN: f64 = 0.50;

/// One quoting session. All derived values are recomputed from the current
/// inputs on demand; there is no hidden accumulation.
#[derive(Clone, Debug)]
pub struct QuoteSession {
    pub book: PriceBook,
    pub family: Family,
    pub system_size: SizeTier,
    pub base: BaseTriad,
    pub addon_margin: f64,
    pub addons: BTreeMap<Addon, AddonInput>,
    pub vertical: Vertical,
    pub high_usage: bool,
    pub annual_billing: bool,
    /// Book state restored on a full reset (factory defaults, possibly
    /// patched by the startup configuration).
    baseline: PriceBook,
}

fn default_addons() -> BTreeMap<Addon, AddonInput> {
    Addon::ALL
        .into_iter()
        .map(|addon| {
            (
                addon,
                AddonInput {
                    enabled: addon == Addon::Foam,
                    size_override: None,
                },
            )
        })
        .collect()
}

impl QuoteSession {
    pub fn new(book: PriceBook) -> Self {
        let family = Family::default();
        let base = reconcile(BaseTriad {
            cost: book.system_cost_default(family),
            margin: DEFAULT_MARGIN,
            price: 0.0,
            last_edited: EditedField::Cost,
        });
        Self {
            baseline: book.clone(),
            book,
            family,
            system_size: SizeTier::default(),
            base,
            addon_margin: DEFAULT_ADDON_MARGIN,
            addons: default_addons(),
            vertical: Vertical::default(),
            high_usage: false,
            annual_billing: false,
        }
    }

    fn reconcile_base(&mut self) {
        self.base = reconcile(self.base);
        debug!(
            cost = self.base.cost,
            margin = self.base.margin,
            price = self.base.price,
            "reconciled base triad"
        );
    }

    pub fn set_cost(&mut self, cost: f64) {
        self.base.cost = cost;
        self.base.last_edited = EditedField::Cost;
        self.reconcile_base();
    }

    pub fn set_margin(&mut self, margin: f64) {
        self.base.margin = margin;
        self.base.last_edited = EditedField::Margin;
        self.reconcile_base();
    }

    pub fn set_price(&mut self, price: f64) {
        self.base.price = price;
        self.base.last_edited = EditedField::Price;
        self.reconcile_base();
    }

    /// A preset counts as a margin edit and moves the add-on margin too.
    pub fn apply_preset(&mut self, preset: MarginPreset) {
        debug!(preset = preset.label(), "applying margin preset");
        self.addon_margin = clamp_margin(preset.addon_margin());
        self.set_margin(preset.system_margin());
    }

    pub fn set_addon_margin(&mut self, margin: f64) {
        self.addon_margin = clamp_margin(margin);
    }

    /// Switching family is a partial reset: add-on flags and overrides return
    /// to defaults and the cost snaps to the family default, with the price
    /// re-derived from the existing margin.
    pub fn set_family(&mut self, family: Family) {
        debug!(family = family.label(), "switching family");
        self.family = family;
        self.addons = default_addons();
        self.base.cost = self.book.system_cost_default(family);
        self.base.last_edited = EditedField::Cost;
        self.reconcile_base();
    }

    pub fn set_system_size(&mut self, size: SizeTier) {
        if !SizeTier::SYSTEM.contains(&size) {
            debug!(size = size.label(), "ignoring non-system size tier");
            return;
        }
        self.system_size = size;
    }

    pub fn set_vertical(&mut self, vertical: Vertical) {
        self.vertical = vertical;
    }

    pub fn set_high_usage(&mut self, on: bool) {
        self.high_usage = on;
    }

    pub fn set_annual_billing(&mut self, on: bool) {
        self.annual_billing = on;
    }

    pub fn set_addon_enabled(&mut self, addon: Addon, enabled: bool) {
        self.addons.entry(addon).or_default().enabled = enabled;
    }

    /// Set or clear an add-on's size override. Ignored for the flat add-ons,
    /// and XL is only accepted for foam (no other table carries it).
    pub fn set_addon_size_override(&mut self, addon: Addon, size: Option<SizeTier>) {
        if !addon.is_sized() {
            debug!(addon = addon.key(), "ignoring size override on flat add-on");
            return;
        }
        if size == Some(SizeTier::Xl) && addon != Addon::Foam {
            debug!(addon = addon.key(), "ignoring XL override; foam only");
            return;
        }
        self.addons.entry(addon).or_default().size_override = size;
    }

    /// Full reset: price book back to its baseline, every derived-state field
    /// back to defaults. The selected family is retained and its default cost
    /// reapplied.
    pub fn reset(&mut self) {
        debug!("resetting session to factory defaults");
        let family = self.family;
        *self = Self::new(self.baseline.clone());
        self.set_family(family);
    }

    pub fn addon_input(&self, addon: Addon) -> AddonInput {
        self.addons.get(&addon).copied().unwrap_or_default()
    }

    pub fn resolved_addons(&self) -> BTreeMap<Addon, Option<ResolvedAddon>> {
        resolve_all(
            &self.addons,
            self.family,
            self.system_size,
            &self.book,
            self.addon_margin,
        )
    }

    pub fn totals(&self) -> QuoteTotals {
        let resolved = self.resolved_addons();
        let adders = adders_total(&resolved);
        QuoteTotals {
            adders_total: adders,
            one_time_total: self.base.price + adders,
            ase_annual: ase_annual(&self.book, self.family, self.system_size, &self.addons),
            subscription_monthly: subscription_monthly(
                &self.book,
                self.family,
                self.vertical,
                self.high_usage,
                self.annual_billing,
            ),
        }
    }
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self::new(PriceBook::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_from_family_default_cost() {
        let session = QuoteSession::default();
        assert_eq!(session.base.cost, 50_000.0);
        assert_eq!(session.base.margin, 0.5);
        assert_eq!(session.base.price, 100_000.0);
        assert!(session.addon_input(Addon::Foam).enabled);
        assert!(!session.addon_input(Addon::Ups).enabled);
    }

    #[test]
    fn triad_edits_follow_last_edited() {
        let mut session = QuoteSession::default();
        session.set_cost(6_000.0);
        assert_eq!(session.base.price, 12_000.0);

        session.set_price(12_000.0);
        assert!((session.base.margin - 0.5).abs() < 1e-12);
        assert_eq!(session.base.last_edited, EditedField::Price);
    }

    #[test]
    fn family_switch_is_a_partial_reset() {
        let mut session = QuoteSession::default();
        session.set_addon_enabled(Addon::Booster, true);
        session.set_addon_enabled(Addon::Foam, false);
        session.set_addon_size_override(Addon::Foam, Some(SizeTier::Xl));
        session.set_cost(42_000.0);

        session.set_family(Family::Lv2);

        assert_eq!(session.family, Family::Lv2);
        assert_eq!(session.base.cost, 60_000.0);
        assert_eq!(session.base.last_edited, EditedField::Cost);
        assert!(session.addon_input(Addon::Foam).enabled);
        assert!(!session.addon_input(Addon::Booster).enabled);
        assert_eq!(session.addon_input(Addon::Foam).size_override, None);
        // Price re-derived from the new cost and the surviving margin.
        assert_eq!(session.base.price, 120_000.0);
    }

    #[test]
    fn preset_moves_both_margins() {
        let mut session = QuoteSession::default();
        session.set_addon_margin(0.8);
        session.apply_preset(MarginPreset::Commercial);
        assert!((session.base.margin - 0.40).abs() < 1e-12);
        assert!((session.addon_margin - 0.40).abs() < 1e-12);
        assert_eq!(session.base.last_edited, EditedField::Margin);
    }

    #[test]
    fn addon_margin_entry_is_clamped() {
        let mut session = QuoteSession::default();
        session.set_addon_margin(0.99);
        assert_eq!(session.addon_margin, 0.90);
    }

    #[test]
    fn reset_restores_edited_tables_and_state() {
        let mut session = QuoteSession::default();
        session.book.set_foam_cost(SizeTier::M, 7_777.0);
        session.set_family(Family::Lv2);
        session.set_margin(0.3);
        session.set_vertical(Vertical::Industrial);
        session.set_high_usage(true);

        session.reset();

        assert_eq!(
            session.book.addon_cost(Addon::Foam, Family::Lv2, Some(SizeTier::M)),
            1_200.0
        );
        // Family survives the reset; everything else returns to defaults.
        assert_eq!(session.family, Family::Lv2);
        assert_eq!(session.base.cost, 60_000.0);
        assert_eq!(session.base.margin, 0.5);
        assert_eq!(session.vertical, Vertical::Residential);
        assert!(!session.high_usage);
        assert_eq!(session.base.last_edited, EditedField::Cost);
    }

    #[test]
    fn reset_keeps_a_configured_baseline() {
        let mut book = PriceBook::default();
        book.set_system_cost_default(Family::Lv2, 61_500.0);
        let mut session = QuoteSession::new(book);

        session.book.set_system_cost_default(Family::Lv2, 99_000.0);
        session.reset();

        assert_eq!(session.book.system_cost_default(Family::Lv2), 61_500.0);
    }

    #[test]
    fn xl_override_is_rejected_outside_foam() {
        let mut session = QuoteSession::default();
        session.set_addon_size_override(Addon::Booster, Some(SizeTier::Xl));
        assert_eq!(session.addon_input(Addon::Booster).size_override, None);

        session.set_addon_size_override(Addon::Foam, Some(SizeTier::Xl));
        assert_eq!(
            session.addon_input(Addon::Foam).size_override,
            Some(SizeTier::Xl)
        );
    }

    #[test]
    fn one_time_total_is_base_price_plus_adders() {
        let mut session = QuoteSession::default();
        session.set_addon_enabled(Addon::Foam, false);
        let totals = session.totals();
        assert_eq!(totals.adders_total, 0.0);
        assert_eq!(totals.one_time_total, session.base.price);

        session.set_addon_enabled(Addon::Foam, true);
        let totals = session.totals();
        // Foam M cost 1200 at 50% margin.
        assert_eq!(totals.adders_total, 2_400.0);
        assert_eq!(totals.one_time_total, session.base.price + 2_400.0);
    }
}

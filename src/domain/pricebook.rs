//! Editable reference data: every cost and list-price table the calculator
//! reads from. All tables are plain keyed mappings so point updates and
//! lookups stay uniform.
//!
//! Invariant: every table is fully populated for all reachable
//! (family, size, add-on) combinations at construction, and point updates can
//! only replace existing cells. A missing cell is a programmer error and
//! panics with the offending key.

use std::collections::BTreeMap;
use std::fmt::Debug;

use super::entities::{Addon, Family, SizeTier};

/// The complete, user-editable price book.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceBook {
    /// Default base-system cost per family, applied on family switch and reset.
    system_costs: BTreeMap<Family, f64>,
    /// Foam add-on cost per size. Family-independent; the only table with XL.
    foam_costs: BTreeMap<SizeTier, f64>,
    /// Booster and Pool/Draft costs, keyed by family and size.
    sized_addon_costs: BTreeMap<(Addon, Family, SizeTier), f64>,
    /// Solar and UPS flat costs. Sizeless and family-independent.
    flat_addon_costs: BTreeMap<Addon, f64>,
    /// Annual service base amount per family and system size.
    ase_base: BTreeMap<(Family, SizeTier), f64>,
    /// Annual service increment per enabled add-on. UPS has no row here.
    ase_increments: BTreeMap<(Family, SizeTier, Addon), f64>,
    /// Subscription base monthly list price per family.
    subscription_base: BTreeMap<Family, f64>,
}

fn cell<K: Ord + Debug>(table: &BTreeMap<K, f64>, key: K, name: &str) -> f64 {
    match table.get(&key) {
        Some(value) => *value,
        None => panic!("price book table `{name}` has no cell for {key:?}"),
    }
}

fn update<K: Ord + Debug>(table: &mut BTreeMap<K, f64>, key: K, value: f64, name: &str) {
    match table.get_mut(&key) {
        Some(slot) => *slot = value,
        None => panic!("price book table `{name}` has no cell for {key:?}"),
    }
}

impl Default for PriceBook {
    fn default() -> Self {
        use Addon::{Booster, PoolDraft, Solar, Ups};
        use Family::{Lv2, Mp3};
        use SizeTier::{L, M, S, Xl};

        let system_costs = BTreeMap::from([(Mp3, 50_000.0), (Lv2, 60_000.0)]);

        let foam_costs =
            BTreeMap::from([(S, 900.0), (M, 1_200.0), (L, 1_500.0), (Xl, 1_800.0)]);

        let mut sized_addon_costs = BTreeMap::new();
        for (addon, family, costs) in [
            (Booster, Mp3, [1_500.0, 1_900.0, 2_400.0]),
            (Booster, Lv2, [1_800.0, 2_300.0, 2_900.0]),
            (PoolDraft, Mp3, [1_100.0, 1_400.0, 1_750.0]),
            (PoolDraft, Lv2, [1_300.0, 1_650.0, 2_050.0]),
        ] {
            for (size, cost) in SizeTier::SYSTEM.into_iter().zip(costs) {
                sized_addon_costs.insert((addon, family, size), cost);
            }
        }

        let flat_addon_costs = BTreeMap::from([(Solar, 3_200.0), (Ups, 1_450.0)]);

        let mut ase_base = BTreeMap::new();
        for (family, amounts) in [(Mp3, [795.0, 895.0, 995.0]), (Lv2, [945.0, 1_045.0, 1_145.0])]
        {
            for (size, amount) in SizeTier::SYSTEM.into_iter().zip(amounts) {
                ase_base.insert((family, size), amount);
            }
        }

        let mut ase_increments = BTreeMap::new();
        for (addon, family, amounts) in [
            (Addon::Foam, Mp3, [109.0, 119.0, 129.0]),
            (Addon::Foam, Lv2, [119.0, 129.0, 139.0]),
            (Booster, Mp3, [49.0, 59.0, 69.0]),
            (Booster, Lv2, [59.0, 69.0, 79.0]),
            (PoolDraft, Mp3, [79.0, 89.0, 99.0]),
            (PoolDraft, Lv2, [89.0, 99.0, 109.0]),
            (Solar, Mp3, [39.0, 49.0, 59.0]),
            (Solar, Lv2, [49.0, 59.0, 69.0]),
        ] {
            for (size, amount) in SizeTier::SYSTEM.into_iter().zip(amounts) {
                ase_increments.insert((family, size, addon), amount);
            }
        }

        let subscription_base = BTreeMap::from([(Mp3, 89.0), (Lv2, 109.0)]);

        Self {
            system_costs,
            foam_costs,
            sized_addon_costs,
            flat_addon_costs,
            ase_base,
            ase_increments,
            subscription_base,
        }
    }
}

impl PriceBook {
    pub fn system_cost_default(&self, family: Family) -> f64 {
        cell(&self.system_costs, family, "system_costs")
    }

    pub fn set_system_cost_default(&mut self, family: Family, value: f64) {
        update(&mut self.system_costs, family, value, "system_costs");
    }

    /// Cost of an add-on at its effective size. `size` must be `Some` for the
    /// sized add-ons and `None` for the flat ones.
    pub fn addon_cost(&self, addon: Addon, family: Family, size: Option<SizeTier>) -> f64 {
        match addon {
            Addon::Foam => {
                let size = size.unwrap_or_else(|| panic!("foam lookup without a size"));
                cell(&self.foam_costs, size, "foam_costs")
            }
            Addon::Booster | Addon::PoolDraft => {
                let size = size
                    .unwrap_or_else(|| panic!("{} lookup without a size", addon.key()));
                cell(&self.sized_addon_costs, (addon, family, size), "sized_addon_costs")
            }
            Addon::Solar | Addon::Ups => cell(&self.flat_addon_costs, addon, "flat_addon_costs"),
        }
    }

    pub fn set_foam_cost(&mut self, size: SizeTier, value: f64) {
        update(&mut self.foam_costs, size, value, "foam_costs");
    }

    pub fn set_sized_addon_cost(
        &mut self,
        addon: Addon,
        family: Family,
        size: SizeTier,
        value: f64,
    ) {
        update(
            &mut self.sized_addon_costs,
            (addon, family, size),
            value,
            "sized_addon_costs",
        );
    }

    pub fn set_flat_addon_cost(&mut self, addon: Addon, value: f64) {
        update(&mut self.flat_addon_costs, addon, value, "flat_addon_costs");
    }

    pub fn ase_base(&self, family: Family, size: SizeTier) -> f64 {
        cell(&self.ase_base, (family, size), "ase_base")
    }

    pub fn set_ase_base(&mut self, family: Family, size: SizeTier, value: f64) {
        update(&mut self.ase_base, (family, size), value, "ase_base");
    }

    pub fn ase_increment(&self, family: Family, size: SizeTier, addon: Addon) -> f64 {
        cell(&self.ase_increments, (family, size, addon), "ase_increments")
    }

    pub fn set_ase_increment(&mut self, family: Family, size: SizeTier, addon: Addon, value: f64) {
        update(&mut self.ase_increments, (family, size, addon), value, "ase_increments");
    }

    pub fn subscription_base(&self, family: Family) -> f64 {
        cell(&self.subscription_base, family, "subscription_base")
    }

    pub fn set_subscription_base(&mut self, family: Family, value: f64) {
        update(&mut self.subscription_base, family, value, "subscription_base");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every (family, size, add-on) combination the session can reach must
    /// have a cell; the accessors panic otherwise.
    #[test]
    fn factory_tables_cover_all_reachable_cells() {
        let book = PriceBook::default();
        for family in Family::ALL {
            let _ = book.system_cost_default(family);
            let _ = book.subscription_base(family);
            for size in SizeTier::SYSTEM {
                let _ = book.ase_base(family, size);
                for addon in Addon::ALL {
                    let size_arg = addon.is_sized().then_some(size);
                    let _ = book.addon_cost(addon, family, size_arg);
                    if addon.counts_toward_ase() {
                        let _ = book.ase_increment(family, size, addon);
                    }
                }
            }
        }
        // XL is reachable for foam only.
        let _ = book.addon_cost(Addon::Foam, Family::Mp3, Some(SizeTier::Xl));
    }

    #[test]
    fn point_update_replaces_a_single_cell() {
        let mut book = PriceBook::default();
        book.set_foam_cost(SizeTier::Xl, 2_000.0);
        assert_eq!(book.addon_cost(Addon::Foam, Family::Mp3, Some(SizeTier::Xl)), 2_000.0);
        // Neighbouring cells are untouched.
        assert_eq!(book.addon_cost(Addon::Foam, Family::Mp3, Some(SizeTier::L)), 1_500.0);
    }

    #[test]
    fn family_defaults_match_the_pricing_guide() {
        let book = PriceBook::default();
        assert_eq!(book.system_cost_default(Family::Mp3), 50_000.0);
        assert_eq!(book.system_cost_default(Family::Lv2), 60_000.0);
    }

    #[test]
    #[should_panic(expected = "ase_increments")]
    fn ups_has_no_ase_increment_row() {
        let book = PriceBook::default();
        let _ = book.ase_increment(Family::Mp3, SizeTier::M, Addon::Ups);
    }
}

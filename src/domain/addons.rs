//! Resolves each optional add-on to an effective size, a table cost, and a
//! derived price. Pure reads against the price book; the shared add-on margin
//! drives the cost→price conversion.

use std::collections::BTreeMap;

use super::entities::{Addon, AddonInput, Family, ResolvedAddon, SizeTier};
use super::pricebook::PriceBook;
use super::reconcile::price_from_cost;

/// Resolve one add-on. Returns `None` when disabled: a disabled add-on
/// contributes nothing to any sum and is excluded from the annual service fee.
pub fn resolve(
    addon: Addon,
    input: AddonInput,
    family: Family,
    system_size: SizeTier,
    book: &PriceBook,
    addon_margin: f64,
) -> Option<ResolvedAddon> {
    if !input.enabled {
        return None;
    }

    // The override is advisory metadata: it only changes which cell is read.
    let (size, overridden) = if addon.is_sized() {
        match input.size_override {
            Some(size) => (Some(size), true),
            None => (Some(system_size), false),
        }
    } else {
        (None, false)
    };

    let cost = book.addon_cost(addon, family, size);
    let price = price_from_cost(cost, addon_margin);

    Some(ResolvedAddon {
        size,
        cost,
        price,
        overridden,
    })
}

/// Resolve all five add-ons against the current session inputs.
pub fn resolve_all(
    inputs: &BTreeMap<Addon, AddonInput>,
    family: Family,
    system_size: SizeTier,
    book: &PriceBook,
    addon_margin: f64,
) -> BTreeMap<Addon, Option<ResolvedAddon>> {
    Addon::ALL
        .into_iter()
        .map(|addon| {
            let input = inputs.get(&addon).copied().unwrap_or_default();
            (
                addon,
                resolve(addon, input, family, system_size, book, addon_margin),
            )
        })
        .collect()
}

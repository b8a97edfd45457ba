//! Keeps the base-system cost/margin/price triad consistent under a
//! "last edited field wins" rule. A single pure reducer; out-of-range input
//! is clamped, never rejected.

use super::entities::{BaseTriad, EditedField};

/// Margin bounds on the cost/margin edit paths.
const MARGIN_MIN: f64 = 0.05;
const MARGIN_MAX: f64 = 0.90;

/// Wider ceiling when the margin is derived from a direct price edit.
const DERIVED_MARGIN_MAX: f64 = 0.95;

/// Shared cost→price conversion. The denominator is floored so a margin
/// near 1.0 can never divide by zero; output is rounded to the nearest
/// whole currency unit.
pub fn price_from_cost(cost: f64, margin: f64) -> f64 {
    (cost / (1.0 - margin).max(0.01)).round()
}

/// Clamp applied whenever a margin arrives through a direct numeric edit.
pub fn clamp_margin(margin: f64) -> f64 {
    margin.clamp(MARGIN_MIN, MARGIN_MAX)
}

/// Produce a consistent triad from the two authoritative fields named by
/// `last_edited`.
///
/// - cost or margin edited: margin is re-clamped, price is derived;
/// - price edited: price is taken as given and the margin is back-solved
///   from `(price - cost) / price`, clamped to [0, 0.95].
pub fn reconcile(triad: BaseTriad) -> BaseTriad {
    match triad.last_edited {
        EditedField::Cost | EditedField::Margin => {
            let margin = clamp_margin(triad.margin);
            BaseTriad {
                margin,
                price: price_from_cost(triad.cost, margin),
                ..triad
            }
        }
        EditedField::Price => {
            let margin = ((triad.price - triad.cost) / triad.price.max(1.0))
                .clamp(0.0, DERIVED_MARGIN_MAX);
            BaseTriad { margin, ..triad }
        }
    }
}

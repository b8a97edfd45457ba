//! Pricing and derivation logic for hardware quotes lives here.

pub mod addons;
pub mod entities;
pub mod pricebook;
pub mod reconcile;
pub mod session;
pub mod totals;

#[allow(unused_imports)]
pub use entities::{
    Addon, AddonInput, BaseTriad, EditedField, Family, MarginPreset, ResolvedAddon, SizeTier,
    Vertical,
};
#[allow(unused_imports)]
pub use pricebook::PriceBook;
#[allow(unused_imports)]
pub use reconcile::{clamp_margin, price_from_cost, reconcile};
#[allow(unused_imports)]
pub use session::QuoteSession;
#[allow(unused_imports)]
pub use totals::{
    adders_total, ase_annual, round2, subscription_monthly, QuoteTotals, ANNUAL_BILLING_FACTOR,
    HIGH_USAGE_SURCHARGE,
};

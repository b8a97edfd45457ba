//! Read-only projection of the current quote into a structured snapshot,
//! serialized as pretty JSON for copy/paste into downstream quoting tools.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::Error as SerdeError;

use crate::domain::{Addon, QuoteSession};

#[derive(Debug, Serialize, PartialEq)]
pub struct QuoteSnapshot {
    pub system: SystemSnapshot,
    /// One entry per add-on, keyed by its stable lowercase key.
    /// `None` for disabled add-ons.
    pub addons: BTreeMap<&'static str, Option<AddonSnapshot>>,
    pub adders_total: f64,
    pub ase_annual: f64,
    pub subscription: SubscriptionSnapshot,
    pub one_time_total: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SystemSnapshot {
    pub family: &'static str,
    pub size: &'static str,
    pub cost: f64,
    /// Rounded to 3 decimals for the export.
    pub margin: f64,
    pub price: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AddonSnapshot {
    pub size: Option<&'static str>,
    pub cost: f64,
    pub price: f64,
    pub overridden: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SubscriptionSnapshot {
    pub monthly: f64,
    pub vertical: &'static str,
    pub annual_billing: bool,
}

/// Build a snapshot of the session's current derived state. Never mutates.
pub fn snapshot(session: &QuoteSession) -> QuoteSnapshot {
    let totals = session.totals();
    let resolved = session.resolved_addons();

    let addons = Addon::ALL
        .into_iter()
        .map(|addon| {
            let entry = resolved.get(&addon).copied().flatten().map(|r| AddonSnapshot {
                size: r.size.map(|s| s.label()),
                cost: r.cost,
                price: r.price,
                overridden: r.overridden,
            });
            (addon.key(), entry)
        })
        .collect();

    QuoteSnapshot {
        system: SystemSnapshot {
            family: session.family.label(),
            size: session.system_size.label(),
            cost: session.base.cost,
            margin: (session.base.margin * 1_000.0).round() / 1_000.0,
            price: session.base.price,
        },
        addons,
        adders_total: totals.adders_total,
        ase_annual: totals.ase_annual,
        subscription: SubscriptionSnapshot {
            monthly: totals.subscription_monthly,
            vertical: session.vertical.label(),
            annual_billing: session.annual_billing,
        },
        one_time_total: totals.one_time_total,
    }
}

pub fn to_json(snapshot: &QuoteSnapshot) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn write_snapshot(session: &QuoteSession, path: &Path) -> Result<(), ExportError> {
    let json = to_json(&snapshot(session))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

/// Product line variant. Determines which cost and price tables apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    #[default]
    Mp3,
    Lv2,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::Mp3, Family::Lv2];

    pub fn label(&self) -> &'static str {
        match self {
            Family::Mp3 => "MP3",
            Family::Lv2 => "LV2",
        }
    }
}

/// Capacity / zone-count class. Base systems come in S/M/L; `Xl` exists only
/// in the foam add-on's cost table and is reachable via a size override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeTier {
    S,
    #[default]
    M,
    L,
    Xl,
}

impl SizeTier {
    /// Tiers a base system can be configured in.
    pub const SYSTEM: [SizeTier; 3] = [SizeTier::S, SizeTier::M, SizeTier::L];

    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::S => "S",
            SizeTier::M => "M",
            SizeTier::L => "L",
            SizeTier::Xl => "XL",
        }
    }
}

/// Optional hardware accessory priced independently of the base system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Addon {
    Foam,
    Booster,
    PoolDraft,
    Solar,
    Ups,
}

impl Addon {
    pub const ALL: [Addon; 5] = [
        Addon::Foam,
        Addon::Booster,
        Addon::PoolDraft,
        Addon::Solar,
        Addon::Ups,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Addon::Foam => "Foam",
            Addon::Booster => "Booster",
            Addon::PoolDraft => "Pool/Draft",
            Addon::Solar => "Solar",
            Addon::Ups => "UPS",
        }
    }

    /// Stable lowercase key used by the command surface and the JSON export.
    pub fn key(&self) -> &'static str {
        match self {
            Addon::Foam => "foam",
            Addon::Booster => "booster",
            Addon::PoolDraft => "pool",
            Addon::Solar => "solar",
            Addon::Ups => "ups",
        }
    }

    /// Solar and UPS are flat-priced and carry no size tier.
    pub fn is_sized(&self) -> bool {
        !matches!(self, Addon::Solar | Addon::Ups)
    }

    /// UPS is excluded from the annual service fee.
    pub fn counts_toward_ase(&self) -> bool {
        !matches!(self, Addon::Ups)
    }
}

/// Market segment carrying a subscription price multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Vertical {
    #[default]
    Residential,
    Commercial,
    Industrial,
}

impl Vertical {
    pub fn multiplier(&self) -> f64 {
        match self {
            Vertical::Residential => 1.0,
            Vertical::Commercial => 1.25,
            Vertical::Industrial => 1.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Vertical::Residential => "Residential",
            Vertical::Commercial => "Commercial",
            Vertical::Industrial => "Industrial",
        }
    }
}

/// Which triad field the user touched last. Decides which field is derived
/// on the next reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditedField {
    #[default]
    Cost,
    Margin,
    Price,
}

/// Cost / gross-margin / installed-price triad for the base system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseTriad {
    pub cost: f64,
    pub margin: f64,
    pub price: f64,
    pub last_edited: EditedField,
}

/// Per-add-on user input. `size_override: None` means "follow system size".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AddonInput {
    pub enabled: bool,
    pub size_override: Option<SizeTier>,
}

/// An enabled add-on after size, cost, and price resolution.
/// `size` is `None` for the flat-priced add-ons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedAddon {
    pub size: Option<SizeTier>,
    pub cost: f64,
    pub price: f64,
    pub overridden: bool,
}

/// One-click margin presets carried over from the original quoting sheet.
/// Applying one counts as a margin edit and also moves the shared add-on margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarginPreset {
    /// "Residential 50% GM"
    Residential,
    /// "Commercial 40% GM"
    Commercial,
}

impl MarginPreset {
    pub fn system_margin(&self) -> f64 {
        match self {
            MarginPreset::Residential => 0.50,
            MarginPreset::Commercial => 0.40,
        }
    }

    pub fn addon_margin(&self) -> f64 {
        match self {
            MarginPreset::Residential => 0.50,
            MarginPreset::Commercial => 0.40,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarginPreset::Residential => "Residential 50% GM",
            MarginPreset::Commercial => "Commercial 40% GM",
        }
    }
}

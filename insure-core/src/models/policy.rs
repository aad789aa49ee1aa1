use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// No-claim bonus slab, a percentage discount on the basic premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NoClaimBonus {
    Zero,
    Twenty,
    TwentyFive,
    ThirtyFive,
    FortyFive,
    Fifty,
}

impl NoClaimBonus {
    pub fn all() -> &'static [NoClaimBonus] {
        &[
            NoClaimBonus::Zero,
            NoClaimBonus::Twenty,
            NoClaimBonus::TwentyFive,
            NoClaimBonus::ThirtyFive,
            NoClaimBonus::FortyFive,
            NoClaimBonus::Fifty,
        ]
    }

    pub fn percent(&self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::Twenty => 20,
            Self::TwentyFive => 25,
            Self::ThirtyFive => 35,
            Self::FortyFive => 45,
            Self::Fifty => 50,
        }
    }

    /// The discount as a fraction, e.g. `0.20` for 20%.
    pub fn discount(&self) -> Decimal {
        Decimal::new(i64::from(self.percent()), 2)
    }

    pub fn from_percent(percent: u8) -> Option<Self> {
        Self::all().iter().copied().find(|ncb| ncb.percent() == percent)
    }

    /// Parses the select value (`"20"`); a trailing `%` is tolerated.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim().trim_end_matches('%');
        trimmed.parse().ok().and_then(Self::from_percent)
    }
}

impl TryFrom<u8> for NoClaimBonus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_percent(value).ok_or_else(|| format!("unsupported no-claim bonus {value}%"))
    }
}

impl From<NoClaimBonus> for u8 {
    fn from(ncb: NoClaimBonus) -> Self {
        ncb.percent()
    }
}

impl fmt::Display for NoClaimBonus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Optional covers that add a surcharge on top of the basic premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddOn {
    #[serde(rename = "Zero Depreciation")]
    ZeroDepreciation,
    #[serde(rename = "Engine Protection")]
    EngineProtection,
    #[serde(rename = "Roadside Assistance")]
    RoadsideAssistance,
    #[serde(rename = "Consumables Cover")]
    ConsumablesCover,
    #[serde(rename = "Personal Accident Cover")]
    PersonalAccidentCover,
}

impl AddOn {
    pub fn all() -> &'static [AddOn] {
        &[
            AddOn::ZeroDepreciation,
            AddOn::EngineProtection,
            AddOn::RoadsideAssistance,
            AddOn::ConsumablesCover,
            AddOn::PersonalAccidentCover,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ZeroDepreciation => "Zero Depreciation",
            Self::EngineProtection => "Engine Protection",
            Self::RoadsideAssistance => "Roadside Assistance",
            Self::ConsumablesCover => "Consumables Cover",
            Self::PersonalAccidentCover => "Personal Accident Cover",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|addon| addon.label() == label.trim())
    }
}

/// Field group owned by the policy customization step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCustomization {
    /// Insured declared value.
    pub idv: Option<Decimal>,
    pub ncb: Option<NoClaimBonus>,
    /// Selected add-ons in selection order.
    pub addons: Vec<AddOn>,
}

impl PolicyCustomization {
    /// Selects `addon` if it is not selected, deselects it otherwise.
    pub fn toggle_addon(
        &mut self,
        addon: AddOn,
    ) {
        if let Some(pos) = self.addons.iter().position(|a| *a == addon) {
            self.addons.remove(pos);
        } else {
            self.addons.push(addon);
        }
    }

    pub fn has_addon(
        &self,
        addon: AddOn,
    ) -> bool {
        self.addons.contains(&addon)
    }
}

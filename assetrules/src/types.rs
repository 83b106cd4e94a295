use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fields;

/// Coarse category of a physical asset record (`rel_assettype`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Well,
    Pipeline,
    Facility,
    BurrowPit,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [Self::Well, Self::Pipeline, Self::Facility, Self::BurrowPit];

    /// Maps a host option-set value. Unknown values resolve to `None`.
    pub fn from_option_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Well),
            2 => Some(Self::Pipeline),
            3 => Some(Self::Facility),
            4 => Some(Self::BurrowPit),
            _ => None,
        }
    }

    pub fn option_value(self) -> i32 {
        match self {
            Self::Well => 1,
            Self::Pipeline => 2,
            Self::Facility => 3,
            Self::BurrowPit => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Well => "well",
            Self::Pipeline => "pipeline",
            Self::Facility => "facility",
            Self::BurrowPit => "burrow_pit",
        }
    }
}

/// Finer category describing a connecting asset's service (`rel_servicetype`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceClass {
    Bulkline,
    Flowline,
    Manifold,
}

impl ServiceClass {
    pub const ALL: [ServiceClass; 3] = [Self::Bulkline, Self::Flowline, Self::Manifold];

    /// Maps a host option-set value. Unknown values resolve to `None`.
    pub fn from_option_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Bulkline),
            1 => Some(Self::Flowline),
            2 => Some(Self::Manifold),
            _ => None,
        }
    }

    pub fn option_value(self) -> i32 {
        match self {
            Self::Bulkline => 0,
            Self::Flowline => 1,
            Self::Manifold => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bulkline => "bulkline",
            Self::Flowline => "flowline",
            Self::Manifold => "manifold",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == normalized || class.as_str().replace('_', "") == normalized)
            .ok_or_else(|| format!("unknown asset type '{value}'"))
    }
}

impl FromStr for ServiceClass {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == normalized)
            .ok_or_else(|| format!("unknown service type '{value}'"))
    }
}

/// The identifier field an asset carries, resolved from its classifiers.
///
/// A resolvable [`ServiceClass`] always wins; the [`AssetClass`] is only
/// consulted when no service class applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Bulkline,
    Flowline,
    Manifold,
    Well,
    Pipeline,
    Facility,
    BurrowPit,
}

impl IdentifierKind {
    pub fn resolve(asset: Option<AssetClass>, service: Option<ServiceClass>) -> Option<Self> {
        if let Some(service) = service {
            return Some(match service {
                ServiceClass::Bulkline => Self::Bulkline,
                ServiceClass::Flowline => Self::Flowline,
                ServiceClass::Manifold => Self::Manifold,
            });
        }
        asset.map(|asset| match asset {
            AssetClass::Well => Self::Well,
            AssetClass::Pipeline => Self::Pipeline,
            AssetClass::Facility => Self::Facility,
            AssetClass::BurrowPit => Self::BurrowPit,
        })
    }

    /// Attribute holding this kind's identifier on `rel_asset`.
    pub fn field(self) -> &'static str {
        match self {
            Self::Bulkline => fields::asset::BULKLINE_ID,
            Self::Flowline => fields::asset::FLOWLINE_ID,
            Self::Manifold => fields::asset::MANIFOLD_ID,
            Self::Well => fields::asset::WELL_CODE,
            Self::Pipeline => fields::asset::PIPELINE_ID,
            Self::Facility => fields::asset::FACILITY_ID,
            Self::BurrowPit => fields::asset::BURROWPIT_ID,
        }
    }

    /// Four-letter prefix used for provisioned and short-form codes.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Bulkline => "BULK",
            Self::Flowline => "FLID",
            Self::Manifold => "MFLD",
            Self::Well => "WELL",
            Self::Pipeline => "PIPE",
            Self::Facility => "FACN",
            Self::BurrowPit => "BPIT",
        }
    }

    /// `rel_assettype` option value on the yearly cycle entity.
    pub fn cycle_asset_type(self) -> i32 {
        match self {
            Self::Well => 0,
            Self::Pipeline => 1,
            Self::Facility => 2,
            Self::BurrowPit => 3,
            Self::Bulkline => 4,
            Self::Flowline => 5,
            Self::Manifold => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bulkline => "BULKLINE",
            Self::Flowline => "FLOWLINE",
            Self::Manifold => "MANIFOLD",
            Self::Well => "WELL",
            Self::Pipeline => "PIPELINE",
            Self::Facility => "FACILITY",
            Self::BurrowPit => "BURROWPIT",
        }
    }
}

/// Parent asset readiness (`rel_readinessstatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessStatus {
    ReadyForAbandonment,
    Abandoned,
    NotAbandoned,
}

impl ReadinessStatus {
    pub fn from_option_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::ReadyForAbandonment),
            2 => Some(Self::Abandoned),
            3 => Some(Self::NotAbandoned),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_class_wins_over_asset_class() {
        let kind = IdentifierKind::resolve(Some(AssetClass::Well), Some(ServiceClass::Manifold));
        assert_eq!(kind, Some(IdentifierKind::Manifold));
        assert_eq!(kind.map(IdentifierKind::field), Some("rel_manifoldid"));
    }

    #[test]
    fn asset_class_used_without_service_class() {
        assert_eq!(
            IdentifierKind::resolve(Some(AssetClass::BurrowPit), None),
            Some(IdentifierKind::BurrowPit)
        );
        assert_eq!(IdentifierKind::resolve(None, None), None);
    }

    #[test]
    fn unknown_option_values_do_not_resolve() {
        assert_eq!(ServiceClass::from_option_value(7), None);
        assert_eq!(AssetClass::from_option_value(0), None);
        assert_eq!(AssetClass::from_option_value(3), Some(AssetClass::Facility));
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("Burrow-Pit".parse::<AssetClass>(), Ok(AssetClass::BurrowPit));
        assert_eq!("burrowpit".parse::<AssetClass>(), Ok(AssetClass::BurrowPit));
        assert_eq!("FLOWLINE".parse::<ServiceClass>(), Ok(ServiceClass::Flowline));
        assert!("lake".parse::<AssetClass>().is_err());
    }
}

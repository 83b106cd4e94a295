//! Identifier provisioning for newly created assets.

use serde::Serialize;

use crate::normalizer::strip_non_alphanumeric;
use crate::types::{AssetClass, IdentifierKind, ServiceClass};

/// Field writes derived from an asset's sequence value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provision {
    pub kind: IdentifierKind,
    /// Identifier attribute selected by the classifiers.
    pub field: &'static str,
    /// Value for `field`, or `None` when the field already holds a value.
    pub write: Option<String>,
    /// `<prefix><sequence>`, always written to `rel_assetcode`.
    pub composite_code: String,
    /// Resolved value of `field`, always written to `rel_name`.
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProvisionResult {
    Provisioned(Provision),
    NoApplicableClass,
    MissingSequence,
}

/// Derives the identifier writes for an asset.
///
/// An operator-entered identifier is never overwritten, but it does become the
/// display name. The composite code always uses the fresh sequence value.
pub fn provision_identifier(
    sequence: &str,
    asset: Option<AssetClass>,
    service: Option<ServiceClass>,
    existing: Option<&str>,
) -> ProvisionResult {
    if sequence.is_empty() {
        return ProvisionResult::MissingSequence;
    }
    let Some(kind) = IdentifierKind::resolve(asset, service) else {
        return ProvisionResult::NoApplicableClass;
    };

    let composite_code = format!("{}{}", kind.prefix(), sequence);
    let (write, display_name) = match existing.filter(|value| !value.is_empty()) {
        Some(current) => (None, current.to_string()),
        None => {
            let candidate = strip_non_alphanumeric(&composite_code);
            (Some(candidate.clone()), candidate)
        }
    };

    ProvisionResult::Provisioned(Provision {
        kind,
        field: kind.field(),
        write,
        composite_code,
        display_name,
    })
}

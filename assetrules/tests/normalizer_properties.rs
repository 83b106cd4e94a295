//! Behavioral properties of the pure identifier rules over a spread of
//! operator-style inputs.

use regex::Regex;

use assetrules::normalizer::{RECTIFIED_LEN, clean_code, is_short_code, normalize_well_code, rectify};
use assetrules::{
    AssetClass, IdentifierKind, NormalizationResult, ProvisionResult, ServiceClass, normalize, provision_identifier,
};

const SAMPLES: &[&str] = &[
    "",
    " ",
    "a",
    "7",
    "adibw002lfln",
    "ADIBW-002-LFLN",
    "  adibw 002 lfln  ",
    "ab12",
    "abcde",
    "abcdefgh",
    "abcdefghi",
    "abcdefghijklmnopqrstuvwxyz0123456789",
    "123456789",
    "9a8b7c6d5e4f3g2h1i",
    "ÁDIBW·002·LFLN",
    "fl/id 00-42",
    "x_y_z",
    "MRBAB7KP",
];

fn rectified_shape() -> Regex {
    Regex::new(r"^[A-Z]{5}[0-9]{3}[A-Z]{4}$").unwrap()
}

#[test]
fn rectified_codes_have_the_fixed_shape() {
    let shape = rectified_shape();
    for raw in SAMPLES {
        let code = rectify(raw);
        assert_eq!(code.len(), RECTIFIED_LEN, "{raw:?}");
        assert!(shape.is_match(&code), "{raw:?} -> {code}");
    }
}

#[test]
fn rectify_is_idempotent() {
    for raw in SAMPLES {
        let once = rectify(raw);
        assert_eq!(rectify(&once), once, "{raw:?}");
    }
}

#[test]
fn flowline_normalization_output_is_stable() {
    for raw in SAMPLES {
        let result = normalize(raw, Some(AssetClass::Pipeline), Some(ServiceClass::Flowline));
        if let NormalizationResult::Replace(code) = result {
            assert_eq!(
                normalize(&code, Some(AssetClass::Pipeline), Some(ServiceClass::Flowline)),
                NormalizationResult::Unchanged,
                "{raw:?} -> {code}"
            );
        }
    }
}

#[test]
fn blank_input_is_never_replaced() {
    for raw in ["", " ", "\t \n"] {
        for service in ServiceClass::ALL {
            assert_eq!(normalize(raw, None, Some(service)), NormalizationResult::Unchanged);
        }
        for asset in AssetClass::ALL {
            assert_eq!(normalize(raw, Some(asset), None), NormalizationResult::Unchanged);
        }
    }
}

#[test]
fn only_flowline_and_well_kinds_are_normalized() {
    let raw = "abcde 123 fghi";
    assert!(normalize(raw, None, Some(ServiceClass::Bulkline)).is_unchanged());
    assert!(normalize(raw, None, Some(ServiceClass::Manifold)).is_unchanged());
    assert!(normalize(raw, Some(AssetClass::Facility), None).is_unchanged());
    assert!(normalize(raw, Some(AssetClass::BurrowPit), None).is_unchanged());
    assert!(normalize(raw, Some(AssetClass::Pipeline), None).is_unchanged());
    assert!(normalize(raw, None, None).is_unchanged());
    assert_eq!(
        normalize(raw, Some(AssetClass::Well), Some(ServiceClass::Flowline)).replacement(),
        Some("ABCDE123FGHI")
    );
}

#[test]
fn short_codes_of_the_resolved_kind_are_kept() {
    let shape = Regex::new(r"^[a-z]{4}[0-9]{3,4}$").unwrap();
    let classifications = AssetClass::ALL
        .into_iter()
        .map(|asset| (Some(asset), None))
        .chain(ServiceClass::ALL.into_iter().map(|service| (Some(AssetClass::Well), Some(service))));

    for (asset, service) in classifications {
        let kind = IdentifierKind::resolve(asset, service).unwrap();
        for digits in ["123", "0001"] {
            let code = format!("{}{digits}", kind.prefix().to_ascii_lowercase());
            assert!(shape.is_match(&code));
            assert!(normalize(&code, asset, service).is_unchanged(), "{kind:?} {code}");
        }
    }
}

#[test]
fn short_codes_need_three_or_four_digits() {
    assert!(is_short_code("FLID123", "FLID"));
    assert!(is_short_code("flid1234", "FLID"));
    assert!(!is_short_code("FLID12", "FLID"));
    assert!(!is_short_code("FLID12345", "FLID"));
    assert!(!is_short_code(" FLID123", "FLID"));
    assert!(!is_short_code("FLID-123", "FLID"));
}

#[test]
fn well_codes_normalize_to_prefix_and_digits() {
    let shape = Regex::new(r"^[A-Z]{4}[0-9]{3,}$").unwrap();
    for raw in ["adib002", " Adib-0021 ", "ADIBXX-9999", "wellcode 12345"] {
        let code = normalize_well_code(raw);
        let value = code.replacement().unwrap_or(raw);
        assert!(shape.is_match(value), "{raw:?} -> {value}");
        assert!(normalize_well_code(value).is_unchanged());
    }
    assert!(normalize_well_code("abc-123").is_unchanged());
    assert!(normalize_well_code("adib-12").is_unchanged());
}

#[test]
fn provisioning_prefix_matches_resolved_kind() {
    let classifications = AssetClass::ALL
        .into_iter()
        .map(|asset| (Some(asset), None))
        .chain(ServiceClass::ALL.into_iter().map(|service| (Some(AssetClass::Pipeline), Some(service))));

    for (asset, service) in classifications {
        let kind = IdentifierKind::resolve(asset, service).unwrap();
        let ProvisionResult::Provisioned(provision) = provision_identifier("00-12", asset, service, None) else {
            panic!("{asset:?}/{service:?} should provision");
        };
        assert_eq!(provision.field, kind.field());
        assert_eq!(provision.composite_code, format!("{}00-12", kind.prefix()));
        assert_eq!(provision.write.as_deref(), Some(clean_code(&provision.composite_code).as_str()));
        assert_eq!(provision.display_name, format!("{}0012", kind.prefix()));
    }
}

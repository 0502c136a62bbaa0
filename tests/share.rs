use num_bigint::BigUint;
use secretsharing::rng::Csprng;
use secretsharing::{
    Container, ContainerParams, ErrorKind, PrimeSearch, Secret, SecretSharingError, Share,
    ShareParts,
};

fn split(value: u64, n: u16, k: u16) -> Vec<Share> {
    let params = ContainerParams::new(n, k).with_rounds(20);
    let mut container = Container::with_params(params).unwrap();

    container
        .set_secret_with_rng(
            Secret::new(BigUint::from(value)).unwrap(),
            &mut Csprng::from_seed([1u8; 32]),
        )
        .unwrap()
        .to_vec()
}

fn parts() -> ShareParts {
    ShareParts {
        x: 1,
        y: BigUint::from(1494u32),
        prime: BigUint::from(1613u32),
        prime_bit_length: 10,
        k: 3,
        n: 6,
        integrity_tag: "00ff".into(),
    }
}

#[test]
fn shares_carry_batch_metadata() {
    let shares = split(1234, 5, 3);

    assert_eq!(shares.len(), 5);

    for (i, share) in shares.iter().enumerate() {
        assert_eq!(usize::from(share.x()), i + 1);
        assert_eq!(share.k(), 3);
        assert_eq!(share.n(), 5);
        assert_eq!(share.version(), 1);
        assert!(share.y() < share.prime());
        assert!(share.prime().bits() > share.prime_bit_length());
        assert_eq!(share.prime(), shares[0].prime());
        assert_eq!(share.integrity_tag(), shares[0].integrity_tag());
    }
}

#[test]
fn string_form_roundtrip() {
    for share in split(987_654_321, 4, 2) {
        let text = share.to_string();

        assert!(!text.contains('\n'));
        assert!(text.chars().all(|c| c.is_ascii_alphanumeric() || "-_=".contains(c)));

        let parsed: Share = text.parse().unwrap();
        assert_eq!(parsed, share);
    }
}

#[test]
fn string_form_accepts_unpadded_and_whitespace() {
    let share = split(5, 3, 2).remove(0);
    let text = share.to_string();
    let unpadded = text.trim_end_matches('=');

    assert_eq!(unpadded.parse::<Share>().unwrap(), share);
    assert_eq!(format!("  {text}\n").parse::<Share>().unwrap(), share);
}

#[test]
fn json_has_fixed_key_order_and_bare_integers() {
    let share = Share::new(parts()).unwrap();

    assert_eq!(
        share.to_json().unwrap(),
        r#"{"version":1,"hmac":"00ff","k":3,"n":6,"x":1,"y":1494,"prime":1613,"prime_bitlength":10}"#
    );
}

#[test]
fn json_keeps_large_integers_exact() {
    let share = split(u64::MAX, 3, 2).remove(1);
    let json = share.to_json().unwrap();

    assert!(json.contains(&format!("\"prime\":{}", share.prime())));
    assert_eq!(Share::from_json(&json).unwrap(), share);
}

#[test]
fn json_accepts_decimal_strings() {
    let json = r#"{"version":1,"hmac":"00ff","k":3,"n":6,"x":1,"y":"1494","prime":"1613","prime_bitlength":10}"#;

    assert_eq!(Share::from_json(json).unwrap(), Share::new(parts()).unwrap());
}

#[test]
fn json_rejects_other_versions() {
    let json = r#"{"version":2,"hmac":"00ff","k":3,"n":6,"x":1,"y":1494,"prime":1613,"prime_bitlength":10}"#;

    assert_eq!(
        Share::from_json(json).unwrap_err(),
        SecretSharingError::UnsupportedVersion {
            found: 2,
            expected: 1,
        }
    );
}

#[test]
fn json_rejects_unknown_and_missing_keys() {
    let extra = r#"{"version":1,"hmac":"00ff","k":3,"n":6,"x":1,"y":1494,"prime":1613,"prime_bitlength":10,"note":"hi"}"#;
    let missing = r#"{"version":1,"hmac":"00ff","k":3,"n":6,"x":1,"prime":1613,"prime_bitlength":10}"#;

    for json in [extra, missing, "not json", "[]"] {
        assert!(matches!(
            Share::from_json(json),
            Err(SecretSharingError::InvalidShare(_))
        ));
    }
}

#[test]
fn json_rejects_negative_integers() {
    let json = r#"{"version":1,"hmac":"00ff","k":3,"n":6,"x":1,"y":-5,"prime":1613,"prime_bitlength":10}"#;

    assert!(Share::from_json(json).is_err());
}

#[test]
fn constructor_validates_fields() {
    let cases = [
        ShareParts { x: 0, ..parts() },
        ShareParts { x: 7, ..parts() },
        ShareParts { k: 1, ..parts() },
        ShareParts { k: 7, ..parts() },
        ShareParts { n: 513, k: 3, ..parts() },
        ShareParts {
            y: BigUint::from(1613u32),
            ..parts()
        },
        ShareParts {
            prime_bit_length: 11,
            ..parts()
        },
        ShareParts {
            y: BigUint::from(1u32),
            prime: BigUint::from(5u32),
            prime_bit_length: 2,
            ..parts()
        },
        ShareParts {
            integrity_tag: String::new(),
            ..parts()
        },
        ShareParts {
            integrity_tag: "xyz".into(),
            ..parts()
        },
    ];

    for case in cases {
        let err = Share::new(case.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format, "{case:?}");
    }

    assert!(Share::try_from(parts()).is_ok());
}

#[test]
fn parse_rejects_garbage() {
    for input in ["", "%%%", "bm90IGpzb24="] {
        let err = input.parse::<Share>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format, "{input:?}");
    }
}

#[test]
fn to_parts_roundtrip() {
    let share = split(42, 3, 3).remove(2);

    assert_eq!(Share::new(share.to_parts()).unwrap(), share);
}

#[test]
fn batch_check() {
    let a = split(1, 3, 2);
    let b = split(2, 3, 2);

    assert!(a[0].check_same_batch(&a[1]).is_ok());
    assert!(matches!(
        a[0].check_same_batch(&b[1]),
        Err(SecretSharingError::InconsistentShares(_))
    ));
}

#[test]
fn legacy_conversion_needs_a_derivable_prime() {
    let params = ContainerParams::new(3, 2)
        .with_rounds(20)
        .with_prime_search(PrimeSearch::Smallest);
    let mut container = Container::with_params(params).unwrap();
    let secret = Secret::new(BigUint::from(0xabcdefu32)).unwrap();
    let shares = container.set_secret(secret).unwrap();

    let legacy = shares[1].to_legacy().unwrap();

    assert_eq!(legacy.x(), 2);
    assert_eq!(legacy.y(), shares[1].y());
    assert_eq!(legacy.prime(), shares[1].prime());
    assert_eq!(legacy.prime_bit_length(), shares[1].prime_bit_length());

    let random = split(0xabcdef, 3, 2);
    assert!(matches!(
        random[1].to_legacy(),
        Err(SecretSharingError::LegacyIncompatible(_))
    ));
}

#[test]
fn json_rejects_non_canonical_integer_strings() {
    for y in ["\"+1494\"", "\"1_494\"", "\"\""] {
        let json = format!(
            r#"{{"version":1,"hmac":"00ff","k":3,"n":6,"x":1,"y":{y},"prime":1613,"prime_bitlength":10}}"#
        );

        assert!(
            matches!(Share::from_json(&json), Err(SecretSharingError::InvalidShare(_))),
            "{y}"
        );
    }
}

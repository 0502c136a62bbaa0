use num_bigint::BigUint;
use num_traits::{Num, One};
use secretsharing::rng::Csprng;
use secretsharing::{
    Container, ContainerParams, LegacyShare, PrimeSearch, Secret, SecretSharingError,
};

const VECTOR: &str = "0016C984F871AA524431793D2F0BB86319D870BEAF3FE106CEAF262E826DCB3FD1A0B81341";

#[test]
fn parses_known_vector() {
    let share: LegacyShare = VECTOR.parse().unwrap();

    let y = BigUint::from_str_radix(
        "6C984F871AA524431793D2F0BB86319D870BEAF3FE106CEAF262E826DCB3FD1A0",
        16,
    )
    .unwrap();

    assert_eq!(share.x(), 1);
    assert_eq!(share.y(), &y);
    assert_eq!(share.prime_bit_length(), 261);
    assert!(share.prime() > &(BigUint::one() << 261u32));
    assert_eq!(share.prime().bits(), 262);
}

#[test]
fn known_vector_roundtrip() {
    let share: LegacyShare = VECTOR.parse().unwrap();

    assert_eq!(share.to_string(), VECTOR);
    assert_eq!(share, VECTOR.parse().unwrap());
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let share: LegacyShare = format!(" {VECTOR}\n").parse().unwrap();

    assert_eq!(share.to_string(), VECTOR);
}

#[test]
fn rejects_other_versions() {
    let tampered = format!("1{}", &VECTOR[1..]);

    assert_eq!(
        tampered.parse::<LegacyShare>().unwrap_err(),
        SecretSharingError::UnsupportedVersion {
            found: 1,
            expected: 0,
        }
    );
}

#[test]
fn rejects_corrupted_y() {
    let tampered = VECTOR.replace("A0B8", "A1B8");
    assert_ne!(tampered, VECTOR);

    assert!(matches!(
        tampered.parse::<LegacyShare>(),
        Err(SecretSharingError::ChecksumMismatch { .. })
    ));
}

#[test]
fn rejects_short_and_non_hex_input() {
    for input in ["", "0", "001B8134", "0ÿ16C984F871AA5", "00Z6C984F871AA5"] {
        assert!(input.parse::<LegacyShare>().is_err(), "{input:?}");
    }
}

#[test]
fn constructor_validates_fields() {
    let prime = BigUint::from(37u32);

    assert!(LegacyShare::new(1, BigUint::from(5u32), prime.clone(), 5).is_ok());
    assert!(matches!(
        LegacyShare::new(0, BigUint::from(5u32), prime.clone(), 5),
        Err(SecretSharingError::InvalidShare(_))
    ));
    assert!(matches!(
        LegacyShare::new(1, BigUint::from(37u32), prime.clone(), 5),
        Err(SecretSharingError::InvalidShare(_))
    ));
    assert!(matches!(
        LegacyShare::new(1, BigUint::from(5u32), prime, 6),
        Err(SecretSharingError::LegacyIncompatible(_))
    ));
}

#[test]
fn legacy_shares_combine_with_metadata() {
    let params = ContainerParams::new(4, 3)
        .with_rounds(20)
        .with_prime_search(PrimeSearch::Smallest);
    let mut dealer = Container::with_params(params).unwrap();

    let secret = Secret::generate_with_rng(256, &mut Csprng::from_seed([2u8; 32])).unwrap();
    let tag = secret.integrity_tag().to_owned();

    let printed: Vec<String> = dealer
        .set_secret(secret.clone())
        .unwrap()
        .iter()
        .map(|s| s.to_legacy().unwrap().to_string())
        .collect();

    let mut combiner = Container::new(4, 3).unwrap();
    let mut recovered = None;

    for text in &printed[1..] {
        let share = text
            .parse::<LegacyShare>()
            .unwrap()
            .into_share(3, 4, tag.as_str())
            .unwrap();

        recovered = combiner.add_share(share).unwrap().cloned();
    }

    assert_eq!(recovered, Some(secret));
}

#[test]
fn rejects_sign_and_separator_characters() {
    let signed = format!("0+1{}", &VECTOR[3..]);
    let separated = format!("{}_{}", &VECTOR[..10], &VECTOR[10..]);

    for input in [signed, separated] {
        assert!(
            matches!(
                input.parse::<LegacyShare>(),
                Err(SecretSharingError::InvalidShare(_))
            ),
            "{input:?}"
        );
    }
}

use num_bigint::BigUint;
use proptest::prelude::*;
use secretsharing::rng::Csprng;
use secretsharing::{Container, ContainerParams, Secret, SecretSharingError, Share, ShareParts};

fn split(secret: &Secret, n: u16, k: u16, seed: [u8; 32]) -> Vec<Share> {
    let params = ContainerParams::new(n, k).with_rounds(16);

    Container::with_params(params)
        .unwrap()
        .set_secret_with_rng(secret.clone(), &mut Csprng::from_seed(seed))
        .unwrap()
        .to_vec()
}

fn any_secret(max_bits: u64) -> impl Strategy<Value = Secret> {
    (1..=max_bits, any::<[u8; 32]>()).prop_map(|(bits, seed)| {
        Secret::generate_with_rng(bits, &mut Csprng::from_seed(seed)).unwrap()
    })
}

/// `(n, k)` together with a `k`-subset of share indices, in random order.
fn dimensions_and_subset() -> impl Strategy<Value = (u16, u16, Vec<usize>)> {
    (2u16..=12)
        .prop_flat_map(|n| (Just(n), 2u16..=n))
        .prop_flat_map(|(n, k)| {
            let indices: Vec<usize> = (0..usize::from(n)).collect();
            (
                Just(n),
                Just(k),
                proptest::sample::subsequence(indices, usize::from(k)).prop_shuffle(),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn secret_text_roundtrip(secret in any_secret(4096)) {
        let parsed: Secret = secret.to_string().parse().unwrap();

        prop_assert_eq!(parsed, secret);
    }

    #[test]
    fn share_text_roundtrip(secret in any_secret(512), seed in any::<[u8; 32]>()) {
        for share in split(&secret, 4, 3, seed) {
            let parsed: Share = share.to_string().parse().unwrap();

            prop_assert_eq!(parsed, share);
        }
    }

    #[test]
    fn any_k_subset_recovers(
        secret in any_secret(600),
        (n, k, subset) in dimensions_and_subset(),
        seed in any::<[u8; 32]>(),
    ) {
        let shares = split(&secret, n, k, seed);
        let mut container = Container::new(n, k).unwrap();
        let mut recovered = None;

        for &i in &subset {
            recovered = container.add_share(&shares[i]).unwrap().cloned();
        }

        prop_assert_eq!(recovered, Some(secret));
    }

    #[test]
    fn fewer_than_k_shares_stay_unset(
        secret in any_secret(256),
        (n, k, subset) in dimensions_and_subset(),
        seed in any::<[u8; 32]>(),
    ) {
        let shares = split(&secret, n, k, seed);
        let mut container = Container::new(n, k).unwrap();

        for &i in &subset[..subset.len() - 1] {
            prop_assert!(container.add_share(&shares[i]).unwrap().is_none());
        }

        prop_assert!(container.secret().is_none());
    }

    #[test]
    fn shares_are_pairwise_distinct(
        secret in any_secret(256),
        n in 2u16..=16,
        seed in any::<[u8; 32]>(),
    ) {
        let shares = split(&secret, n, 2, seed);

        for (i, a) in shares.iter().enumerate() {
            for b in &shares[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn flipped_bit_is_detected(
        secret in any_secret(256),
        seed in any::<[u8; 32]>(),
        victim in 0usize..3,
        bit in 0u64..256,
    ) {
        let shares = split(&secret, 3, 3, seed);

        let original = &shares[victim];
        let bit = bit % original.prime_bit_length();
        let flipped = original.y() ^ &(BigUint::from(1u32) << bit);
        prop_assume!(&flipped < original.prime());

        let tampered = Share::new(ShareParts {
            y: flipped,
            ..original.to_parts()
        })
        .unwrap();

        let mut container = Container::all_of(3).unwrap();
        let mut result = Ok(None);

        for (i, share) in shares.iter().enumerate() {
            let share = if i == victim { tampered.clone() } else { share.clone() };
            result = container.add_share(share).map(|s| s.cloned());
        }

        prop_assert_eq!(result, Err(SecretSharingError::IntegrityCheckFailed));
        prop_assert!(container.secret().is_none());
    }
}

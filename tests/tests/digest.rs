use std::collections::HashSet;

use alloy::sol_types::SolValue;
use alloy_primitives::{eip191_hash_message, keccak256, U256};
use contracts_common::{
    constants::NUM_BYTES_CLAIM, custom_serde::BytesSerializable, solidity::RewardClaim,
    types::Claim,
};
use contracts_core::crypto::hash::{build_digest, prefixed_digest, signing_hash};
use contracts_utils::crypto::NativeHasher;
use rand::{thread_rng, Rng};
use tests::{
    digest::utils::{mutate_claim_byte, near_collisions, NUM_CLAIM_FIELD_BYTES},
    utils::{random_claim, FUZZ_ROUNDS, TEST_ACCOUNT, TEST_CONTRACT},
};

#[test]
fn test_digest_matches_abi_encode_fuzz() {
    let mut rng = thread_rng();
    for _ in 0..FUZZ_ROUNDS {
        let claim = random_claim(&mut rng);

        let encoded = claim.serialize_to_bytes();
        assert_eq!(encoded.len(), NUM_BYTES_CLAIM);
        assert_eq!(encoded, RewardClaim::from(claim).abi_encode());
        assert_eq!(build_digest::<NativeHasher>(&claim), keccak256(&encoded));
    }
}

#[test]
fn test_digest_deterministic() {
    let claim = Claim {
        account: TEST_ACCOUNT,
        amount: U256::from(100_u64),
        nonce: U256::from(1_u64),
        contract: TEST_CONTRACT,
    };

    let first = build_digest::<NativeHasher>(&claim);
    for _ in 0..FUZZ_ROUNDS {
        assert_eq!(build_digest::<NativeHasher>(&claim), first);
    }
}

#[test]
fn test_prefixed_digest_is_personal_message_hash() {
    let mut rng = thread_rng();
    for _ in 0..FUZZ_ROUNDS {
        let claim = random_claim(&mut rng);
        let digest = build_digest::<NativeHasher>(&claim);

        assert_eq!(
            prefixed_digest::<NativeHasher>(&digest),
            eip191_hash_message(digest)
        );
        assert_eq!(
            signing_hash::<NativeHasher>(&claim),
            prefixed_digest::<NativeHasher>(&digest)
        );
        assert_ne!(signing_hash::<NativeHasher>(&claim), digest);
    }
}

#[test]
fn test_digest_injective_single_byte_mutations() {
    let mut rng = thread_rng();
    let claim = random_claim(&mut rng);

    let mut digests = HashSet::new();
    digests.insert(build_digest::<NativeHasher>(&claim));
    for i in 0..NUM_CLAIM_FIELD_BYTES {
        let mask = rng.gen_range(1..=u8::MAX);
        let mutated = mutate_claim_byte(&claim, i, mask);
        assert!(digests.insert(build_digest::<NativeHasher>(&mutated)));
    }
}

#[test]
fn test_digest_injective_near_collisions_fuzz() {
    let mut rng = thread_rng();
    for _ in 0..FUZZ_ROUNDS {
        let claim = random_claim(&mut rng);
        let digest = build_digest::<NativeHasher>(&claim);

        for other in near_collisions(&claim) {
            assert_ne!(build_digest::<NativeHasher>(&other), digest);
        }
    }
}

#[test]
fn test_digest_injective_across_boundaries() {
    // Packed with minimal-width integers, these two claims encode identically
    let claim = Claim {
        account: TEST_ACCOUNT,
        amount: U256::from(0x0102_u64),
        nonce: U256::from(0x03_u64),
        contract: TEST_CONTRACT,
    };
    let shifted = Claim {
        amount: U256::from(0x01_u64),
        nonce: U256::from(0x0203_u64),
        ..claim
    };

    assert_ne!(
        build_digest::<NativeHasher>(&claim),
        build_digest::<NativeHasher>(&shifted)
    );
}

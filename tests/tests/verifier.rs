use alloy::signers::{local::PrivateKeySigner, SignerSync};
use alloy_primitives::U256;
use contracts_common::{
    constants::{NUM_BYTES_SIGNATURE, SECP256K1_HALF_ORDER},
    types::{Claim, RewardSignature, SignedClaim},
};
use contracts_core::{
    crypto::hash::build_digest,
    ledger::{ClaimLedger, MemoryClaimLedger},
    verifier::errors::VerifierError,
};
use contracts_utils::{
    authorizer::ClaimAuthorizer,
    crypto::{to_reward_signature, NativeHasher},
    errors::AuthorizationError,
    ledger::SharedClaimLedger,
};
use eyre::{eyre, Result};
use rand::{thread_rng, Rng};
use tests::{
    digest::utils::{mutate_claim_byte, NUM_CLAIM_FIELD_BYTES},
    utils::{
        global_setup, random_address, random_claim, sign_claim, FUZZ_ROUNDS, TEST_ACCOUNT,
        TEST_CONTRACT,
    },
    verifier::utils::{native_verify, setup_verifier, TEST_OWNER},
};

#[test]
fn test_reward_scenario() -> Result<()> {
    global_setup();
    let key = PrivateKeySigner::random();
    let signed = sign_claim(
        &key,
        Claim {
            account: TEST_ACCOUNT,
            amount: U256::from(100_u64),
            nonce: U256::from(1_u64),
            contract: TEST_CONTRACT,
        },
    )?;

    let mut ledger = MemoryClaimLedger::new();
    assert_eq!(native_verify(&signed, key.address(), &mut ledger), Ok(()));
    assert_eq!(
        native_verify(&signed, key.address(), &mut ledger),
        Err(VerifierError::NonceReplayed)
    );
    Ok(())
}

#[test]
fn test_accept_exactly_once_fuzz() -> Result<()> {
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let mut ledger = MemoryClaimLedger::new();

    for _ in 0..FUZZ_ROUNDS {
        let signed = sign_claim(&key, random_claim(&mut rng))?;

        assert_eq!(native_verify(&signed, key.address(), &mut ledger), Ok(()));
        assert!(ledger.contains(signed.claim.account, signed.claim.nonce));
        assert_eq!(
            native_verify(&signed, key.address(), &mut ledger),
            Err(VerifierError::NonceReplayed)
        );
    }

    assert_eq!(ledger.len(), FUZZ_ROUNDS);
    Ok(())
}

#[test]
fn test_wrong_key_fuzz() -> Result<()> {
    let mut rng = thread_rng();
    let trusted = PrivateKeySigner::random();

    for _ in 0..FUZZ_ROUNDS {
        let forger = PrivateKeySigner::random();
        let signed = sign_claim(&forger, random_claim(&mut rng))?;

        let mut ledger = MemoryClaimLedger::new();
        assert_eq!(
            native_verify(&signed, trusted.address(), &mut ledger),
            Err(VerifierError::SignerMismatch {
                recovered: forger.address()
            })
        );
        assert!(ledger.is_empty());
    }

    Ok(())
}

#[test]
fn test_single_byte_mutations_rejected() -> Result<()> {
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let signed = sign_claim(&key, random_claim(&mut rng))?;

    for i in 0..NUM_CLAIM_FIELD_BYTES {
        let mask = rng.gen_range(1..=u8::MAX);
        let tampered = SignedClaim {
            claim: mutate_claim_byte(&signed.claim, i, mask),
            ..signed
        };

        let mut ledger = MemoryClaimLedger::new();
        let res = native_verify(&tampered, key.address(), &mut ledger);
        assert!(
            matches!(res, Err(VerifierError::SignerMismatch { .. })),
            "mutating byte {i} gave {res:?}"
        );
        assert!(ledger.is_empty());
    }

    Ok(())
}

#[test]
fn test_raw_digest_signature_rejected() -> Result<()> {
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let claim = random_claim(&mut rng);

    // Signed over the digest itself, skipping the prefix transform
    let digest = build_digest::<NativeHasher>(&claim);
    let signature = to_reward_signature(&key.sign_hash_sync(&digest)?);
    let signed = SignedClaim { claim, signature };

    let mut ledger = MemoryClaimLedger::new();
    assert!(matches!(
        native_verify(&signed, key.address(), &mut ledger),
        Err(VerifierError::SignerMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_recovery_id_forms() -> Result<()> {
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let signed = sign_claim(&key, random_claim(&mut rng))?;
    assert!([27, 28].contains(&signed.signature.v()));

    // The raw 0 / 1 form verifies just as well
    let mut bytes = *signed.signature.as_bytes();
    bytes[NUM_BYTES_SIGNATURE - 1] -= 27;
    let raw_v = SignedClaim {
        signature: RewardSignature::from_slice(&bytes).map_err(|e| eyre!("{e}"))?,
        ..signed
    };

    let mut ledger = MemoryClaimLedger::new();
    assert_eq!(native_verify(&raw_v, key.address(), &mut ledger), Ok(()));
    Ok(())
}

#[test]
fn test_malformed_signatures() -> Result<()> {
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let signed = sign_claim(&key, random_claim(&mut rng))?;
    let sig = signed.signature;
    let curve_order = SECP256K1_HALF_ORDER * U256::from(2_u64) + U256::from(1_u64);

    let with_v = |v: u8| {
        let mut bytes = *sig.as_bytes();
        bytes[NUM_BYTES_SIGNATURE - 1] = v;
        RewardSignature::from_slice(&bytes)
    };
    let y_parity = sig.recovery_id() == Some(1);

    let malformed = [
        // Unknown recovery identifiers
        with_v(2).map_err(|e| eyre!("{e}"))?,
        with_v(29).map_err(|e| eyre!("{e}"))?,
        // Zero scalars
        RewardSignature::from_parts(U256::ZERO, sig.s(), y_parity),
        RewardSignature::from_parts(sig.r(), U256::ZERO, y_parity),
        // The malleable high-s twin of a valid signature
        RewardSignature::from_parts(sig.r(), curve_order - sig.s(), !y_parity),
    ];

    for signature in malformed {
        let mut ledger = MemoryClaimLedger::new();
        let tampered = SignedClaim { signature, ..signed };
        assert_eq!(
            native_verify(&tampered, key.address(), &mut ledger),
            Err(VerifierError::MalformedSignature)
        );
        assert!(ledger.is_empty());
    }

    Ok(())
}

#[test]
fn test_zero_amount_rejected() -> Result<()> {
    let key = PrivateKeySigner::random();
    let signed = sign_claim(
        &key,
        Claim {
            account: TEST_ACCOUNT,
            amount: U256::ZERO,
            nonce: U256::from(1_u64),
            contract: TEST_CONTRACT,
        },
    )?;

    let mut ledger = MemoryClaimLedger::new();
    assert_eq!(
        native_verify(&signed, key.address(), &mut ledger),
        Err(VerifierError::AmountInvalid)
    );
    assert!(ledger.is_empty());
    Ok(())
}

#[test]
fn test_claim_bound_to_contract() -> Result<()> {
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let verifier = setup_verifier(&key)?;

    // Signed for another deployment of the same contract
    let foreign = sign_claim(
        &key,
        Claim {
            contract: random_address(&mut rng),
            ..random_claim(&mut rng)
        },
    )?;

    let mut ledger = MemoryClaimLedger::new();
    assert_eq!(
        verifier.verify(&foreign.claim, &foreign.signature, &mut ledger),
        Err(VerifierError::ContractMismatch {
            presented: foreign.claim.contract
        })
    );
    assert!(ledger.is_empty());
    Ok(())
}

#[test]
fn test_bound_verifier_single_byte_mutations_rejected() -> Result<()> {
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let verifier = setup_verifier(&key)?;
    let signed = sign_claim(&key, random_claim(&mut rng))?;

    for i in 0..NUM_CLAIM_FIELD_BYTES {
        let mask = rng.gen_range(1..=u8::MAX);
        let tampered = mutate_claim_byte(&signed.claim, i, mask);

        let mut ledger = MemoryClaimLedger::new();
        let res = verifier.verify(&tampered, &signed.signature, &mut ledger);
        assert!(
            matches!(res, Err(VerifierError::SignerMismatch { .. })),
            "mutating byte {i} gave {res:?}"
        );
        assert!(ledger.is_empty());
    }

    // The untampered claim still verifies
    let mut ledger = MemoryClaimLedger::new();
    assert_eq!(
        verifier.verify(&signed.claim, &signed.signature, &mut ledger),
        Ok(())
    );
    Ok(())
}

#[test]
fn test_authorizer_single_byte_mutations_rejected() -> Result<()> {
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let authorizer = ClaimAuthorizer::new(setup_verifier(&key)?, SharedClaimLedger::in_memory());
    let signed = sign_claim(&key, random_claim(&mut rng))?;

    for i in 0..NUM_CLAIM_FIELD_BYTES {
        let mask = rng.gen_range(1..=u8::MAX);
        let tampered = SignedClaim {
            claim: mutate_claim_byte(&signed.claim, i, mask),
            ..signed
        };

        let res = authorizer.authorize(&tampered);
        assert!(
            matches!(
                res,
                Err(AuthorizationError::Rejected(VerifierError::SignerMismatch { .. }))
            ),
            "mutating byte {i} gave {res:?}"
        );
    }

    assert!(authorizer.ledger().is_empty()?);
    authorizer.authorize(&signed)?;
    Ok(())
}

#[test]
fn test_signer_rotation() -> Result<()> {
    let mut rng = thread_rng();
    let old_key = PrivateKeySigner::random();
    let new_key = PrivateKeySigner::random();
    let mut verifier = setup_verifier(&old_key)?;
    let mut ledger = MemoryClaimLedger::new();

    let before = sign_claim(&old_key, random_claim(&mut rng))?;
    verifier
        .verify(&before.claim, &before.signature, &mut ledger)
        .map_err(|e| eyre!("{e}"))?;

    assert_eq!(
        verifier.rotate_trusted_signer(TEST_CONTRACT, new_key.address()),
        Err(VerifierError::Unauthorized)
    );
    verifier
        .rotate_trusted_signer(TEST_OWNER, new_key.address())
        .map_err(|e| eyre!("{e}"))?;

    let stale = sign_claim(&old_key, random_claim(&mut rng))?;
    assert!(matches!(
        verifier.verify(&stale.claim, &stale.signature, &mut ledger),
        Err(VerifierError::SignerMismatch { .. })
    ));

    // Consumed nonces survive the rotation
    let resigned = sign_claim(&new_key, before.claim)?;
    assert_eq!(
        verifier.verify(&resigned.claim, &resigned.signature, &mut ledger),
        Err(VerifierError::NonceReplayed)
    );
    Ok(())
}

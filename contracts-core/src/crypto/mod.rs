//! Cryptographic primitives of the reward authorization protocol

pub mod ecdsa;
pub mod hash;

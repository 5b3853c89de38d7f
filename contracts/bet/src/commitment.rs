//! Commitment hashing for the commit-reveal protocol.
//!
//! The guess space is small, so a bare `sha256(guess)` could be copied by a
//! third party who submits the same hash and later reveals the same guess.
//! Binding the voter's address into the preimage makes every commitment
//! personal: a copied hash never verifies for anyone but its author.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env};

const COMMITMENT_DOMAIN: &[u8] = b"stellarbet:commit:v1";

/// `sha256(domain || xdr(voter) || guess_be32)`.
///
/// Holds no state; voters compute the same value off-chain or through the
/// read-only `get_hash` entry point.
pub fn hash_guess(env: &Env, voter: &Address, guess: u32) -> BytesN<32> {
    let mut preimage = Bytes::from_slice(env, COMMITMENT_DOMAIN);
    preimage.append(&voter.clone().to_xdr(env));
    preimage.append(&Bytes::from_array(env, &guess.to_be_bytes()));
    env.crypto().sha256(&preimage).into()
}

pub fn matches(env: &Env, voter: &Address, guess: u32, committed: &BytesN<32>) -> bool {
    &hash_guess(env, voter, guess) == committed
}

/// Fold one more commitment into the round's running digest.
pub fn chain_digest(env: &Env, digest: &BytesN<32>, commitment: &BytesN<32>) -> BytesN<32> {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(&digest.to_array());
    preimage[32..].copy_from_slice(&commitment.to_array());
    env.crypto().sha256(&Bytes::from_slice(env, &preimage)).into()
}

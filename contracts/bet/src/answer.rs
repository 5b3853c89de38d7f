//! Answer derivation at lock time.
//!
//! The answer is computed as:
//!
//!   `min_guess + u64_be(sha256(round_id_be || sequence_be || timestamp_be || entropy_be || commit_digest)[0..8])
//!        % (max_guess - min_guess + 1)`
//!
//! `entropy` is drawn from the host PRNG inside the `lock_votes` invocation.
//! The network seeds that PRNG per transaction, so the owner cannot know the
//! value when submitting `lock_votes`, and choosing the lock ledger does not
//! choose the answer. `commit_digest` chains every commitment of the round,
//! so the value also depends on every hashed vote. Every input is stored in
//! an [`AnswerProof`] so any observer can recompute the result.

use soroban_sdk::{Bytes, BytesN, Env};

use crate::types::{AnswerProof, BetConfig, RoundState};

/// Fix the answer for `round` from the current ledger and fresh entropy.
pub fn fix_answer(env: &Env, round: &RoundState, config: &BetConfig) -> AnswerProof {
    let ledger_sequence = env.ledger().sequence();
    let ledger_timestamp = env.ledger().timestamp();
    let entropy: u64 = env.prng().gen();
    let answer = derive_answer(
        env,
        round.round_id,
        ledger_sequence,
        ledger_timestamp,
        entropy,
        &round.commit_digest,
        config.min_guess,
        config.max_guess,
    );

    AnswerProof {
        round_id: round.round_id,
        ledger_sequence,
        ledger_timestamp,
        entropy,
        commit_digest: round.commit_digest.clone(),
        min_guess: config.min_guess,
        max_guess: config.max_guess,
        answer,
    }
}

/// Recompute `proof.answer` from its own inputs.
pub fn verify(env: &Env, proof: &AnswerProof) -> bool {
    if proof.min_guess > proof.max_guess {
        return false;
    }
    derive_answer(
        env,
        proof.round_id,
        proof.ledger_sequence,
        proof.ledger_timestamp,
        proof.entropy,
        &proof.commit_digest,
        proof.min_guess,
        proof.max_guess,
    ) == proof.answer
}

/// Produces a value in `[min_guess, max_guess]`. Callers guarantee
/// `min_guess <= max_guess`.
#[allow(clippy::too_many_arguments)]
fn derive_answer(
    env: &Env,
    round_id: u64,
    ledger_sequence: u32,
    ledger_timestamp: u64,
    entropy: u64,
    commit_digest: &BytesN<32>,
    min_guess: u32,
    max_guess: u32,
) -> u32 {
    let mut preimage = [0u8; 60];
    preimage[..8].copy_from_slice(&round_id.to_be_bytes());
    preimage[8..12].copy_from_slice(&ledger_sequence.to_be_bytes());
    preimage[12..20].copy_from_slice(&ledger_timestamp.to_be_bytes());
    preimage[20..28].copy_from_slice(&entropy.to_be_bytes());
    preimage[28..].copy_from_slice(&commit_digest.to_array());

    let digest: BytesN<32> = env.crypto().sha256(&Bytes::from_slice(env, &preimage)).into();
    let arr = digest.to_array();
    let raw = u64::from_be_bytes([arr[0], arr[1], arr[2], arr[3], arr[4], arr[5], arr[6], arr[7]]);

    let span = u64::from(max_guess - min_guess) + 1;
    // raw % span < span <= u32::MAX + 1, and min_guess + offset <= max_guess.
    min_guess + (raw % span) as u32
}

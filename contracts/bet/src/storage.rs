//! Storage layout and typed accessors.
//!
//! - `instance()`: Owner, Token, Config, Round, Winners. Small and fixed
//!   size; the round is replaced wholesale on every `start_new_vote`.
//! - `persistent()`: everything scoped to a round id (participants, their
//!   records, payouts, answer proofs). Starting a new round makes the old
//!   entries unreachable from the current round while keeping unsettled
//!   payouts retryable. TTL is extended on every write.

use soroban_sdk::{contracttype, Address, Env, IntoVal, Val, Vec};

use crate::{
    errors::Error,
    types::{AnswerProof, BetConfig, ParticipantRecord, Payout, RoundState},
};

/// Persistent storage TTL in ledgers (~30 days at 5 s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // --- instance() ---
    Owner,
    Token,
    Config,
    Round,
    /// Winner set of the last finished round.
    Winners,
    // --- persistent() ---
    /// ParticipantRecord keyed by (round_id, voter).
    Participant(u64, Address),
    /// Vec<Address> of committers in commit order.
    Participants(u64),
    /// Payout keyed by (round_id, recipient).
    Payout(u64, Address),
    AnswerProof(u64),
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

pub fn require_initialized(env: &Env) -> Result<(), Error> {
    if !env.storage().instance().has(&DataKey::Owner) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

pub fn get_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

/// Capability check for owner-only entry points.
pub fn require_owner(env: &Env, caller: &Address) -> Result<Address, Error> {
    let owner = get_owner(env)?;
    caller.require_auth();
    if caller != &owner {
        return Err(Error::Unauthorized);
    }
    Ok(owner)
}

// ---------------------------------------------------------------------------
// Instance entries
// ---------------------------------------------------------------------------

pub fn get_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn get_config(env: &Env) -> Result<BetConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn get_round(env: &Env) -> Result<RoundState, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Round)
        .ok_or(Error::NotInitialized)
}

pub fn set_round(env: &Env, round: &RoundState) {
    env.storage().instance().set(&DataKey::Round, round);
}

pub fn get_winners(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Winners)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_winners(env: &Env, winners: &Vec<Address>) {
    env.storage().instance().set(&DataKey::Winners, winners);
}

// ---------------------------------------------------------------------------
// Persistent entries
// ---------------------------------------------------------------------------

fn set_persistent<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

pub fn has_participant(env: &Env, round_id: u64, voter: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Participant(round_id, voter.clone()))
}

pub fn get_participant(env: &Env, round_id: u64, voter: &Address) -> Option<ParticipantRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Participant(round_id, voter.clone()))
}

pub fn set_participant(env: &Env, round_id: u64, voter: &Address, record: &ParticipantRecord) {
    set_persistent(env, &DataKey::Participant(round_id, voter.clone()), record);
}

pub fn get_participants(env: &Env, round_id: u64) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Participants(round_id))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_participants(env: &Env, round_id: u64, participants: &Vec<Address>) {
    set_persistent(env, &DataKey::Participants(round_id), participants);
}

pub fn get_payout(env: &Env, round_id: u64, recipient: &Address) -> Option<Payout> {
    env.storage()
        .persistent()
        .get(&DataKey::Payout(round_id, recipient.clone()))
}

pub fn set_payout(env: &Env, round_id: u64, recipient: &Address, payout: &Payout) {
    set_persistent(env, &DataKey::Payout(round_id, recipient.clone()), payout);
}

pub fn get_answer_proof(env: &Env, round_id: u64) -> Option<AnswerProof> {
    env.storage()
        .persistent()
        .get(&DataKey::AnswerProof(round_id))
}

pub fn set_answer_proof(env: &Env, proof: &AnswerProof) {
    set_persistent(env, &DataKey::AnswerProof(proof.round_id), proof);
}

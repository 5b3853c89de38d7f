//! Stellarbet Closest-Guess Contract
//!
//! A commit-reveal betting round. Voters stake tokens behind a hashed guess,
//! the owner locks the round (fixing an answer nobody could know in
//! advance), voters reveal, and the pool goes to whoever guessed closest.
//!
//! ## Round Flow
//! 1. Owner calls `start_new_vote` → a fresh Open round (round 1 is opened
//!    by `init`).
//! 2. Voters compute `get_hash(voter, guess)` and call `cast_hashed_vote`
//!    with that hash and a stake, which is transferred into escrow.
//! 3. Owner calls `lock_votes` → the answer is derived and the round is Locked.
//! 4. Voters call `cast_vote` with their plaintext guess, verified against
//!    their commitment.
//! 5. Owner calls `finish_vote` → winners resolved, payouts recorded and
//!    transferred, round Finished.
//!
//! ## Abandoned Rounds
//! `start_new_vote` may be called in any phase. A round replaced before it
//! finished refunds every stake through the payout ledger; any rollover it
//! carried moves on to the next round.
//!
//! ## Storage Strategy
//! See [`storage`]: singletons in `instance()`, round-scoped entries in
//! `persistent()` keyed by round id.
#![no_std]
#![allow(unexpected_cfgs)]

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Vec};

pub mod answer;
pub mod commitment;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod resolver;
pub mod storage;
pub mod types;

pub use errors::Error;
pub use types::{
    AnswerProof, BetConfig, BetEntry, NoWinnerPolicy, ParticipantRecord, Payout, Phase,
    RoundState, SplitMode,
};

use events::{HashedVoteCast, RoundAbandoned, VoteFinished, VoteRevealed, VoteStarted, VotesLocked};
use storage::DataKey;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound for `BetConfig::max_participants`.
/// Bounds the O(n) iteration in finish_vote and start_new_vote.
pub const MAX_PARTICIPANTS_PER_ROUND: u32 = 500;

pub const MAX_FEE_BPS: u32 = 10_000;

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct Bet;

#[contractimpl]
impl Bet {
    // -----------------------------------------------------------------------
    // init
    // -----------------------------------------------------------------------

    /// Initialize the contract and open round 1. May only be called once.
    ///
    /// `token` is the SEP-41 contract used for every stake and payout.
    /// `owner` is the only address allowed to drive phase transitions and
    /// cannot be changed afterwards.
    pub fn init(env: Env, owner: Address, token: Address, config: BetConfig) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();
        validate_config(&config)?;

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Config, &config);

        storage::set_round(&env, &RoundState::opening(&env, 1, 0));
        storage::set_winners(&env, &Vec::new(&env));

        VoteStarted { round_id: 1, rollover_in: 0 }.publish(&env);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Phase transitions (owner only)
    // -----------------------------------------------------------------------

    /// Replace the current round with a fresh Open one. Owner only, any phase.
    ///
    /// A Finished round hands its `carry_out` to the new round. An Open or
    /// Locked round is abandoned: every stake is refunded and its
    /// `rollover_in` moves on. Returns the new round id.
    pub fn start_new_vote(env: Env, caller: Address) -> Result<u64, Error> {
        storage::require_owner(&env, &caller)?;

        let previous = storage::get_round(&env)?;
        let carry = match previous.phase {
            Phase::Finished => previous.carry_out,
            Phase::Open | Phase::Locked => {
                let refunds = escrow::refund_shares(&env, previous.round_id)?;
                let refunded = escrow::total(&refunds)?;
                let token = storage::get_token(&env)?;
                escrow::disburse(&env, &token, previous.round_id, &refunds)?;

                RoundAbandoned { round_id: previous.round_id, refunded }.publish(&env);
                previous.rollover_in
            }
        };

        let round_id = previous.round_id.checked_add(1).ok_or(Error::Overflow)?;
        storage::set_round(&env, &RoundState::opening(&env, round_id, carry));

        VoteStarted { round_id, rollover_in: carry }.publish(&env);

        Ok(round_id)
    }

    /// Fix the answer and move Open → Locked. Owner only. Returns the answer.
    pub fn lock_votes(env: Env, caller: Address) -> Result<u32, Error> {
        storage::require_owner(&env, &caller)?;

        let mut round = storage::get_round(&env)?;
        if round.phase != Phase::Open {
            return Err(Error::InvalidPhase);
        }

        let config = storage::get_config(&env)?;
        let proof = answer::fix_answer(&env, &round, &config);

        round.answer = Some(proof.answer);
        round.phase = Phase::Locked;
        storage::set_answer_proof(&env, &proof);
        storage::set_round(&env, &round);

        VotesLocked {
            round_id: round.round_id,
            answer: proof.answer,
            ledger_sequence: proof.ledger_sequence,
            commit_digest: proof.commit_digest,
        }
        .publish(&env);

        Ok(proof.answer)
    }

    /// Resolve winners, pay out and move Locked → Finished. Owner only.
    ///
    /// All shares are computed and the round is marked Finished before any
    /// token leaves the contract. A recipient whose transfer fails keeps an
    /// unsettled payout for `retry_payout`. Returns the winners.
    pub fn finish_vote(env: Env, caller: Address) -> Result<Vec<Address>, Error> {
        let owner = storage::require_owner(&env, &caller)?;

        let mut round = storage::get_round(&env)?;
        if round.phase != Phase::Locked {
            return Err(Error::InvalidPhase);
        }
        let answer = round.answer.ok_or(Error::AnswerNotSet)?;

        let config = storage::get_config(&env)?;
        let participants = storage::get_participants(&env, round.round_id);
        let winners = resolver::closest_guessers(&env, round.round_id, &participants, answer);

        let pool = round.pool()?;
        let settlement = resolver::split_pool(&env, &config, &owner, pool, &winners)?;

        let mut winner_addresses: Vec<Address> = Vec::new(&env);
        for winner in winners.iter() {
            winner_addresses.push_back(winner.voter);
        }

        round.carry_out = settlement.carry;
        round.phase = Phase::Finished;
        storage::set_round(&env, &round);
        storage::set_winners(&env, &winner_addresses);

        VoteFinished {
            round_id: round.round_id,
            answer,
            pool,
            winner_count: winner_addresses.len(),
            carry_out: settlement.carry,
        }
        .publish(&env);

        let token = storage::get_token(&env)?;
        escrow::disburse(&env, &token, round.round_id, &settlement.shares)?;

        Ok(winner_addresses)
    }

    // -----------------------------------------------------------------------
    // Commit
    // -----------------------------------------------------------------------

    /// Commitment a voter must submit for `guess`. Pure; no auth required.
    ///
    /// Any `u32` hashes, but guesses outside `[min_guess, max_guess]` can
    /// never be revealed, so a stake committed on one is forfeit.
    pub fn get_hash(env: Env, voter: Address, guess: u32) -> BytesN<32> {
        commitment::hash_guess(&env, &voter, guess)
    }

    /// Commit a hashed guess and escrow `stake`. Open phase, once per round.
    ///
    /// The guess is hidden here, so its range is only checked by `cast_vote`.
    pub fn cast_hashed_vote(
        env: Env,
        voter: Address,
        hash: BytesN<32>,
        stake: i128,
    ) -> Result<(), Error> {
        let mut round = storage::get_round(&env)?;
        voter.require_auth();

        if round.phase != Phase::Open {
            return Err(Error::InvalidPhase);
        }
        if storage::has_participant(&env, round.round_id, &voter) {
            return Err(Error::AlreadyCommitted);
        }
        if stake <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = storage::get_config(&env)?;
        if round.participant_count >= config.max_participants {
            return Err(Error::RoundFull);
        }

        let token = storage::get_token(&env)?;
        escrow::deposit(&env, &token, &voter, stake);

        let record = ParticipantRecord {
            committed_hash: hash.clone(),
            stake,
            revealed_guess: None,
            has_revealed: false,
        };
        storage::set_participant(&env, round.round_id, &voter, &record);

        let mut participants = storage::get_participants(&env, round.round_id);
        participants.push_back(voter.clone());
        storage::set_participants(&env, round.round_id, &participants);

        round.total_staked = round.total_staked.checked_add(stake).ok_or(Error::Overflow)?;
        round.participant_count = round
            .participant_count
            .checked_add(1)
            .ok_or(Error::Overflow)?;
        round.commit_digest = commitment::chain_digest(&env, &round.commit_digest, &hash);
        storage::set_round(&env, &round);

        HashedVoteCast {
            round_id: round.round_id,
            voter,
            commitment: hash,
            stake,
            total_staked: round.total_staked,
        }
        .publish(&env);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reveal
    // -----------------------------------------------------------------------

    /// Reveal the plaintext guess behind the voter's commitment. Locked phase.
    ///
    /// An out-of-range guess fails with `InvalidGuess` before the commitment
    /// is checked.
    pub fn cast_vote(env: Env, voter: Address, guess: u32) -> Result<(), Error> {
        let mut round = storage::get_round(&env)?;
        voter.require_auth();

        if round.phase != Phase::Locked {
            return Err(Error::InvalidPhase);
        }

        let mut record = storage::get_participant(&env, round.round_id, &voter)
            .ok_or(Error::NotCommitted)?;
        if record.has_revealed {
            return Err(Error::AlreadyRevealed);
        }

        let config = storage::get_config(&env)?;
        if guess < config.min_guess || guess > config.max_guess {
            return Err(Error::InvalidGuess);
        }
        if !commitment::matches(&env, &voter, guess, &record.committed_hash) {
            return Err(Error::CommitmentMismatch);
        }

        record.revealed_guess = Some(guess);
        record.has_revealed = true;
        storage::set_participant(&env, round.round_id, &voter, &record);

        round.revealed_count = round.revealed_count.checked_add(1).ok_or(Error::Overflow)?;
        storage::set_round(&env, &round);

        VoteRevealed { round_id: round.round_id, voter, guess }.publish(&env);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Payouts
    // -----------------------------------------------------------------------

    /// Settle a payout whose transfer failed earlier.
    ///
    /// Callable by the owner or by the recipient. Returns the amount paid.
    pub fn retry_payout(
        env: Env,
        caller: Address,
        round_id: u64,
        recipient: Address,
    ) -> Result<i128, Error> {
        let owner = storage::get_owner(&env)?;
        caller.require_auth();
        if caller != owner && caller != recipient {
            return Err(Error::Unauthorized);
        }

        let token = storage::get_token(&env)?;
        if !escrow::try_settle(&env, &token, round_id, &recipient)? {
            return Err(Error::TransferFailed);
        }

        storage::get_payout(&env, round_id, &recipient)
            .map(|payout| payout.amount)
            .ok_or(Error::PayoutNotFound)
    }

    pub fn get_payout(env: Env, round_id: u64, recipient: Address) -> Result<Payout, Error> {
        storage::require_initialized(&env)?;
        storage::get_payout(&env, round_id, &recipient).ok_or(Error::PayoutNotFound)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_phase(env: Env) -> Result<Phase, Error> {
        Ok(storage::get_round(&env)?.phase)
    }

    /// `None` until `lock_votes` has run in the current round.
    pub fn get_answer(env: Env) -> Result<Option<u32>, Error> {
        Ok(storage::get_round(&env)?.answer)
    }

    /// Every committer of the current round with their stake, in commit order.
    pub fn get_bets(env: Env) -> Result<Vec<BetEntry>, Error> {
        let round = storage::get_round(&env)?;
        let mut bets = Vec::new(&env);
        for voter in storage::get_participants(&env, round.round_id).iter() {
            if let Some(record) = storage::get_participant(&env, round.round_id, &voter) {
                bets.push_back(BetEntry { voter, stake: record.stake });
            }
        }
        Ok(bets)
    }

    /// Winners of the most recently finished round.
    pub fn get_winners(env: Env) -> Result<Vec<Address>, Error> {
        storage::require_initialized(&env)?;
        Ok(storage::get_winners(&env))
    }

    pub fn get_round(env: Env) -> Result<RoundState, Error> {
        storage::get_round(&env)
    }

    pub fn get_config(env: Env) -> Result<BetConfig, Error> {
        storage::get_config(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, Error> {
        storage::get_owner(&env)
    }

    /// The voter's record in the current round.
    pub fn get_participant(env: Env, voter: Address) -> Result<ParticipantRecord, Error> {
        let round = storage::get_round(&env)?;
        storage::get_participant(&env, round.round_id, &voter).ok_or(Error::NotCommitted)
    }

    pub fn get_answer_proof(env: Env, round_id: u64) -> Result<AnswerProof, Error> {
        storage::require_initialized(&env)?;
        storage::get_answer_proof(&env, round_id).ok_or(Error::AnswerNotSet)
    }

    /// Recompute an answer from its proof inputs.
    pub fn verify_answer(env: Env, proof: AnswerProof) -> bool {
        answer::verify(&env, &proof)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_config(config: &BetConfig) -> Result<(), Error> {
    if config.min_guess >= config.max_guess {
        return Err(Error::InvalidConfig);
    }
    if config.max_participants == 0 || config.max_participants > MAX_PARTICIPANTS_PER_ROUND {
        return Err(Error::InvalidConfig);
    }
    if config.owner_fee_bps > MAX_FEE_BPS {
        return Err(Error::InvalidConfig);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

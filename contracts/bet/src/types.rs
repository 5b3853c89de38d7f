use soroban_sdk::{contracttype, Address, BytesN, Env};

use crate::errors::Error;

/// Round lifecycle: Open → Locked → Finished, then back to Open through
/// `start_new_vote`.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Accepting hashed votes and stakes.
    Open     = 0,
    /// Answer fixed; accepting reveals.
    Locked   = 1,
    /// Winners resolved and payouts recorded.
    Finished = 2,
}

/// How a pool with winners is divided between them.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SplitMode {
    Equal         = 0,
    StakeWeighted = 1,
}

/// Where the pool goes when nobody revealed.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NoWinnerPolicy {
    /// Carried into the next round's pool.
    Rollover = 0,
    /// Paid to the owner.
    Owner    = 1,
}

/// Contract configuration, fixed at `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BetConfig {
    /// Inclusive lower bound of accepted guesses and of the answer.
    pub min_guess:        u32,
    /// Inclusive upper bound of accepted guesses and of the answer.
    pub max_guess:        u32,
    pub max_participants: u32,
    /// Owner cut of a pool that has winners, in basis points.
    pub owner_fee_bps:    u32,
    pub split:            SplitMode,
    pub no_winner:        NoWinnerPolicy,
}

/// The single active round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundState {
    pub round_id:          u64,
    pub phase:             Phase,
    /// `None` until `lock_votes` fixes it.
    pub answer:            Option<u32>,
    /// Sum of every stake committed this round.
    pub total_staked:      i128,
    /// Funds carried in from the previous round.
    pub rollover_in:       i128,
    /// Funds left for the next round; set by `finish_vote`.
    pub carry_out:         i128,
    pub participant_count: u32,
    pub revealed_count:    u32,
    /// SHA-256 chain over every commitment, in commit order.
    pub commit_digest:     BytesN<32>,
}

impl RoundState {
    pub fn opening(env: &Env, round_id: u64, rollover_in: i128) -> Self {
        RoundState {
            round_id,
            phase: Phase::Open,
            answer: None,
            total_staked: 0,
            rollover_in,
            carry_out: 0,
            participant_count: 0,
            revealed_count: 0,
            commit_digest: BytesN::from_array(env, &[0u8; 32]),
        }
    }

    /// Everything the contract holds on behalf of this round.
    pub fn pool(&self) -> Result<i128, Error> {
        self.rollover_in
            .checked_add(self.total_staked)
            .ok_or(Error::Overflow)
    }
}

/// A voter's commitment and, once revealed, their guess.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParticipantRecord {
    pub committed_hash: BytesN<32>,
    pub stake:          i128,
    pub revealed_guess: Option<u32>,
    pub has_revealed:   bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BetEntry {
    pub voter: Address,
    pub stake: i128,
}

/// Amount owed to one recipient for one round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payout {
    pub amount:  i128,
    /// Cleared while the transfer is still outstanding.
    pub settled: bool,
}

/// Every input of the answer derivation, kept so anyone can recompute it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnswerProof {
    pub round_id:         u64,
    pub ledger_sequence:  u32,
    pub ledger_timestamp: u64,
    /// Host PRNG draw made inside `lock_votes`.
    pub entropy:          u64,
    pub commit_digest:    BytesN<32>,
    pub min_guess:        u32,
    pub max_guess:        u32,
    pub answer:           u32,
}

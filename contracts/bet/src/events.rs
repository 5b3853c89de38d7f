use soroban_sdk::{contractevent, Address, BytesN};

#[contractevent]
pub struct VoteStarted {
    #[topic]
    pub round_id: u64,
    pub rollover_in: i128,
}

/// A round was replaced before it finished; its stakes were refunded.
#[contractevent]
pub struct RoundAbandoned {
    #[topic]
    pub round_id: u64,
    pub refunded: i128,
}

#[contractevent]
pub struct HashedVoteCast {
    #[topic]
    pub round_id: u64,
    #[topic]
    pub voter: Address,
    pub commitment: BytesN<32>,
    pub stake: i128,
    pub total_staked: i128,
}

/// Carries the proof inputs so verifiers do not need a `get_answer_proof` call.
#[contractevent]
pub struct VotesLocked {
    #[topic]
    pub round_id: u64,
    pub answer: u32,
    pub ledger_sequence: u32,
    pub commit_digest: BytesN<32>,
}

#[contractevent]
pub struct VoteRevealed {
    #[topic]
    pub round_id: u64,
    #[topic]
    pub voter: Address,
    pub guess: u32,
}

#[contractevent]
pub struct VoteFinished {
    #[topic]
    pub round_id: u64,
    pub answer: u32,
    pub pool: i128,
    pub winner_count: u32,
    pub carry_out: i128,
}

#[contractevent]
pub struct PayoutSettled {
    #[topic]
    pub round_id: u64,
    #[topic]
    pub recipient: Address,
    pub amount: i128,
}

/// The transfer failed; the payout stays recorded for `retry_payout`.
#[contractevent]
pub struct PayoutDeferred {
    #[topic]
    pub round_id: u64,
    #[topic]
    pub recipient: Address,
    pub amount: i128,
}

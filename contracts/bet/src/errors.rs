use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized   = 1,
    NotInitialized       = 2,
    /// Caller is not the owner on an owner-only entry point.
    Unauthorized         = 3,
    /// Entry point called outside the phase it requires.
    InvalidPhase         = 4,
    /// The voter already committed a hash this round.
    AlreadyCommitted     = 5,
    NotCommitted         = 6,
    AlreadyRevealed      = 7,
    /// The revealed guess does not hash to the stored commitment.
    CommitmentMismatch   = 8,
    InvalidAmount        = 9,
    /// Revealed guess lies outside `[min_guess, max_guess]`.
    InvalidGuess         = 10,
    InvalidConfig        = 11,
    RoundFull            = 12,
    Overflow             = 13,
    AnswerNotSet         = 14,
    PayoutNotFound       = 15,
    PayoutAlreadySettled = 16,
    /// The token contract rejected a payout transfer.
    TransferFailed       = 17,
}

//! Escrow of stakes and the payout ledger.
//!
//! Payouts are two-step: every amount of a settlement is written as an
//! unsettled [`Payout`] first, then each transfer is attempted on its own
//! through the `try_` token client. A recipient whose transfer fails keeps
//! an unsettled record that `retry_payout` can settle later; the other
//! recipients are paid regardless.
//!
//! ## Invariant
//! `token.balance(contract) == current round pool + sum(unsettled payouts)`,
//! assuming all inflows go through `cast_hashed_vote`.

use soroban_sdk::{token::TokenClient, Address, Env, Map};

use crate::{
    errors::Error,
    events::{PayoutDeferred, PayoutSettled},
    storage,
    types::Payout,
};

/// Pull `stake` from `voter` into the contract.
pub fn deposit(env: &Env, token: &Address, voter: &Address, stake: i128) {
    TokenClient::new(env, token).transfer(voter, env.current_contract_address(), &stake);
}

/// Add `amount` to `recipient`'s share. Zero amounts are not recorded.
pub fn credit(shares: &mut Map<Address, i128>, recipient: &Address, amount: i128) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    let current = shares.get(recipient.clone()).unwrap_or(0);
    let total = current.checked_add(amount).ok_or(Error::Overflow)?;
    shares.set(recipient.clone(), total);
    Ok(())
}

/// Shares returning every stake of `round_id` to its owner.
pub fn refund_shares(env: &Env, round_id: u64) -> Result<Map<Address, i128>, Error> {
    let mut shares = Map::new(env);
    for voter in storage::get_participants(env, round_id).iter() {
        if let Some(record) = storage::get_participant(env, round_id, &voter) {
            credit(&mut shares, &voter, record.stake)?;
        }
    }
    Ok(shares)
}

pub fn total(shares: &Map<Address, i128>) -> Result<i128, Error> {
    let mut sum: i128 = 0;
    for (_, amount) in shares.iter() {
        sum = sum.checked_add(amount).ok_or(Error::Overflow)?;
    }
    Ok(sum)
}

/// Record every share of `round_id`, then attempt each transfer.
///
/// Returns the number of transfers that were deferred.
pub fn disburse(
    env: &Env,
    token: &Address,
    round_id: u64,
    shares: &Map<Address, i128>,
) -> Result<u32, Error> {
    for (recipient, amount) in shares.iter() {
        storage::set_payout(env, round_id, &recipient, &Payout { amount, settled: false });
    }

    let mut deferred: u32 = 0;
    for (recipient, _) in shares.iter() {
        if !try_settle(env, token, round_id, &recipient)? {
            deferred = deferred.checked_add(1).ok_or(Error::Overflow)?;
        }
    }
    Ok(deferred)
}

/// Attempt the transfer for one recorded payout.
///
/// `Ok(false)` means the token contract rejected the transfer and the record
/// was left unsettled.
pub fn try_settle(env: &Env, token: &Address, round_id: u64, recipient: &Address) -> Result<bool, Error> {
    let mut payout = storage::get_payout(env, round_id, recipient).ok_or(Error::PayoutNotFound)?;
    if payout.settled {
        return Err(Error::PayoutAlreadySettled);
    }

    let transferred = matches!(
        TokenClient::new(env, token).try_transfer(
            &env.current_contract_address(),
            recipient,
            &payout.amount,
        ),
        Ok(Ok(()))
    );

    if !transferred {
        PayoutDeferred {
            round_id,
            recipient: recipient.clone(),
            amount: payout.amount,
        }
        .publish(env);
        return Ok(false);
    }

    payout.settled = true;
    storage::set_payout(env, round_id, recipient, &payout);

    PayoutSettled {
        round_id,
        recipient: recipient.clone(),
        amount: payout.amount,
    }
    .publish(env);

    Ok(true)
}

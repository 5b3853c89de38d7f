//! Winner resolution and pool split.
//!
//! Winners are the revealed participants whose guess minimises
//! `|guess - answer|`; every participant at the minimal distance wins.
//!
//! ## Split
//! With winners, the owner takes `pool * owner_fee_bps / 10000` and the
//! rest is divided per [`SplitMode`] with integer division. The fee and the
//! division remainder both go to the owner, so the shares always sum to the
//! pool. Without winners the pool follows [`NoWinnerPolicy`].

use soroban_sdk::{Address, Env, Map, Vec};

use crate::{
    errors::Error,
    escrow::credit,
    storage,
    types::{BetConfig, BetEntry, NoWinnerPolicy, SplitMode},
};

const BASIS_POINTS_DIVISOR: i128 = 10_000;

/// Amounts owed per recipient, plus whatever carries into the next round.
pub struct Settlement {
    pub shares: Map<Address, i128>,
    pub carry:  i128,
}

/// Revealed participants closest to `answer`, in commit order.
pub fn closest_guessers(
    env: &Env,
    round_id: u64,
    participants: &Vec<Address>,
    answer: u32,
) -> Vec<BetEntry> {
    let mut winners: Vec<BetEntry> = Vec::new(env);
    let mut best: Option<u32> = None;

    // Bounded by max_participants enforced in cast_hashed_vote.
    for voter in participants.iter() {
        let Some(record) = storage::get_participant(env, round_id, &voter) else {
            continue;
        };
        let Some(guess) = record.revealed_guess else {
            continue;
        };

        let distance = guess.abs_diff(answer);
        match best {
            Some(d) if distance > d => continue,
            Some(d) if distance == d => {}
            _ => {
                best = Some(distance);
                winners = Vec::new(env);
            }
        }
        winners.push_back(BetEntry { voter, stake: record.stake });
    }

    winners
}

/// Divide `pool` between `winners` and `owner`.
pub fn split_pool(
    env: &Env,
    config: &BetConfig,
    owner: &Address,
    pool: i128,
    winners: &Vec<BetEntry>,
) -> Result<Settlement, Error> {
    let mut shares = Map::new(env);
    if pool <= 0 {
        return Ok(Settlement { shares, carry: 0 });
    }

    if winners.is_empty() {
        return match config.no_winner {
            NoWinnerPolicy::Rollover => Ok(Settlement { shares, carry: pool }),
            NoWinnerPolicy::Owner => {
                credit(&mut shares, owner, pool)?;
                Ok(Settlement { shares, carry: 0 })
            }
        };
    }

    let fee = pool
        .checked_mul(i128::from(config.owner_fee_bps))
        .and_then(|v| v.checked_div(BASIS_POINTS_DIVISOR))
        .ok_or(Error::Overflow)?;
    let distributable = pool.checked_sub(fee).ok_or(Error::Overflow)?;

    let mut paid: i128 = 0;
    match config.split {
        SplitMode::Equal => {
            let each = distributable
                .checked_div(i128::from(winners.len()))
                .ok_or(Error::Overflow)?;
            for winner in winners.iter() {
                credit(&mut shares, &winner.voter, each)?;
                paid = paid.checked_add(each).ok_or(Error::Overflow)?;
            }
        }
        SplitMode::StakeWeighted => {
            let mut weight: i128 = 0;
            for winner in winners.iter() {
                weight = weight.checked_add(winner.stake).ok_or(Error::Overflow)?;
            }
            for winner in winners.iter() {
                let share = distributable
                    .checked_mul(winner.stake)
                    .and_then(|v| v.checked_div(weight))
                    .ok_or(Error::Overflow)?;
                credit(&mut shares, &winner.voter, share)?;
                paid = paid.checked_add(share).ok_or(Error::Overflow)?;
            }
        }
    }

    let remainder = pool.checked_sub(paid).ok_or(Error::Overflow)?;
    credit(&mut shares, owner, remainder)?;

    Ok(Settlement { shares, carry: 0 })
}

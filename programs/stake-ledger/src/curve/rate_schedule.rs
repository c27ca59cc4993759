//! Maturity rate schedule for term stakes

use crate::{error::ErrorCode, MAX_DURATION_MONTHS, MIN_DURATION_MONTHS, SECONDS_PER_MONTH};
use anchor_lang::prelude::*;

/// Rate, in percent, paid for the shortest lock.
pub const BASE_RATE: u64 = 25;
/// Rate, in percent, paid for the longest lock.
pub const MAX_RATE: u64 = 75;

/// Linear schedule from `BASE_RATE` at one month to `MAX_RATE` at two years.
///
/// Every intermediate step truncates, so the curve is a staircase and
/// must be reproduced exactly by anything that recomputes it off chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RateSchedule;

impl RateSchedule {
    pub fn is_valid_duration(duration: u64) -> bool {
        (MIN_DURATION_MONTHS..=MAX_DURATION_MONTHS).contains(&duration)
    }

    /// `((((d - 1) * 100) / 23) * 50 + 2500) / 100`
    pub fn rate_for(duration: u64) -> Option<u64> {
        if !Self::is_valid_duration(duration) {
            return None;
        }
        let span = MAX_DURATION_MONTHS - MIN_DURATION_MONTHS;
        let progress = (duration - MIN_DURATION_MONTHS).checked_mul(100)? / span;
        progress
            .checked_mul(50)?
            .checked_add(BASE_RATE * 100)?
            .checked_div(100)
    }

    /// Lock length in seconds for a duration in months.
    pub fn lock_seconds(duration: u64) -> Option<i64> {
        if !Self::is_valid_duration(duration) {
            return None;
        }
        i64::try_from(duration).ok()?.checked_mul(SECONDS_PER_MONTH)
    }
}

pub fn calculate_rate(duration: u64) -> Result<u64> {
    RateSchedule::rate_for(duration).ok_or_else(|| error!(ErrorCode::InvalidDuration))
}

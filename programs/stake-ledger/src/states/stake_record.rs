use crate::{
    curve::RateSchedule,
    error::ErrorCode,
    states::LegacyStakeRecord,
    utils::{load_program_account, store_program_account},
    STAKE_MODULUS,
};
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Stake Record Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed prefix for stake records: `[STAKE_SEED, tx_hash, addr]`.
pub const STAKE_SEED: &str = "stake";

/// Layout version written by this program. Version 1 is the legacy ledger's.
pub const STAKE_RECORD_VERSION: u8 = 2;

/// How a record came to exist.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StakeOrigin {
    #[default]
    Deposit,
    LegacyMigration,
}

/// Lifecycle position of a stake at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeStatus {
    /// Locked, `now < end_time`.
    Active,
    /// Lock elapsed, principal not yet returned.
    Matured,
    /// Principal returned. Terminal.
    Completed,
}

/// One term-locked deposit, identified by `(tx_hash, addr)`.
///
/// `rate`, `start_time` and `end_time` are fixed when the record is opened;
/// only `complete` ever changes afterwards, and only from `false` to `true`.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct StakeRecord {
    pub version: u8,
    pub origin: StakeOrigin,
    /// Hash of the transaction that created the stake.
    pub tx_hash: [u8; 32],
    /// Depositor; principal is always returned here.
    pub addr: Pubkey,
    /// Principal in base units.
    pub amount: u64,
    /// Percent rate from the schedule at creation time.
    pub rate: u64,
    /// Lock length in months.
    pub duration: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub complete: bool,
    pub bump: u8,
}

impl StakeRecord {
    /// Breakdown:
    /// - 8: discriminator
    /// - 1 + 1: version, origin
    /// - 32 + 32: tx hash, addr
    /// - 8 * 5: amount, rate, duration, start, end
    /// - 1 + 1: complete, bump
    pub const LEN: usize = 8 + 1 + 1 + 32 + 32 + 8 * 5 + 1 + 1;

    pub fn is_valid_amount(amount: u64) -> bool {
        amount > 0 && amount % STAKE_MODULUS == 0
    }

    /// A zeroed account handed over by `init_if_needed` has no owner yet.
    pub fn is_vacant(&self) -> bool {
        self.addr == Pubkey::default()
    }

    pub fn status(&self, now: i64) -> StakeStatus {
        if self.complete {
            StakeStatus::Completed
        } else if now < self.end_time {
            StakeStatus::Active
        } else {
            StakeStatus::Matured
        }
    }

    /// Fill a vacant record for a fresh deposit.
    pub fn open(
        &mut self,
        tx_hash: [u8; 32],
        addr: Pubkey,
        amount: u64,
        duration: u64,
        start_time: i64,
        bump: u8,
    ) -> Result<()> {
        require!(Self::is_valid_amount(amount), ErrorCode::InvalidAmount);
        let rate = RateSchedule::rate_for(duration).ok_or(ErrorCode::InvalidDuration)?;
        let lock = RateSchedule::lock_seconds(duration).ok_or(ErrorCode::InvalidDuration)?;
        let end_time = start_time.checked_add(lock).ok_or(ErrorCode::MathOverflow)?;

        *self = StakeRecord {
            version: STAKE_RECORD_VERSION,
            origin: StakeOrigin::Deposit,
            tx_hash,
            addr,
            amount,
            rate,
            duration,
            start_time,
            end_time,
            complete: false,
            bump,
        };
        Ok(())
    }

    /// Fill a vacant record from a legacy ledger entry, keeping its terms.
    pub fn migrate_from(&mut self, legacy: &LegacyStakeRecord, bump: u8) -> Result<()> {
        require!(!legacy.complete, ErrorCode::LegacyStakeCompleted);
        *self = StakeRecord {
            version: STAKE_RECORD_VERSION,
            origin: StakeOrigin::LegacyMigration,
            tx_hash: legacy.tx_hash,
            addr: legacy.addr,
            amount: legacy.amount,
            rate: legacy.rate,
            duration: legacy.duration,
            start_time: legacy.start_time,
            end_time: legacy.end_time,
            complete: false,
            bump,
        };
        Ok(())
    }

    /// Errors unless the record may be completed at `now`.
    pub fn ensure_completable(&self, now: i64) -> Result<()> {
        require!(now >= self.end_time, ErrorCode::NotMatured);
        require!(!self.complete, ErrorCode::AlreadyCompleted);
        Ok(())
    }

    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    /// Load a record from an unchecked account; absence is `StakeNotFound`.
    pub fn load(info: &AccountInfo) -> Result<StakeRecord> {
        load_program_account::<StakeRecord>(info)
            .filter(|record| !record.is_vacant())
            .ok_or_else(|| error!(ErrorCode::StakeNotFound))
    }

    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        store_program_account(self, info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SECONDS_PER_MONTH;
    use proptest::prelude::*;

    const START: i64 = 1_700_000_000;

    fn opened(duration: u64) -> StakeRecord {
        let mut record = StakeRecord::default();
        record
            .open([7u8; 32], Pubkey::new_unique(), 5 * STAKE_MODULUS, duration, START, 253)
            .unwrap();
        record
    }

    #[test]
    fn open_fixes_terms() {
        let record = opened(12);
        assert_eq!(record.version, STAKE_RECORD_VERSION);
        assert_eq!(record.origin, StakeOrigin::Deposit);
        assert_eq!(record.rate, 48);
        assert_eq!(record.end_time, START + 12 * SECONDS_PER_MONTH);
        assert!(!record.complete);
        assert!(!record.is_vacant());
    }

    #[test]
    fn open_rejects_bad_terms() {
        let mut record = StakeRecord::default();
        let addr = Pubkey::new_unique();
        assert!(record.open([0u8; 32], addr, 0, 12, START, 0).is_err());
        assert!(record.open([0u8; 32], addr, STAKE_MODULUS + 1, 12, START, 0).is_err());
        assert!(record.open([0u8; 32], addr, STAKE_MODULUS, 0, START, 0).is_err());
        assert!(record.open([0u8; 32], addr, STAKE_MODULUS, 25, START, 0).is_err());
        assert!(record.is_vacant());
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        let mut record = opened(1);
        assert_eq!(record.status(START), StakeStatus::Active);
        assert_eq!(record.status(record.end_time - 1), StakeStatus::Active);
        assert_eq!(record.status(record.end_time), StakeStatus::Matured);

        assert!(record.ensure_completable(record.end_time - 1).is_err());
        record.ensure_completable(record.end_time).unwrap();
        record.mark_complete();

        assert_eq!(record.status(record.end_time), StakeStatus::Completed);
        assert_eq!(record.status(START), StakeStatus::Completed);
        assert!(record.ensure_completable(record.end_time + 1).is_err());
    }

    #[test]
    fn immature_check_precedes_completed_check() {
        let mut record = opened(3);
        record.complete = true;
        let err = record.ensure_completable(START).unwrap_err();
        assert_eq!(err, error!(ErrorCode::NotMatured));
    }

    #[test]
    fn migration_keeps_legacy_terms() {
        let legacy = LegacyStakeRecord {
            tx_hash: [9u8; 32],
            addr: Pubkey::new_unique(),
            amount: 3 * STAKE_MODULUS,
            rate: 41,
            duration: 9,
            start_time: START,
            end_time: START + 9 * SECONDS_PER_MONTH,
            complete: false,
        };
        let mut record = StakeRecord::default();
        record.migrate_from(&legacy, 250).unwrap();
        assert_eq!(record.origin, StakeOrigin::LegacyMigration);
        assert_eq!(record.rate, 41);
        assert_eq!(record.addr, legacy.addr);
        assert_eq!(record.end_time, legacy.end_time);

        let finished = LegacyStakeRecord { complete: true, ..legacy };
        let err = StakeRecord::default().migrate_from(&finished, 250).unwrap_err();
        assert_eq!(err, error!(ErrorCode::LegacyStakeCompleted));
    }

    #[test]
    fn serialized_size_matches_len() {
        let mut buf = Vec::new();
        opened(24).try_serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), StakeRecord::LEN);
    }

    proptest! {
        #[test]
        fn only_modulus_multiples_are_accepted(amount in 0u64..u64::MAX) {
            prop_assert_eq!(
                StakeRecord::is_valid_amount(amount),
                amount != 0 && amount % STAKE_MODULUS == 0
            );
        }

        #[test]
        fn end_time_is_start_plus_whole_months(
            duration in 1u64..=24,
            start in 0i64..4_000_000_000,
        ) {
            let mut record = StakeRecord::default();
            let addr = Pubkey::new_unique();
            record.open([1u8; 32], addr, STAKE_MODULUS, duration, start, 0).unwrap();
            let lock = duration as i64 * SECONDS_PER_MONTH;
            prop_assert_eq!(record.end_time - record.start_time, lock);
        }
    }
}

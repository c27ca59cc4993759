use crate::states::StakeRecord;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track ledger state changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted after a deposit has been moved into custody and recorded.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StakeCreated {
    /// Address of the new `StakeRecord`.
    pub stake: Pubkey,
    pub addr: Pubkey,
    pub tx_hash: [u8; 32],
    pub amount: u64,
    pub duration: u64,
    pub rate: u64,
    pub start_time: i64,
    pub end_time: i64,
}

impl StakeCreated {
    pub fn from_record(stake: Pubkey, record: &StakeRecord) -> Self {
        StakeCreated {
            stake,
            addr: record.addr,
            tx_hash: record.tx_hash,
            amount: record.amount,
            duration: record.duration,
            rate: record.rate,
            start_time: record.start_time,
            end_time: record.end_time,
        }
    }
}

/// Emitted when matured principal has been returned to the depositor.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StakeCompleted {
    pub stake: Pubkey,
    pub addr: Pubkey,
    pub amount: u64,
}

/// Emitted when a legacy ledger stake is copied into this ledger.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct LegacyStakeMigrated {
    pub stake: Pubkey,
    pub legacy_stake: Pubkey,
    pub addr: Pubkey,
    pub amount: u64,
    /// Legacy terms are kept as-is, so this rate may be off the current schedule.
    pub rate: u64,
    pub start_time: i64,
    pub end_time: i64,
}

impl LegacyStakeMigrated {
    pub fn from_record(stake: Pubkey, legacy_stake: Pubkey, record: &StakeRecord) -> Self {
        LegacyStakeMigrated {
            stake,
            legacy_stake,
            addr: record.addr,
            amount: record.amount,
            rate: record.rate,
            start_time: record.start_time,
            end_time: record.end_time,
        }
    }
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct AddedToWhitelist {
    pub address: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RemovedFromWhitelist {
    pub address: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct AddedWhitelistAdmin {
    pub address: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RemovedWhitelistAdmin {
    pub address: Pubkey,
}

/// Emitted once, when the default roster is written.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct OwnersInitialized {
    pub owners: [Pubkey; 5],
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct OwnerSwitched {
    /// Zero-based slot index (`owner1` is 0).
    pub slot: u8,
    pub previous: Pubkey,
    pub new_owner: Pubkey,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct AdminUpdated {
    pub previous: Pubkey,
    pub admin: Pubkey,
}

/// Emitted when the staked asset is bound and its custody vault created.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StakingTokenBound {
    pub stake_mint: Pubkey,
    pub custody_vault: Pubkey,
}

/// Emitted for every quorum-approved release outside `complete_stake`.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct CustodyReleased {
    pub destination: Pubkey,
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::LegacyStakeRecord;
    use crate::{SECONDS_PER_MONTH, STAKE_MODULUS};

    const START: i64 = 1_700_000_000;

    #[test]
    fn stake_created_carries_full_terms() {
        let mut record = StakeRecord::default();
        record
            .open([4u8; 32], Pubkey::new_unique(), 2 * STAKE_MODULUS, 6, START, 255)
            .unwrap();
        let stake = Pubkey::new_unique();

        let event = StakeCreated::from_record(stake, &record);
        assert_eq!(event.stake, stake);
        assert_eq!(event.addr, record.addr);
        assert_eq!(event.tx_hash, [4u8; 32]);
        assert_eq!(event.amount, 2 * STAKE_MODULUS);
        assert_eq!(event.rate, 35);
        assert_eq!(event.start_time, START);
        assert_eq!(event.end_time, START + 6 * SECONDS_PER_MONTH);
    }

    #[test]
    fn migration_event_keeps_legacy_rate_and_start() {
        let legacy = LegacyStakeRecord {
            tx_hash: [8u8; 32],
            addr: Pubkey::new_unique(),
            amount: 7 * STAKE_MODULUS,
            rate: 44,
            duration: 10,
            start_time: START - 5,
            end_time: START + 10 * SECONDS_PER_MONTH,
            complete: false,
        };
        let mut record = StakeRecord::default();
        record.migrate_from(&legacy, 251).unwrap();
        let (stake, legacy_stake) = (Pubkey::new_unique(), Pubkey::new_unique());

        let event = LegacyStakeMigrated::from_record(stake, legacy_stake, &record);
        assert_eq!(event.legacy_stake, legacy_stake);
        assert_eq!(event.addr, legacy.addr);
        assert_eq!(event.amount, legacy.amount);
        assert_eq!(event.rate, 44);
        assert_eq!(event.start_time, START - 5);
        assert_eq!(event.end_time, legacy.end_time);
    }
}

use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use arrayref::{array_ref, array_refs};

/// Seed prefix the legacy ledger derives its stake accounts with:
/// `[LEGACY_STAKE_SEED, stake_id, addr]`.
pub const LEGACY_STAKE_SEED: &str = "stake";

/// Version-1 stake layout as stored by the legacy ledger program.
///
/// ```text
/// 0..8     discriminator   sha256("account:Stake")[..8]
/// 8..40    tx_hash
/// 40..72   addr
/// 72..80   amount          u64 le
/// 80..88   rate            u64 le
/// 88..96   duration        u64 le
/// 96..104  start_time      i64 le
/// 104..112 end_time        i64 le
/// 112      complete        0 | 1
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegacyStakeRecord {
    pub tx_hash: [u8; 32],
    pub addr: Pubkey,
    pub amount: u64,
    pub rate: u64,
    pub duration: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub complete: bool,
}

impl LegacyStakeRecord {
    pub const LEN: usize = 8 + 32 + 32 + 8 * 5 + 1;

    pub fn discriminator() -> [u8; 8] {
        let mut disc = [0u8; 8];
        disc.copy_from_slice(&hash(b"account:Stake").to_bytes()[..8]);
        disc
    }

    /// Decode a legacy account body; any size or tag mismatch is `StakeNotFound`.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        if data.len() < Self::LEN {
            return err!(ErrorCode::StakeNotFound);
        }
        let src = array_ref![data, 0, LegacyStakeRecord::LEN];
        let (disc, tx_hash, addr, amount, rate, duration, start_time, end_time, complete) =
            array_refs![src, 8, 32, 32, 8, 8, 8, 8, 8, 1];
        if *disc != Self::discriminator() {
            return err!(ErrorCode::StakeNotFound);
        }
        let complete = match complete {
            [0] => false,
            [1] => true,
            _ => return err!(ErrorCode::StakeNotFound),
        };
        Ok(Self {
            tx_hash: *tx_hash,
            addr: Pubkey::new_from_array(*addr),
            amount: u64::from_le_bytes(*amount),
            rate: u64::from_le_bytes(*rate),
            duration: u64::from_le_bytes(*duration),
            start_time: i64::from_le_bytes(*start_time),
            end_time: i64::from_le_bytes(*end_time),
            complete,
        })
    }

    /// Read a legacy stake from an account owned by the legacy ledger.
    pub fn load(info: &AccountInfo) -> Result<Self> {
        if info.owner != &crate::legacy_ledger::ID || info.data_is_empty() {
            return err!(ErrorCode::StakeNotFound);
        }
        let data = info.try_borrow_data()?;
        Self::unpack(&data)
    }

    #[cfg(test)]
    pub fn pack(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(&Self::discriminator());
        out.extend_from_slice(&self.tx_hash);
        out.extend_from_slice(self.addr.as_ref());
        out.extend_from_slice(&self.amount.to_le_bytes());
        out.extend_from_slice(&self.rate.to_le_bytes());
        out.extend_from_slice(&self.duration.to_le_bytes());
        out.extend_from_slice(&self.start_time.to_le_bytes());
        out.extend_from_slice(&self.end_time.to_le_bytes());
        out.push(self.complete as u8);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LegacyStakeRecord {
        LegacyStakeRecord {
            tx_hash: [5u8; 32],
            addr: Pubkey::new_unique(),
            amount: 700_000_000,
            rate: 30,
            duration: 4,
            start_time: 1_600_000_000,
            end_time: 1_600_000_000 + 4 * crate::SECONDS_PER_MONTH,
            complete: false,
        }
    }

    #[test]
    fn decodes_fixed_layout() {
        let record = sample();
        let bytes = record.pack();
        assert_eq!(bytes.len(), LegacyStakeRecord::LEN);
        assert_eq!(LegacyStakeRecord::unpack(&bytes).unwrap(), record);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let record = sample();
        let mut bytes = record.pack();
        bytes.extend_from_slice(&[0xAA; 16]);
        assert_eq!(LegacyStakeRecord::unpack(&bytes).unwrap(), record);
    }

    #[test]
    fn rejects_foreign_or_short_data() {
        let mut bytes = sample().pack();
        assert!(LegacyStakeRecord::unpack(&bytes[..LegacyStakeRecord::LEN - 1]).is_err());

        bytes[LegacyStakeRecord::LEN - 1] = 2;
        assert!(LegacyStakeRecord::unpack(&bytes).is_err());

        let mut bytes = sample().pack();
        bytes[0] ^= 0xFF;
        assert!(LegacyStakeRecord::unpack(&bytes).is_err());
    }

    #[test]
    fn load_requires_legacy_owner() {
        let key = Pubkey::new_unique();
        let record = sample();

        let mut data = record.pack();
        let mut lamports = 1u64;
        let wrong_owner = crate::ID;
        let info = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &wrong_owner,
            false,
            0,
        );
        assert!(LegacyStakeRecord::load(&info).is_err());

        let mut data = record.pack();
        let mut lamports = 1u64;
        let legacy_owner = crate::legacy_ledger::ID;
        let info = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &legacy_owner,
            false,
            0,
        );
        assert_eq!(LegacyStakeRecord::load(&info).unwrap(), record);
    }
}

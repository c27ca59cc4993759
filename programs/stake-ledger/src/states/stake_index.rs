use anchor_lang::prelude::*;

/// PDA seed prefix for index entries: `[STAKE_INDEX_SEED, addr, tx_hash]`.
pub const STAKE_INDEX_SEED: &str = "stake_index";

/// Offset of `addr` inside the account data, for `memcmp` prefix scans.
pub const STAKE_INDEX_ADDR_OFFSET: usize = 8;

/// Secondary index row pointing from a depositor to one of their records.
///
/// `addr` must stay the first field so every entry for one depositor can be
/// found by matching the bytes right after the discriminator.
#[account]
#[derive(Default, Debug)]
pub struct StakeIndexEntry {
    pub addr: Pubkey,
    pub tx_hash: [u8; 32],
    /// Address of the `StakeRecord` this row refers to.
    pub stake: Pubkey,
    pub bump: u8,
}

impl StakeIndexEntry {
    pub const LEN: usize = 8 + 32 + 32 + 32 + 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_sits_right_after_discriminator() {
        let addr = Pubkey::new_unique();
        let entry = StakeIndexEntry {
            addr,
            tx_hash: [3u8; 32],
            stake: Pubkey::new_unique(),
            bump: 200,
        };
        let mut buf = Vec::new();
        entry.try_serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), StakeIndexEntry::LEN);
        assert_eq!(
            &buf[STAKE_INDEX_ADDR_OFFSET..STAKE_INDEX_ADDR_OFFSET + 32],
            addr.as_ref()
        );
    }
}

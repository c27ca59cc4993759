use anchor_lang::Discriminator;
use anyhow::Result;
use solana_client::{
    rpc_client::RpcClient,
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::pubkey::Pubkey;
use stake_ledger::states::{StakeIndexEntry, StakeRecord, STAKE_INDEX_ADDR_OFFSET};
use std::collections::VecDeque;

use super::rpc::get_program_accounts_with_filters;
use super::utils::deserialize_anchor_account;

/// `getMultipleAccounts` accepts at most 100 keys per call.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Filters selecting every index entry that belongs to `addr`.
pub fn stake_index_filters(addr: &Pubkey) -> Vec<RpcFilterType> {
    vec![
        RpcFilterType::DataSize(StakeIndexEntry::LEN as u64),
        RpcFilterType::Memcmp(Memcmp::new_base58_encoded(0, StakeIndexEntry::DISCRIMINATOR)),
        RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
            STAKE_INDEX_ADDR_OFFSET,
            addr.as_ref(),
        )),
    ]
}

/// Lazy view over one depositor's stakes.
///
/// Index pointers are collected up front with a single prefix scan; the
/// records themselves are fetched in batches as the iterator advances.
/// `restart` rewinds to the first pointer without rescanning.
pub struct StakesByAddress<'a> {
    rpc_client: &'a RpcClient,
    pointers: Vec<Pubkey>,
    cursor: usize,
    batch_size: usize,
    buffered: VecDeque<(Pubkey, StakeRecord)>,
}

impl<'a> StakesByAddress<'a> {
    pub fn scan(rpc_client: &'a RpcClient, program_id: &Pubkey, addr: &Pubkey) -> Result<Self> {
        let entries =
            get_program_accounts_with_filters(rpc_client, program_id, stake_index_filters(addr))?;
        let mut pointers = Vec::with_capacity(entries.len());
        for (_, account) in entries {
            let entry: StakeIndexEntry = deserialize_anchor_account(&account)?;
            pointers.push(entry.stake);
        }
        Ok(Self::from_pointers(rpc_client, pointers, DEFAULT_BATCH_SIZE))
    }

    pub fn from_pointers(
        rpc_client: &'a RpcClient,
        pointers: Vec<Pubkey>,
        batch_size: usize,
    ) -> Self {
        Self {
            rpc_client,
            pointers,
            cursor: 0,
            batch_size: batch_size.clamp(1, DEFAULT_BATCH_SIZE),
            buffered: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    pub fn restart(&mut self) {
        self.cursor = 0;
        self.buffered.clear();
    }

    fn fetch_next_batch(&mut self) -> Result<()> {
        let end = (self.cursor + self.batch_size).min(self.pointers.len());
        let keys = &self.pointers[self.cursor..end];
        let accounts = self.rpc_client.get_multiple_accounts(keys)?;
        for (key, account) in keys.iter().zip(accounts) {
            // Skip pointers whose record account is gone.
            if let Some(account) = account {
                let record: StakeRecord = deserialize_anchor_account(&account)?;
                self.buffered.push_back((*key, record));
            }
        }
        self.cursor = end;
        Ok(())
    }
}

impl Iterator for StakesByAddress<'_> {
    type Item = Result<(Pubkey, StakeRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.buffered.is_empty() {
            if self.cursor >= self.pointers.len() {
                return None;
            }
            if let Err(err) = self.fetch_next_batch() {
                // Give up on the rest so a failing batch is not retried forever.
                self.cursor = self.pointers.len();
                return Some(Err(err));
            }
        }
        self.buffered.pop_front().map(Ok)
    }
}

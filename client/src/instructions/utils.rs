use anchor_lang::AccountDeserialize;
use anyhow::Result;
use solana_sdk::{account::Account, hash::hashv, pubkey::Pubkey};
use stake_ledger::states::{
    GLOBAL_CONFIG_SEED, LEGACY_STAKE_SEED, OWNER_ROSTER_SEED, STAKE_INDEX_SEED, STAKE_SEED,
    WHITELIST_ADMINS_SEED, WHITELIST_SEED,
};

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

/// Client-side stand-in for the hash of the staking transaction.
///
/// Mixes the blockhash the transaction is built against with its terms, so
/// the same request resubmitted against a new blockhash gets a new id.
pub fn derive_stake_tx_hash(
    recent_blockhash: &solana_sdk::hash::Hash,
    staker: &Pubkey,
    amount: u64,
    duration: u64,
) -> [u8; 32] {
    hashv(&[
        recent_blockhash.as_ref(),
        staker.as_ref(),
        &amount.to_le_bytes(),
        &duration.to_le_bytes(),
    ])
    .to_bytes()
}

pub fn get_global_config_address(program_id: &Pubkey) -> Pubkey {
    let (global_config, _bump) =
        Pubkey::find_program_address(&[GLOBAL_CONFIG_SEED.as_bytes()], &program_id);
    global_config
}

pub fn get_owner_roster_address(program_id: &Pubkey) -> Pubkey {
    let (owner_roster, _bump) =
        Pubkey::find_program_address(&[OWNER_ROSTER_SEED.as_bytes()], &program_id);
    owner_roster
}

pub fn get_authority_address(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[stake_ledger::AUTH_SEED.as_bytes()], &program_id);
    authority
}

pub fn get_custody_vault_address(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (custody_vault, _bump) = Pubkey::find_program_address(
        &[stake_ledger::CUSTODY_VAULT_SEED.as_bytes(), mint.as_ref()],
        &program_id,
    );
    custody_vault
}

pub fn get_whitelist_admins_address(program_id: &Pubkey) -> Pubkey {
    let (whitelist_admins, _bump) =
        Pubkey::find_program_address(&[WHITELIST_ADMINS_SEED.as_bytes()], &program_id);
    whitelist_admins
}

pub fn get_whitelist_entry_address(program_id: &Pubkey, address: &Pubkey) -> Pubkey {
    let (whitelist_entry, _bump) = Pubkey::find_program_address(
        &[WHITELIST_SEED.as_bytes(), address.as_ref()],
        &program_id,
    );
    whitelist_entry
}

pub fn get_stake_record_address(program_id: &Pubkey, tx_hash: &[u8; 32], addr: &Pubkey) -> Pubkey {
    let (stake_record, _bump) = Pubkey::find_program_address(
        &[STAKE_SEED.as_bytes(), tx_hash.as_ref(), addr.as_ref()],
        &program_id,
    );
    stake_record
}

pub fn get_stake_index_address(program_id: &Pubkey, addr: &Pubkey, tx_hash: &[u8; 32]) -> Pubkey {
    let (stake_index, _bump) = Pubkey::find_program_address(
        &[STAKE_INDEX_SEED.as_bytes(), addr.as_ref(), tx_hash.as_ref()],
        &program_id,
    );
    stake_index
}

pub fn get_legacy_stake_address(legacy_stake_id: &[u8; 32], addr: &Pubkey) -> Pubkey {
    let (legacy_stake, _bump) = Pubkey::find_program_address(
        &[LEGACY_STAKE_SEED.as_bytes(), legacy_stake_id.as_ref(), addr.as_ref()],
        &stake_ledger::legacy_ledger::ID,
    );
    legacy_stake
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;

    #[test]
    fn stake_hash_depends_on_every_input() {
        let staker = Pubkey::new_unique();
        let blockhash = Hash::new_unique();
        let base = derive_stake_tx_hash(&blockhash, &staker, 100_000_000, 6);
        assert_eq!(base, derive_stake_tx_hash(&blockhash, &staker, 100_000_000, 6));
        assert_ne!(base, derive_stake_tx_hash(&Hash::new_unique(), &staker, 100_000_000, 6));
        assert_ne!(base, derive_stake_tx_hash(&blockhash, &Pubkey::new_unique(), 100_000_000, 6));
        assert_ne!(base, derive_stake_tx_hash(&blockhash, &staker, 200_000_000, 6));
        assert_ne!(base, derive_stake_tx_hash(&blockhash, &staker, 100_000_000, 7));
    }

    #[test]
    fn record_and_index_addresses_differ() {
        let program_id = stake_ledger::ID;
        let addr = Pubkey::new_unique();
        let tx_hash = [4u8; 32];
        let record = get_stake_record_address(&program_id, &tx_hash, &addr);
        let index = get_stake_index_address(&program_id, &addr, &tx_hash);
        assert_ne!(record, index);
        assert_eq!(record, get_stake_record_address(&program_id, &tx_hash, &addr));
        assert_ne!(record, get_stake_record_address(&program_id, &[5u8; 32], &addr));
    }

    #[test]
    fn whitelist_entries_are_per_address() {
        let program_id = stake_ledger::ID;
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        assert_ne!(
            get_whitelist_entry_address(&program_id, &a),
            get_whitelist_entry_address(&program_id, &b)
        );
    }
}

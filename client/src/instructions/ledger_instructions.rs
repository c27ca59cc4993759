use anchor_client::{Client, Cluster, Program};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, system_program};
use std::rc::Rc;

use stake_ledger::accounts as ledger_accounts;
use stake_ledger::instruction as ledger_instructions;

use crate::instructions::utils::{
    get_authority_address, get_custody_vault_address, get_global_config_address,
    get_legacy_stake_address, get_owner_roster_address, get_stake_index_address,
    get_stake_record_address, get_whitelist_admins_address, get_whitelist_entry_address,
};

use super::super::{read_keypair_file, ClientConfig};

fn ledger_program(config: &ClientConfig) -> Result<Program<Rc<Keypair>>> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    Ok(client.program(config.stake_ledger_program)?)
}

/// Co-signers (roster owners, admins) ride along as signer remaining accounts.
fn co_signer_metas(co_signers: &[Pubkey]) -> Vec<AccountMeta> {
    co_signers
        .iter()
        .map(|key| AccountMeta::new_readonly(*key, true))
        .collect()
}

pub fn initialize_owners_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::InitializeOwners {
            payer: program.payer(),
            owner_roster: get_owner_roster_address(&program.id()),
            system_program: system_program::id(),
        })
        .args(ledger_instructions::InitializeOwners {})
        .instructions()?;
    Ok(instructions)
}

pub fn get_owners_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::GetOwners {
            owner_roster: get_owner_roster_address(&program.id()),
        })
        .args(ledger_instructions::GetOwners {})
        .instructions()?;
    Ok(instructions)
}

pub fn switch_owner_instr(
    config: &ClientConfig,
    slot: String,
    new_owner: Pubkey,
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::SwitchOwner {
            caller: program.payer(),
            owner_roster: get_owner_roster_address(&program.id()),
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::SwitchOwner { slot, new_owner })
        .instructions()?;
    Ok(instructions)
}

pub fn set_admin_instr(
    config: &ClientConfig,
    admin: Pubkey,
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::SetAdmin {
            payer: program.payer(),
            owner_roster: get_owner_roster_address(&program.id()),
            global_config: get_global_config_address(&program.id()),
            system_program: system_program::id(),
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::SetAdmin { admin })
        .instructions()?;
    Ok(instructions)
}

pub fn get_admin_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::GetAdmin {
            global_config: get_global_config_address(&program.id()),
        })
        .args(ledger_instructions::GetAdmin {})
        .instructions()?;
    Ok(instructions)
}

pub fn bind_staking_token_instr(
    config: &ClientConfig,
    stake_mint: Pubkey,
    token_program: Pubkey,
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::BindStakingToken {
            payer: program.payer(),
            owner_roster: get_owner_roster_address(&program.id()),
            global_config: get_global_config_address(&program.id()),
            authority: get_authority_address(&program.id()),
            stake_mint,
            custody_vault: get_custody_vault_address(&program.id(), &stake_mint),
            token_program,
            system_program: system_program::id(),
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::BindStakingToken {})
        .instructions()?;
    Ok(instructions)
}

pub fn add_whitelist_admin_instr(
    config: &ClientConfig,
    address: Pubkey,
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::UpdateWhitelistAdmins {
            payer: program.payer(),
            owner_roster: get_owner_roster_address(&program.id()),
            whitelist_admins: get_whitelist_admins_address(&program.id()),
            system_program: system_program::id(),
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::AddWhitelistAdmin { address })
        .instructions()?;
    Ok(instructions)
}

pub fn remove_whitelist_admin_instr(
    config: &ClientConfig,
    address: Pubkey,
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::UpdateWhitelistAdmins {
            payer: program.payer(),
            owner_roster: get_owner_roster_address(&program.id()),
            whitelist_admins: get_whitelist_admins_address(&program.id()),
            system_program: system_program::id(),
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::RemoveWhitelistAdmin { address })
        .instructions()?;
    Ok(instructions)
}

pub fn get_whitelist_admins_instr(config: &ClientConfig) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::GetWhitelistAdmins {
            whitelist_admins: get_whitelist_admins_address(&program.id()),
        })
        .args(ledger_instructions::GetWhitelistAdmins {})
        .instructions()?;
    Ok(instructions)
}

pub fn add_to_whitelist_instr(
    config: &ClientConfig,
    address: Pubkey,
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::AddToWhitelist {
            payer: program.payer(),
            whitelist_admins: get_whitelist_admins_address(&program.id()),
            whitelist_entry: get_whitelist_entry_address(&program.id(), &address),
            system_program: system_program::id(),
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::AddToWhitelist { address })
        .instructions()?;
    Ok(instructions)
}

pub fn remove_from_whitelist_instr(
    config: &ClientConfig,
    address: Pubkey,
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::RemoveFromWhitelist {
            payer: program.payer(),
            whitelist_admins: get_whitelist_admins_address(&program.id()),
            whitelist_entry: get_whitelist_entry_address(&program.id(), &address),
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::RemoveFromWhitelist { address })
        .instructions()?;
    Ok(instructions)
}

pub fn is_whitelisted_instr(config: &ClientConfig, address: Pubkey) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::IsWhitelisted {
            whitelist_entry: get_whitelist_entry_address(&program.id(), &address),
        })
        .args(ledger_instructions::IsWhitelisted { address })
        .instructions()?;
    Ok(instructions)
}

/// Token accounts and mint that every custody-touching instruction needs.
#[derive(Clone, Copy, Debug)]
pub struct CustodyAccounts {
    pub stake_mint: Pubkey,
    pub custody_vault: Pubkey,
    pub token_program: Pubkey,
}

pub fn stake_instr(
    config: &ClientConfig,
    staker: Pubkey,
    staker_token: Pubkey,
    amount: u64,
    duration: u64,
    tx_hash: [u8; 32],
    custody: CustodyAccounts,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::Stake {
            payer: program.payer(),
            staker,
            global_config: get_global_config_address(&program.id()),
            whitelist_entry: get_whitelist_entry_address(&program.id(), &staker),
            stake_record: get_stake_record_address(&program.id(), &tx_hash, &staker),
            stake_index: get_stake_index_address(&program.id(), &staker, &tx_hash),
            staker_token,
            custody_vault: custody.custody_vault,
            stake_mint: custody.stake_mint,
            token_program: custody.token_program,
            system_program: system_program::id(),
        })
        .args(ledger_instructions::Stake {
            amount,
            duration,
            tx_hash,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn complete_stake_instr(
    config: &ClientConfig,
    stake_record: Pubkey,
    destination_token: Pubkey,
    custody: CustodyAccounts,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::CompleteStake {
            caller: program.payer(),
            global_config: get_global_config_address(&program.id()),
            authority: get_authority_address(&program.id()),
            stake_record,
            destination_token,
            custody_vault: custody.custody_vault,
            stake_mint: custody.stake_mint,
            token_program: custody.token_program,
        })
        .args(ledger_instructions::CompleteStake {})
        .instructions()?;
    Ok(instructions)
}

pub fn get_stake_instr(config: &ClientConfig, stake_record: Pubkey) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::GetStake { stake_record })
        .args(ledger_instructions::GetStake {})
        .instructions()?;
    Ok(instructions)
}

pub fn total_staked_instr(
    config: &ClientConfig,
    custody_vault: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::TotalStaked {
            global_config: get_global_config_address(&program.id()),
            custody_vault,
        })
        .args(ledger_instructions::TotalStaked {})
        .instructions()?;
    Ok(instructions)
}

pub fn calculate_rate_instr(config: &ClientConfig, duration: u64) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::CalculateRate {})
        .args(ledger_instructions::CalculateRate { duration })
        .instructions()?;
    Ok(instructions)
}

pub fn migrate_stake_instr(
    config: &ClientConfig,
    addr: Pubkey,
    legacy_stake_id: [u8; 32],
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::MigrateStake {
            payer: program.payer(),
            global_config: get_global_config_address(&program.id()),
            legacy_stake: get_legacy_stake_address(&legacy_stake_id, &addr),
            stake_record: get_stake_record_address(&program.id(), &legacy_stake_id, &addr),
            stake_index: get_stake_index_address(&program.id(), &addr, &legacy_stake_id),
            system_program: system_program::id(),
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::MigrateStake {
            addr,
            legacy_stake_id,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn emergency_withdraw_instr(
    config: &ClientConfig,
    amount: u64,
    destination_token: Pubkey,
    custody: CustodyAccounts,
    co_signers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let instructions = program
        .request()
        .accounts(ledger_accounts::EmergencyWithdraw {
            caller: program.payer(),
            owner_roster: get_owner_roster_address(&program.id()),
            global_config: get_global_config_address(&program.id()),
            authority: get_authority_address(&program.id()),
            custody_vault: custody.custody_vault,
            destination_token,
            stake_mint: custody.stake_mint,
            token_program: custody.token_program,
        })
        .accounts(co_signer_metas(co_signers))
        .args(ledger_instructions::EmergencyWithdraw { amount })
        .instructions()?;
    Ok(instructions)
}

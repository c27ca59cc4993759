use anchor_lang::prelude::*;
use anchor_lang::solana_program::pubkey;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

declare_id!("5gWMWjMdjFMZkVgQcQzVcAZ5Q2vnM8vwMpJq3B85JbS2");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "stake-ledger",
    project_url: "https://github.com/stake-ledger/stake-ledger",
    contacts: "email:security@stake-ledger.io",
    policy: "https://github.com/stake-ledger/stake-ledger/blob/main/SECURITY.md"
}

/// Program whose stake accounts `migrate_stake` copies from.
pub mod legacy_ledger {
    use anchor_lang::prelude::declare_id;
    declare_id!("CouRXUKAaCnFpTBqkPA1m4hDJE9qdHrVrHGS4yZJR1oS");
}

/// Roster written by `initialize_owners`, slot order `owner1`..`owner5`.
pub const DEFAULT_OWNERS: [Pubkey; OWNER_SLOTS] = [
    pubkey!("Eig59Qe6wJ2opcNDuzEDtoZc4tcSnzJMr7q44Dz9UP6Z"),
    pubkey!("3V53zY8bcdCYq2BsTh7YXKKTAQmn4VRHVo4Kni7ifw65"),
    pubkey!("J1uc5kqCABRiv4DmQc1VUcPrDrY1xVm7iAbV4GBehpXy"),
    pubkey!("GZ2cuq5SeTcwZrrzNqEkAqY3Ur1NPviAELvinyqGKTWg"),
    pubkey!("C3MapyR34zvoJs4AorQE2FJEiULpCe6ayhZH2WRTCF2j"),
];

pub const AUTH_SEED: &str = "custody_auth";
pub const CUSTODY_VAULT_SEED: &str = "custody_vault";

pub const OWNER_SLOTS: usize = 5;
pub const SECONDS_PER_MONTH: i64 = 2_629_743;
pub const STAKE_MODULUS: u64 = 100_000_000;
pub const MIN_DURATION_MONTHS: u64 = 1;
pub const MAX_DURATION_MONTHS: u64 = 24;

pub const WHITELIST_ADMIN_QUORUM: usize = 1;
pub const GOVERNANCE_QUORUM: usize = 3;
pub const VERIFICATION_QUORUM: usize = 4;

pub mod curve;
pub mod error;
pub mod instructions;
pub mod states;
pub mod utils;

use instructions::*;
use states::StakeRecord;

#[program]
pub mod stake_ledger {

    use super::*;

    pub fn initialize_owners(ctx: Context<InitializeOwners>) -> Result<bool> {
        instructions::initialize_owners(ctx)
    }

    pub fn get_owners(ctx: Context<GetOwners>) -> Result<[Pubkey; 5]> {
        instructions::get_owners(ctx)
    }

    pub fn switch_owner(
        ctx: Context<SwitchOwner>,
        slot: String,
        new_owner: Pubkey,
    ) -> Result<bool> {
        instructions::switch_owner(ctx, slot, new_owner)
    }

    pub fn set_admin(ctx: Context<SetAdmin>, admin: Pubkey) -> Result<()> {
        instructions::set_admin(ctx, admin)
    }

    pub fn get_admin(ctx: Context<GetAdmin>) -> Result<Pubkey> {
        instructions::get_admin(ctx)
    }

    pub fn bind_staking_token(ctx: Context<BindStakingToken>) -> Result<()> {
        instructions::bind_staking_token(ctx)
    }

    pub fn add_whitelist_admin(
        ctx: Context<UpdateWhitelistAdmins>,
        address: Pubkey,
    ) -> Result<bool> {
        instructions::add_whitelist_admin(ctx, address)
    }

    pub fn remove_whitelist_admin(
        ctx: Context<UpdateWhitelistAdmins>,
        address: Pubkey,
    ) -> Result<bool> {
        instructions::remove_whitelist_admin(ctx, address)
    }

    pub fn get_whitelist_admins(ctx: Context<GetWhitelistAdmins>) -> Result<Vec<Pubkey>> {
        instructions::get_whitelist_admins(ctx)
    }

    pub fn add_to_whitelist(ctx: Context<AddToWhitelist>, address: Pubkey) -> Result<()> {
        instructions::add_to_whitelist(ctx, address)
    }

    pub fn remove_from_whitelist(ctx: Context<RemoveFromWhitelist>, address: Pubkey) -> Result<()> {
        instructions::remove_from_whitelist(ctx, address)
    }

    pub fn is_whitelisted(ctx: Context<IsWhitelisted>, address: Pubkey) -> Result<bool> {
        instructions::is_whitelisted(ctx, address)
    }

    pub fn stake(
        ctx: Context<Stake>,
        amount: u64,
        duration: u64,
        tx_hash: [u8; 32],
    ) -> Result<()> {
        instructions::stake(ctx, amount, duration, tx_hash)
    }

    pub fn complete_stake(ctx: Context<CompleteStake>) -> Result<()> {
        instructions::complete_stake(ctx)
    }

    pub fn get_stake(ctx: Context<GetStake>) -> Result<StakeRecord> {
        instructions::get_stake(ctx)
    }

    pub fn total_staked(ctx: Context<TotalStaked>) -> Result<u64> {
        instructions::total_staked(ctx)
    }

    pub fn calculate_rate(ctx: Context<CalculateRate>, duration: u64) -> Result<u64> {
        instructions::calculate_rate(ctx, duration)
    }

    pub fn migrate_stake(
        ctx: Context<MigrateStake>,
        addr: Pubkey,
        legacy_stake_id: [u8; 32],
    ) -> Result<()> {
        instructions::migrate_stake(ctx, addr, legacy_stake_id)
    }

    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
        instructions::emergency_withdraw(ctx, amount)
    }
}

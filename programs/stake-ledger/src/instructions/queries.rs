use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

//
// ──────────────────────────────────────────────────────────────────────────────
// Read-only instructions; results come back as return data
// ──────────────────────────────────────────────────────────────────────────────
//

#[derive(Accounts)]
pub struct GetStake<'info> {
    /// CHECK: Loaded through `StakeRecord::load`.
    pub stake_record: UncheckedAccount<'info>,
}

pub fn get_stake(ctx: Context<GetStake>) -> Result<StakeRecord> {
    StakeRecord::load(&ctx.accounts.stake_record)
}

#[derive(Accounts)]
pub struct TotalStaked<'info> {
    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
        constraint = global_config.is_bound() @ ErrorCode::ContractNotBound,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    #[account(address = global_config.custody_vault)]
    pub custody_vault: Box<InterfaceAccount<'info, TokenAccount>>,
}

/// Token balance of the custody vault.
///
/// This is the external balance, not a sum over records: tokens sent to
/// the vault directly, or released by `emergency_withdraw`, move it without
/// touching any stake.
pub fn total_staked(ctx: Context<TotalStaked>) -> Result<u64> {
    Ok(ctx.accounts.custody_vault.amount)
}

#[derive(Accounts)]
pub struct CalculateRate {}

pub fn calculate_rate(_ctx: Context<CalculateRate>, duration: u64) -> Result<u64> {
    crate::curve::calculate_rate(duration)
}

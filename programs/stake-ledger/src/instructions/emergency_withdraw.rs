use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{transfer_from_custody_to_user, WitnessSet};
use crate::{AUTH_SEED, VERIFICATION_QUORUM};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Release custody funds outside the stake lifecycle.
///
/// Security model:
/// - Four of the five roster owners must sign (as `caller` or as signer
///   `remaining_accounts`).
/// - The custody authority PDA signs the transfer via seeds.
/// - No stake record is touched, so `total_staked` drops while open
///   stakes keep their recorded amounts.
#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    pub caller: Signer<'info>,

    /// CHECK: PDA derivation enforced by seeds; read through `OwnerRoster::load`.
    #[account(
        seeds = [OWNER_ROSTER_SEED.as_bytes()],
        bump,
    )]
    pub owner_roster: UncheckedAccount<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
        constraint = global_config.is_bound() @ ErrorCode::ContractNotBound,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    /// CHECK: PDA derivation enforced by seeds; used only as signer for CPIs.
    #[account(
        seeds = [AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mut, address = global_config.custody_vault)]
    pub custody_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = stake_mint,
        token::token_program = token_program,
    )]
    pub destination_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = global_config.stake_mint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let roster = OwnerRoster::load(&ctx.accounts.owner_roster);
    require!(
        roster.check_quorum(&witnesses, VERIFICATION_QUORUM),
        ErrorCode::Unauthorized
    );
    require!(amount > 0, ErrorCode::InvalidAmount);
    require!(
        amount <= ctx.accounts.custody_vault.amount,
        ErrorCode::InsufficientCustody
    );

    transfer_from_custody_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.custody_vault.to_account_info(),
        ctx.accounts.destination_token.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.stake_mint.decimals,
        &[&[AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]],
    )?;

    msg!("Released {} from custody", amount);
    emit!(CustodyReleased {
        destination: ctx.accounts.destination_token.key(),
        amount,
    });
    Ok(())
}

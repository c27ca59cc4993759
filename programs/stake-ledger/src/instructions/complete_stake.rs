use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::transfer_from_custody_to_user;
use crate::AUTH_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Return matured principal to the depositor. Anyone may submit it; the
/// destination must be a token account owned by the recorded `addr`.
///
/// Funds movement:
/// - `record.amount` moves from `custody_vault` → `destination_token`,
///   signed by the custody authority PDA.
#[derive(Accounts)]
pub struct CompleteStake<'info> {
    pub caller: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
        constraint = global_config.is_bound() @ ErrorCode::ContractNotBound,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    /// CHECK: PDA derivation enforced by seeds; used only as a signer.
    #[account(
        seeds = [AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// CHECK: Loaded through `StakeRecord::load`, which checks owner and
    /// discriminator and reports absence as `StakeNotFound`.
    #[account(mut)]
    pub stake_record: UncheckedAccount<'info>,

    #[account(
        mut,
        token::mint = stake_mint,
        token::token_program = token_program,
    )]
    pub destination_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = global_config.custody_vault)]
    pub custody_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = global_config.stake_mint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn complete_stake(ctx: Context<CompleteStake>) -> Result<()> {
    let mut record = StakeRecord::load(&ctx.accounts.stake_record)?;
    let now = Clock::get()?.unix_timestamp;
    record.ensure_completable(now)?;
    require_keys_eq!(
        ctx.accounts.destination_token.owner,
        record.addr,
        ErrorCode::InvalidArguments
    );

    transfer_from_custody_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.custody_vault.to_account_info(),
        ctx.accounts.destination_token.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        record.amount,
        ctx.accounts.stake_mint.decimals,
        &[&[AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]],
    )?;

    record.mark_complete();
    record.store(&ctx.accounts.stake_record)?;

    msg!("Stake {} completed", ctx.accounts.stake_record.key());
    emit!(StakeCompleted {
        stake: ctx.accounts.stake_record.key(),
        addr: record.addr,
        amount: record.amount,
    });
    Ok(())
}

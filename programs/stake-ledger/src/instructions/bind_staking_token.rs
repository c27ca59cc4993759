use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::WitnessSet;
use crate::{AUTH_SEED, CUSTODY_VAULT_SEED, GOVERNANCE_QUORUM};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Binds the staked asset and creates its custody vault.
///
/// The binding is one-shot: once `global_config.stake_mint` is set it can
/// not be replaced. Requires three roster owners as signers.
#[derive(Accounts)]
pub struct BindStakingToken<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: PDA derivation enforced by seeds; read through `OwnerRoster::load`.
    #[account(
        seeds = [OWNER_ROSTER_SEED.as_bytes()],
        bump,
    )]
    pub owner_roster: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
        payer = payer,
        space = GlobalConfig::LEN
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    /// Custody authority PDA, owner of the vault below.
    ///
    /// CHECK: PDA derivation enforced via seeds. Not read as an account; used as Pubkey.
    #[account(
        seeds = [AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Program-owned vault that holds staked principal.
    #[account(
        init_if_needed,
        seeds = [CUSTODY_VAULT_SEED.as_bytes(), stake_mint.key().as_ref()],
        bump,
        payer = payer,
        token::mint = stake_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub custody_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn bind_staking_token(ctx: Context<BindStakingToken>) -> Result<()> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let roster = OwnerRoster::load(&ctx.accounts.owner_roster);
    require!(
        roster.check_quorum(&witnesses, GOVERNANCE_QUORUM),
        ErrorCode::Unauthorized
    );

    let stake_mint = ctx.accounts.stake_mint.key();
    let custody_vault = ctx.accounts.custody_vault.key();
    let global_config = &mut ctx.accounts.global_config;
    require!(!global_config.is_bound(), ErrorCode::ContractAlreadyBound);

    global_config.bump = ctx.bumps.global_config;
    global_config.stake_mint = stake_mint;
    global_config.custody_vault = custody_vault;
    msg!("Staking token bound to {}", stake_mint);

    emit!(StakingTokenBound {
        stake_mint,
        custody_vault,
    });
    Ok(())
}

use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{load_program_account, WitnessSet};
use crate::GOVERNANCE_QUORUM;
use anchor_lang::prelude::*;

/// Sets the migration admin stored in `global_config`.
///
/// Requires three roster owners as signers, either `payer` or signer
/// `remaining_accounts`. Creates `global_config` on first use.
#[derive(Accounts)]
pub struct SetAdmin<'info> {
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
    pub global_config: Account<'info, GlobalConfig>,

    pub system_program: Program<'info, System>,
}

pub fn set_admin(ctx: Context<SetAdmin>, admin: Pubkey) -> Result<()> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let roster = OwnerRoster::load(&ctx.accounts.owner_roster);
    require!(
        roster.check_quorum(&witnesses, GOVERNANCE_QUORUM),
        ErrorCode::Unauthorized
    );
    require_keys_neq!(admin, Pubkey::default(), ErrorCode::InvalidAddress);

    let global_config = &mut ctx.accounts.global_config;
    let previous = global_config.admin;
    global_config.bump = ctx.bumps.global_config;
    global_config.admin = admin;
    msg!("Admin set to {}", admin);

    emit!(AdminUpdated { previous, admin });
    Ok(())
}

#[derive(Accounts)]
pub struct GetAdmin<'info> {
    /// CHECK: PDA derivation enforced by seeds; may not exist yet.
    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
    )]
    pub global_config: UncheckedAccount<'info>,
}

/// Stored admin, or `Pubkey::default()` when none has been set.
pub fn get_admin(ctx: Context<GetAdmin>) -> Result<Pubkey> {
    Ok(load_program_account::<GlobalConfig>(&ctx.accounts.global_config)
        .map(|config| config.admin)
        .unwrap_or_default())
}

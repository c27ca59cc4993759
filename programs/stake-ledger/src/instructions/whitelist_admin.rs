use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{load_program_account, Witness, WitnessSet};
use crate::WHITELIST_ADMIN_QUORUM;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Whitelist admin list, governed by the owner roster
// ──────────────────────────────────────────────────────────────────────────────
//

/// Shared by `add_whitelist_admin` and `remove_whitelist_admin`.
///
/// A single witnessed roster owner is enough; it may sign as `payer` or as a
/// signer in `remaining_accounts`.
#[derive(Accounts)]
pub struct UpdateWhitelistAdmins<'info> {
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
        seeds = [WHITELIST_ADMINS_SEED.as_bytes()],
        bump,
        payer = payer,
        space = WhitelistAdmins::LEN
    )]
    pub whitelist_admins: Account<'info, WhitelistAdmins>,

    pub system_program: Program<'info, System>,
}

/// Adds `address` once a roster owner has witnessed the call; `Ok(false)`
/// leaves `list` untouched.
pub fn add_admin_if_witnessed<W: Witness + ?Sized>(
    list: &mut WhitelistAdmins,
    roster: &OwnerRoster,
    witnesses: &W,
    address: Pubkey,
) -> Result<bool> {
    require_keys_neq!(address, Pubkey::default(), ErrorCode::InvalidAddress);
    if !roster.check_quorum(witnesses, WHITELIST_ADMIN_QUORUM) {
        msg!("add_whitelist_admin: quorum not met");
        return Ok(false);
    }
    list.add(address)?;
    Ok(true)
}

/// Removes `address` once a roster owner has witnessed the call. Removing an
/// address that is not listed still answers `true`.
pub fn remove_admin_if_witnessed<W: Witness + ?Sized>(
    list: &mut WhitelistAdmins,
    roster: &OwnerRoster,
    witnesses: &W,
    address: Pubkey,
) -> Result<bool> {
    require_keys_neq!(address, Pubkey::default(), ErrorCode::InvalidAddress);
    if !roster.check_quorum(witnesses, WHITELIST_ADMIN_QUORUM) {
        msg!("remove_whitelist_admin: quorum not met");
        return Ok(false);
    }
    if !list.remove(&address) {
        msg!("{} was not a whitelist admin", address);
    }
    Ok(true)
}

/// Returns `Ok(false)` when no roster owner witnessed the call. The admin
/// list is unchanged in that case, though `init_if_needed` still creates the
/// empty list account on the first call.
pub fn add_whitelist_admin(ctx: Context<UpdateWhitelistAdmins>, address: Pubkey) -> Result<bool> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let roster = OwnerRoster::load(&ctx.accounts.owner_roster);

    let whitelist_admins = &mut ctx.accounts.whitelist_admins;
    if !add_admin_if_witnessed(whitelist_admins, &roster, &witnesses, address)? {
        return Ok(false);
    }
    whitelist_admins.bump = ctx.bumps.whitelist_admins;

    emit!(AddedWhitelistAdmin { address });
    Ok(true)
}

/// Same quorum rule and account creation as `add_whitelist_admin`.
pub fn remove_whitelist_admin(
    ctx: Context<UpdateWhitelistAdmins>,
    address: Pubkey,
) -> Result<bool> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let roster = OwnerRoster::load(&ctx.accounts.owner_roster);

    let whitelist_admins = &mut ctx.accounts.whitelist_admins;
    if !remove_admin_if_witnessed(whitelist_admins, &roster, &witnesses, address)? {
        return Ok(false);
    }
    whitelist_admins.bump = ctx.bumps.whitelist_admins;

    emit!(RemovedWhitelistAdmin { address });
    Ok(true)
}

#[derive(Accounts)]
pub struct GetWhitelistAdmins<'info> {
    /// CHECK: PDA derivation enforced by seeds; may not exist yet.
    #[account(
        seeds = [WHITELIST_ADMINS_SEED.as_bytes()],
        bump,
    )]
    pub whitelist_admins: UncheckedAccount<'info>,
}

pub fn get_whitelist_admins(ctx: Context<GetWhitelistAdmins>) -> Result<Vec<Pubkey>> {
    Ok(load_program_account::<WhitelistAdmins>(&ctx.accounts.whitelist_admins)
        .map(|list| list.admins)
        .unwrap_or_default())
}

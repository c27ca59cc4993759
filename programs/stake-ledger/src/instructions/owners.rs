use crate::states::*;
use crate::utils::WitnessSet;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Owner roster instructions
// ──────────────────────────────────────────────────────────────────────────────
//

/// Writes the default five-owner roster the first time it is called.
#[derive(Accounts)]
pub struct InitializeOwners<'info> {
    /// Pays rent for the roster account on the first call.
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init_if_needed,
        seeds = [OWNER_ROSTER_SEED.as_bytes()],
        bump,
        payer = payer,
        space = OwnerRoster::LEN
    )]
    pub owner_roster: Account<'info, OwnerRoster>,

    pub system_program: Program<'info, System>,
}

/// Returns `true` if this call initialized the roster, `false` if it already was.
pub fn initialize_owners(ctx: Context<InitializeOwners>) -> Result<bool> {
    let roster = &mut ctx.accounts.owner_roster;
    if !roster.initialize(ctx.bumps.owner_roster) {
        msg!("Owner roster already initialized");
        return Ok(false);
    }

    msg!("Owner roster initialized");
    emit!(OwnersInitialized {
        owners: roster.owners,
    });
    Ok(true)
}

#[derive(Accounts)]
pub struct GetOwners<'info> {
    /// CHECK: PDA derivation enforced by seeds; may not exist before `initialize_owners`.
    #[account(
        seeds = [OWNER_ROSTER_SEED.as_bytes()],
        bump,
    )]
    pub owner_roster: UncheckedAccount<'info>,
}

/// Current roster. All slots read as `Pubkey::default()` before initialization.
pub fn get_owners(ctx: Context<GetOwners>) -> Result<[Pubkey; 5]> {
    Ok(OwnerRoster::load(&ctx.accounts.owner_roster).owners)
}

/// Replace one roster slot. Co-signing owners are passed as signer
/// `remaining_accounts`; `caller` counts too if it is an owner.
#[derive(Accounts)]
pub struct SwitchOwner<'info> {
    pub caller: Signer<'info>,

    /// CHECK: PDA derivation enforced by seeds; loaded leniently so an
    /// uninitialized roster fails the quorum check instead of erroring.
    #[account(
        mut,
        seeds = [OWNER_ROSTER_SEED.as_bytes()],
        bump,
    )]
    pub owner_roster: UncheckedAccount<'info>,
}

/// Swap the identity in `slot` (`owner1`..`owner5`) for `new_owner`.
///
/// Every refusal is reported as `Ok(false)` with nothing written:
/// - fewer than three owners witnessed (or roster not initialized)
/// - unknown slot name
/// - `new_owner` is the default key
/// - `new_owner` already holds a slot
pub fn switch_owner(ctx: Context<SwitchOwner>, slot: String, new_owner: Pubkey) -> Result<bool> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let mut roster = OwnerRoster::load(&ctx.accounts.owner_roster);

    let (index, previous) = match roster.switch(&witnesses, &slot, new_owner) {
        Ok(switched) => switched,
        Err(refusal) => {
            msg!("switch_owner refused: {:?}", refusal);
            return Ok(false);
        }
    };
    roster.store(&ctx.accounts.owner_roster)?;

    emit!(OwnerSwitched {
        slot: index as u8,
        previous,
        new_owner,
    });
    Ok(true)
}

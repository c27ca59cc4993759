use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{close_program_account, load_program_account, Witness, WitnessSet};
use anchor_lang::prelude::*;

/// Any single whitelist admin may edit the allow-list. Permission is checked
/// before the address; an absent admin list grants nobody permission.
pub fn authorize_whitelist_edit<W: Witness + ?Sized>(
    admins: Option<&WhitelistAdmins>,
    witnesses: &W,
    address: &Pubkey,
) -> Result<()> {
    require!(
        admins.is_some_and(|list| list.has_permission(witnesses)),
        ErrorCode::Unauthorized
    );
    require_keys_neq!(*address, Pubkey::default(), ErrorCode::InvalidAddress);
    Ok(())
}

#[derive(Accounts)]
#[instruction(address: Pubkey)]
pub struct AddToWhitelist<'info> {
    /// Pays rent for the membership account; counts as a witness.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: PDA derivation enforced by seeds; an absent list grants nobody permission.
    #[account(
        seeds = [WHITELIST_ADMINS_SEED.as_bytes()],
        bump,
    )]
    pub whitelist_admins: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        seeds = [WHITELIST_SEED.as_bytes(), address.as_ref()],
        bump,
        payer = payer,
        space = WhitelistEntry::LEN
    )]
    pub whitelist_entry: Account<'info, WhitelistEntry>,

    pub system_program: Program<'info, System>,
}

pub fn add_to_whitelist(ctx: Context<AddToWhitelist>, address: Pubkey) -> Result<()> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let admins = load_program_account::<WhitelistAdmins>(&ctx.accounts.whitelist_admins);
    authorize_whitelist_edit(admins.as_ref(), &witnesses, &address)?;

    let entry = &mut ctx.accounts.whitelist_entry;
    entry.bump = ctx.bumps.whitelist_entry;
    entry.address = address;

    emit!(AddedToWhitelist { address });
    Ok(())
}

#[derive(Accounts)]
#[instruction(address: Pubkey)]
pub struct RemoveFromWhitelist<'info> {
    /// Receives the membership account's rent; counts as a witness.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: PDA derivation enforced by seeds; an absent list grants nobody permission.
    #[account(
        seeds = [WHITELIST_ADMINS_SEED.as_bytes()],
        bump,
    )]
    pub whitelist_admins: UncheckedAccount<'info>,

    /// CHECK: PDA derivation enforced by seeds; closed if present.
    #[account(
        mut,
        seeds = [WHITELIST_SEED.as_bytes(), address.as_ref()],
        bump,
    )]
    pub whitelist_entry: UncheckedAccount<'info>,
}

pub fn remove_from_whitelist(ctx: Context<RemoveFromWhitelist>, address: Pubkey) -> Result<()> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let admins = load_program_account::<WhitelistAdmins>(&ctx.accounts.whitelist_admins);
    authorize_whitelist_edit(admins.as_ref(), &witnesses, &address)?;

    close_program_account(
        &ctx.accounts.whitelist_entry.to_account_info(),
        &ctx.accounts.payer.to_account_info(),
    )?;

    emit!(RemovedFromWhitelist { address });
    Ok(())
}

#[derive(Accounts)]
#[instruction(address: Pubkey)]
pub struct IsWhitelisted<'info> {
    /// CHECK: PDA derivation enforced by seeds; presence is the answer.
    #[account(
        seeds = [WHITELIST_SEED.as_bytes(), address.as_ref()],
        bump,
    )]
    pub whitelist_entry: UncheckedAccount<'info>,
}

pub fn is_whitelisted(ctx: Context<IsWhitelisted>, address: Pubkey) -> Result<bool> {
    Ok(WhitelistEntry::is_member(&ctx.accounts.whitelist_entry, &address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::store_program_account;

    fn admins(admin: Pubkey) -> WhitelistAdmins {
        let mut list = WhitelistAdmins::default();
        list.add(admin).unwrap();
        list
    }

    #[test]
    fn strangers_cannot_edit_the_allow_list() {
        let list = admins(Pubkey::new_unique());
        let address = Pubkey::new_unique();

        let err = authorize_whitelist_edit(Some(&list), &[Pubkey::new_unique()][..], &address)
            .unwrap_err();
        assert_eq!(err, error!(ErrorCode::Unauthorized));

        let err = authorize_whitelist_edit(None, &[Pubkey::new_unique()][..], &address)
            .unwrap_err();
        assert_eq!(err, error!(ErrorCode::Unauthorized));
    }

    #[test]
    fn permission_is_checked_before_the_address() {
        let admin = Pubkey::new_unique();
        let list = admins(admin);

        let stranger = [Pubkey::new_unique()];
        let err = authorize_whitelist_edit(Some(&list), &stranger[..], &Pubkey::default())
            .unwrap_err();
        assert_eq!(err, error!(ErrorCode::Unauthorized));

        let err = authorize_whitelist_edit(Some(&list), &[admin][..], &Pubkey::default())
            .unwrap_err();
        assert_eq!(err, error!(ErrorCode::InvalidAddress));
    }

    #[test]
    fn membership_cycle() {
        let admin = Pubkey::new_unique();
        let list = admins(admin);
        let address = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let program = crate::ID;
        let system = Pubkey::default();

        // Before any edit the entry PDA does not exist.
        let mut no_lamports = 0u64;
        let mut no_data: Vec<u8> = Vec::new();
        let absent = AccountInfo::new(
            &key,
            false,
            true,
            &mut no_lamports,
            &mut no_data,
            &system,
            false,
            0,
        );
        assert!(!WhitelistEntry::is_member(&absent, &address));

        // Added: the entry account is created and filled in.
        authorize_whitelist_edit(Some(&list), &[admin][..], &address).unwrap();
        let mut lamports = 1_000_000u64;
        let mut data = vec![0u8; WhitelistEntry::LEN];
        let created = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &program,
            false,
            0,
        );
        store_program_account(&WhitelistEntry { bump: 255, address }, &created).unwrap();
        assert!(WhitelistEntry::is_member(&created, &address));

        // Removed: the entry is closed back to an empty system account.
        authorize_whitelist_edit(Some(&list), &[admin][..], &address).unwrap();
        let mut closed_lamports = 0u64;
        let mut closed_data: Vec<u8> = Vec::new();
        let closed = AccountInfo::new(
            &key,
            false,
            true,
            &mut closed_lamports,
            &mut closed_data,
            &system,
            false,
            0,
        );
        assert!(!WhitelistEntry::is_member(&closed, &address));
    }
}

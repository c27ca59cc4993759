use crate::{
    error::ErrorCode,
    utils::{load_program_account, Witness},
};
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// KYC allow-list accounts
// ──────────────────────────────────────────────────────────────────────────────
//

pub const WHITELIST_ADMINS_SEED: &str = "kyc_admin_list";
pub const WHITELIST_SEED: &str = "account_kyc_ok";
pub const MAX_WHITELIST_ADMINS: usize = 10;

/// Identities allowed to edit the allow-list. Managed by the owner roster.
#[account]
#[derive(Default, Debug)]
pub struct WhitelistAdmins {
    pub bump: u8,
    pub admins: Vec<Pubkey>,
}

impl WhitelistAdmins {
    /// - 8: discriminator
    /// - 1: bump
    /// - 4 + 32 * MAX_WHITELIST_ADMINS: admin vector
    pub const LEN: usize = 8 + 1 + 4 + 32 * MAX_WHITELIST_ADMINS;

    pub fn add(&mut self, admin: Pubkey) -> Result<()> {
        require!(!self.admins.contains(&admin), ErrorCode::DuplicateWhitelistAdmin);
        require!(
            self.admins.len() < MAX_WHITELIST_ADMINS,
            ErrorCode::TooManyWhitelistAdmins
        );
        self.admins.push(admin);
        Ok(())
    }

    /// Drops `admin`, preserving the order of the rest. Returns whether it was listed.
    pub fn remove(&mut self, admin: &Pubkey) -> bool {
        let before = self.admins.len();
        self.admins.retain(|listed| listed != admin);
        self.admins.len() != before
    }

    /// True if any listed admin witnessed the call.
    pub fn has_permission<W: Witness + ?Sized>(&self, witnesses: &W) -> bool {
        self.admins.iter().any(|admin| witnesses.is_witnessed(admin))
    }
}

/// Marker account: its existence at `[WHITELIST_SEED, address]` is the
/// membership flag. Removal closes it.
#[account]
#[derive(Default, Debug)]
pub struct WhitelistEntry {
    pub bump: u8,
    pub address: Pubkey,
}

impl WhitelistEntry {
    pub const LEN: usize = 8 + 1 + 32;

    pub fn is_member(info: &AccountInfo, address: &Pubkey) -> bool {
        load_program_account::<WhitelistEntry>(info)
            .map(|entry| entry.address == *address)
            .unwrap_or(false)
    }
}

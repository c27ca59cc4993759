use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Global Configuration Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the global configuration account.
pub const GLOBAL_CONFIG_SEED: &str = "global_config";

/// Ledger-wide settings that are not owner-roster governed state.
///
/// Created lazily by the first quorum-approved `set_admin` or
/// `bind_staking_token`. Both fields start at `Pubkey::default()`, which
/// reads as "no admin" and "unbound" respectively.
#[account]
#[derive(Default, Debug)]
pub struct GlobalConfig {
    /// PDA bump for this account (for seed derivation).
    pub bump: u8,

    /// Single identity allowed to run `migrate_stake`.
    pub admin: Pubkey,

    /// Mint of the staked asset. Set once.
    pub stake_mint: Pubkey,

    /// Program-owned token account holding staked principal.
    pub custody_vault: Pubkey,
}

impl GlobalConfig {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 3: three Pubkeys
    pub const LEN: usize = 8 + 1 + 32 * 3;

    pub fn is_bound(&self) -> bool {
        self.stake_mint != Pubkey::default()
    }

    pub fn has_admin(&self) -> bool {
        self.admin != Pubkey::default()
    }
}

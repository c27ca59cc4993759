use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{Witness, WitnessSet};
use anchor_lang::prelude::*;

/// Copy an open stake from the legacy ledger into this one.
///
/// No tokens move: principal for migrated stakes stays in the legacy
/// ledger's custody.
#[derive(Accounts)]
#[instruction(addr: Pubkey, legacy_stake_id: [u8; 32])]
pub struct MigrateStake<'info> {
    /// Pays rent for the new record; counts as a witness.
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    /// Legacy stake account for `(legacy_stake_id, addr)`.
    ///
    /// CHECK: Owner and layout are checked by `LegacyStakeRecord::load`.
    pub legacy_stake: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        seeds = [STAKE_SEED.as_bytes(), legacy_stake_id.as_ref(), addr.as_ref()],
        bump,
        payer = payer,
        space = StakeRecord::LEN
    )]
    pub stake_record: Box<Account<'info, StakeRecord>>,

    #[account(
        init_if_needed,
        seeds = [STAKE_INDEX_SEED.as_bytes(), addr.as_ref(), legacy_stake_id.as_ref()],
        bump,
        payer = payer,
        space = StakeIndexEntry::LEN
    )]
    pub stake_index: Box<Account<'info, StakeIndexEntry>>,

    pub system_program: Program<'info, System>,
}

/// Runs the migration checks in order and fills `record` from the legacy
/// entry. `load_legacy` is only consulted once the id is known to be free.
///
/// # Errors
/// - `Unauthorized`: the stored admin did not sign (or none is set).
/// - `InvalidAddress`: `addr` is the default key.
/// - `DuplicateStake`: the id is already present in this ledger.
/// - `StakeNotFound`: the legacy account is not a decodable legacy stake.
/// - `LegacyStakeCompleted`: the legacy stake was already paid out.
/// - `InvalidArguments`: the legacy stake belongs to another id or address.
pub fn process_migration<W: Witness + ?Sized>(
    record: &mut StakeRecord,
    config: &GlobalConfig,
    witnesses: &W,
    addr: Pubkey,
    legacy_stake_id: [u8; 32],
    bump: u8,
    load_legacy: impl FnOnce() -> Result<LegacyStakeRecord>,
) -> Result<()> {
    require!(
        config.has_admin() && witnesses.is_witnessed(&config.admin),
        ErrorCode::Unauthorized
    );
    require_keys_neq!(addr, Pubkey::default(), ErrorCode::InvalidAddress);
    require!(record.is_vacant(), ErrorCode::DuplicateStake);

    let legacy = load_legacy()?;
    require!(!legacy.complete, ErrorCode::LegacyStakeCompleted);
    require!(
        legacy.addr == addr && legacy.tx_hash == legacy_stake_id,
        ErrorCode::InvalidArguments
    );

    record.migrate_from(&legacy, bump)
}

pub fn migrate_stake(
    ctx: Context<MigrateStake>,
    addr: Pubkey,
    legacy_stake_id: [u8; 32],
) -> Result<()> {
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let legacy_info = ctx.accounts.legacy_stake.to_account_info();
    let legacy_stake = legacy_info.key();
    let stake_key = ctx.accounts.stake_record.key();

    process_migration(
        &mut ctx.accounts.stake_record,
        &ctx.accounts.global_config,
        &witnesses,
        addr,
        legacy_stake_id,
        ctx.bumps.stake_record,
        || LegacyStakeRecord::load(&legacy_info),
    )?;

    let index = &mut ctx.accounts.stake_index;
    index.addr = addr;
    index.tx_hash = legacy_stake_id;
    index.stake = stake_key;
    index.bump = ctx.bumps.stake_index;

    msg!("Legacy stake {} migrated to {}", legacy_stake, stake_key);
    emit!(LegacyStakeMigrated::from_record(
        stake_key,
        legacy_stake,
        &ctx.accounts.stake_record
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SECONDS_PER_MONTH, STAKE_MODULUS};

    const START: i64 = 1_650_000_000;

    fn config(admin: Pubkey) -> GlobalConfig {
        GlobalConfig {
            admin,
            ..GlobalConfig::default()
        }
    }

    fn legacy(addr: Pubkey) -> LegacyStakeRecord {
        LegacyStakeRecord {
            tx_hash: [6u8; 32],
            addr,
            amount: 4 * STAKE_MODULUS,
            rate: 52,
            duration: 14,
            start_time: START,
            end_time: START + 14 * SECONDS_PER_MONTH,
            complete: false,
        }
    }

    fn migrate(
        record: &mut StakeRecord,
        admin: Pubkey,
        addr: Pubkey,
        load_legacy: impl FnOnce() -> Result<LegacyStakeRecord>,
    ) -> Result<()> {
        process_migration(record, &config(admin), &[admin][..], addr, [6u8; 32], 9, load_legacy)
    }

    #[test]
    fn admin_copies_an_open_legacy_stake() {
        let (admin, addr) = (Pubkey::new_unique(), Pubkey::new_unique());
        let source = legacy(addr);
        let mut record = StakeRecord::default();

        migrate(&mut record, admin, addr, || Ok(source)).unwrap();
        assert_eq!(record.origin, StakeOrigin::LegacyMigration);
        assert_eq!(record.rate, 52);
        assert_eq!(record.end_time, source.end_time);
        assert_eq!(record.bump, 9);
    }

    #[test]
    fn occupied_id_is_refused_before_the_legacy_lookup() {
        let (admin, addr) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut record = StakeRecord::default();
        record.migrate_from(&legacy(addr), 9).unwrap();
        let mut looked_up = false;

        let err = migrate(&mut record, admin, addr, || {
            looked_up = true;
            err!(ErrorCode::StakeNotFound)
        })
        .unwrap_err();
        assert_eq!(err, error!(ErrorCode::DuplicateStake));
        assert!(!looked_up);
    }

    #[test]
    fn completed_legacy_stake_writes_nothing() {
        let (admin, addr) = (Pubkey::new_unique(), Pubkey::new_unique());
        let finished = LegacyStakeRecord {
            complete: true,
            ..legacy(addr)
        };
        let mut record = StakeRecord::default();

        let err = migrate(&mut record, admin, addr, || Ok(finished)).unwrap_err();
        assert_eq!(err, error!(ErrorCode::LegacyStakeCompleted));
        assert_eq!(record, StakeRecord::default());
    }

    #[test]
    fn only_the_stored_admin_may_migrate() {
        let addr = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let source = legacy(addr);

        let unset = config(Pubkey::default());
        let err = process_migration(
            &mut StakeRecord::default(),
            &unset,
            &[Pubkey::default()][..],
            addr,
            [6u8; 32],
            9,
            || Ok(source),
        )
        .unwrap_err();
        assert_eq!(err, error!(ErrorCode::Unauthorized));

        let err = process_migration(
            &mut StakeRecord::default(),
            &config(Pubkey::new_unique()),
            &[stranger][..],
            addr,
            [6u8; 32],
            9,
            || Ok(source),
        )
        .unwrap_err();
        assert_eq!(err, error!(ErrorCode::Unauthorized));
    }

    #[test]
    fn mismatched_legacy_record_is_invalid() {
        let (admin, addr) = (Pubkey::new_unique(), Pubkey::new_unique());
        let source = legacy(Pubkey::new_unique());
        let mut record = StakeRecord::default();

        let err = migrate(&mut record, admin, addr, || Ok(source)).unwrap_err();
        assert_eq!(err, error!(ErrorCode::InvalidArguments));
        assert!(record.is_vacant());
    }
}

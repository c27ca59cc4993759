use crate::curve::RateSchedule;
use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{transfer_from_user_to_custody, Witness, WitnessSet};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Lock `amount` of the bound asset for `duration` months.
///
/// The stake id is `(tx_hash, staker)`. `tx_hash` is computed by the client
/// from the transaction it is about to send, since a program cannot observe
/// its own signature.
///
/// Funds movement:
/// - `amount` moves from `staker_token` → `custody_vault`, signed by `staker`.
#[derive(Accounts)]
#[instruction(amount: u64, duration: u64, tx_hash: [u8; 32])]
pub struct Stake<'info> {
    /// Pays rent for the record and index accounts.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Depositor.
    ///
    /// CHECK: Signature is checked in the handler so argument errors are
    /// reported first; also the authority of `staker_token`.
    pub staker: UncheckedAccount<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
        constraint = global_config.is_bound() @ ErrorCode::ContractNotBound,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    /// CHECK: PDA derivation enforced by seeds; membership is account presence.
    #[account(
        seeds = [WHITELIST_SEED.as_bytes(), staker.key().as_ref()],
        bump,
    )]
    pub whitelist_entry: UncheckedAccount<'info>,

    /// Zeroed on first use; a populated record means the id is taken.
    #[account(
        init_if_needed,
        seeds = [STAKE_SEED.as_bytes(), tx_hash.as_ref(), staker.key().as_ref()],
        bump,
        payer = payer,
        space = StakeRecord::LEN
    )]
    pub stake_record: Box<Account<'info, StakeRecord>>,

    #[account(
        init_if_needed,
        seeds = [STAKE_INDEX_SEED.as_bytes(), staker.key().as_ref(), tx_hash.as_ref()],
        bump,
        payer = payer,
        space = StakeIndexEntry::LEN
    )]
    pub stake_index: Box<Account<'info, StakeIndexEntry>>,

    #[account(
        mut,
        token::mint = stake_mint,
        token::token_program = token_program,
    )]
    pub staker_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = global_config.custody_vault)]
    pub custody_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = global_config.stake_mint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Identity and terms of a deposit as submitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepositTerms {
    pub tx_hash: [u8; 32],
    pub staker: Pubkey,
    pub amount: u64,
    pub duration: u64,
}

/// Checks run in this order, first failure wins:
/// 1. `staker` is not the default key       → `InvalidAddress`
/// 2. `amount` positive multiple of 1e8     → `InvalidAmount`
/// 3. `duration` within 1..=24 months       → `InvalidDuration`
/// 4. `staker` signed                       → `Unauthorized`
/// 5. `staker` is on the allow-list         → `NotWhitelisted`
/// 6. no record under `(tx_hash, staker)`   → `DuplicateStake`
/// 7. transfer into custody                 → `TransferFailed`
///
/// `transfer` runs at most once, after every check has passed, and `record`
/// is written only after it succeeds.
pub fn process_deposit<W: Witness + ?Sized>(
    record: &mut StakeRecord,
    terms: &DepositTerms,
    witnesses: &W,
    whitelisted: bool,
    now: i64,
    bump: u8,
    transfer: impl FnOnce(u64) -> Result<()>,
) -> Result<()> {
    require_keys_neq!(terms.staker, Pubkey::default(), ErrorCode::InvalidAddress);
    require!(StakeRecord::is_valid_amount(terms.amount), ErrorCode::InvalidAmount);
    require!(
        RateSchedule::is_valid_duration(terms.duration),
        ErrorCode::InvalidDuration
    );
    require!(witnesses.is_witnessed(&terms.staker), ErrorCode::Unauthorized);
    require!(whitelisted, ErrorCode::NotWhitelisted);
    require!(record.is_vacant(), ErrorCode::DuplicateStake);

    transfer(terms.amount)?;

    record.open(
        terms.tx_hash,
        terms.staker,
        terms.amount,
        terms.duration,
        now,
        bump,
    )
}

pub fn stake(ctx: Context<Stake>, amount: u64, duration: u64, tx_hash: [u8; 32]) -> Result<()> {
    let terms = DepositTerms {
        tx_hash,
        staker: ctx.accounts.staker.key(),
        amount,
        duration,
    };
    let witnesses = WitnessSet::from_context(&*ctx.accounts, ctx.remaining_accounts);
    let whitelisted = WhitelistEntry::is_member(&ctx.accounts.whitelist_entry, &terms.staker);
    let now = Clock::get()?.unix_timestamp;

    let staker = ctx.accounts.staker.to_account_info();
    let staker_token = ctx.accounts.staker_token.to_account_info();
    let custody_vault = ctx.accounts.custody_vault.to_account_info();
    let stake_mint = ctx.accounts.stake_mint.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();
    let decimals = ctx.accounts.stake_mint.decimals;

    let stake_key = ctx.accounts.stake_record.key();
    process_deposit(
        &mut ctx.accounts.stake_record,
        &terms,
        &witnesses,
        whitelisted,
        now,
        ctx.bumps.stake_record,
        |amount| {
            transfer_from_user_to_custody(
                staker,
                staker_token,
                custody_vault,
                stake_mint,
                token_program,
                amount,
                decimals,
            )
        },
    )?;

    let index = &mut ctx.accounts.stake_index;
    index.addr = terms.staker;
    index.tx_hash = tx_hash;
    index.stake = stake_key;
    index.bump = ctx.bumps.stake_index;

    let record = &ctx.accounts.stake_record;
    msg!(
        "Stake {} opened: {} for {} months at {}%",
        stake_key,
        amount,
        duration,
        record.rate
    );
    emit!(StakeCreated::from_record(stake_key, record));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STAKE_MODULUS;

    const NOW: i64 = 1_700_000_000;

    fn terms(staker: Pubkey, amount: u64, duration: u64) -> DepositTerms {
        DepositTerms {
            tx_hash: [3u8; 32],
            staker,
            amount,
            duration,
        }
    }

    fn deposit(
        record: &mut StakeRecord,
        terms: &DepositTerms,
        witnesses: &[Pubkey],
        whitelisted: bool,
        transfers: &mut Vec<u64>,
    ) -> Result<()> {
        process_deposit(record, terms, witnesses, whitelisted, NOW, 254, |amount| {
            transfers.push(amount);
            Ok(())
        })
    }

    #[test]
    fn listed_signer_opens_a_stake() {
        let staker = Pubkey::new_unique();
        let request = terms(staker, STAKE_MODULUS, 12);
        let mut record = StakeRecord::default();
        let mut transfers = Vec::new();

        deposit(&mut record, &request, &[staker], true, &mut transfers).unwrap();
        assert_eq!(transfers, vec![STAKE_MODULUS]);
        assert_eq!(record.addr, staker);
        assert_eq!(record.rate, 48);
        assert_eq!(record.start_time, NOW);
        assert!(!record.complete);
    }

    #[test]
    fn second_deposit_with_same_id_is_duplicate_and_moves_nothing() {
        let staker = Pubkey::new_unique();
        let request = terms(staker, 2 * STAKE_MODULUS, 3);
        let mut record = StakeRecord::default();
        let mut transfers = Vec::new();

        deposit(&mut record, &request, &[staker], true, &mut transfers).unwrap();
        let first = record.end_time;
        let err = deposit(&mut record, &request, &[staker], true, &mut transfers).unwrap_err();
        assert_eq!(err, error!(ErrorCode::DuplicateStake));
        assert_eq!(transfers.len(), 1);
        assert_eq!(record.end_time, first);
    }

    #[test]
    fn bad_amount_fails_before_any_transfer() {
        let staker = Pubkey::new_unique();
        let request = terms(staker, 150_000_000, 12);
        let mut record = StakeRecord::default();
        let mut transfers = Vec::new();

        let err = deposit(&mut record, &request, &[], false, &mut transfers).unwrap_err();
        assert_eq!(err, error!(ErrorCode::InvalidAmount));
        assert!(transfers.is_empty());
        assert!(record.is_vacant());
    }

    #[test]
    fn checks_run_in_order() {
        let staker = Pubkey::new_unique();
        let mut record = StakeRecord::default();
        let mut transfers = Vec::new();

        let request = terms(Pubkey::default(), 0, 0);
        let err = deposit(&mut record, &request, &[], false, &mut transfers).unwrap_err();
        assert_eq!(err, error!(ErrorCode::InvalidAddress));

        let request = terms(staker, 0, 0);
        let err = deposit(&mut record, &request, &[], false, &mut transfers).unwrap_err();
        assert_eq!(err, error!(ErrorCode::InvalidAmount));

        let request = terms(staker, STAKE_MODULUS, 25);
        let err = deposit(&mut record, &request, &[], false, &mut transfers).unwrap_err();
        assert_eq!(err, error!(ErrorCode::InvalidDuration));

        let request = terms(staker, STAKE_MODULUS, 1);
        let err = deposit(&mut record, &request, &[], false, &mut transfers).unwrap_err();
        assert_eq!(err, error!(ErrorCode::Unauthorized));

        assert!(transfers.is_empty());
        assert!(record.is_vacant());
    }

    #[test]
    fn unlisted_signer_is_refused() {
        let staker = Pubkey::new_unique();
        let request = terms(staker, STAKE_MODULUS, 6);
        let mut record = StakeRecord::default();
        let mut transfers = Vec::new();

        let err = deposit(&mut record, &request, &[staker], false, &mut transfers).unwrap_err();
        assert_eq!(err, error!(ErrorCode::NotWhitelisted));
        assert!(transfers.is_empty());
        assert!(record.is_vacant());
    }

    #[test]
    fn failed_transfer_leaves_record_vacant() {
        let staker = Pubkey::new_unique();
        let request = terms(staker, STAKE_MODULUS, 6);
        let mut record = StakeRecord::default();

        let err = process_deposit(&mut record, &request, &[staker][..], true, NOW, 254, |_| {
            err!(ErrorCode::TransferFailed)
        })
        .unwrap_err();
        assert_eq!(err, error!(ErrorCode::TransferFailed));
        assert!(record.is_vacant());
    }
}

use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::token_interface;

/// Move `amount` from a depositor's token account into custody. The
/// depositor signs the outer transaction, so no seeds are needed.
pub fn transfer_from_user_to_custody<'a>(
    authority: AccountInfo<'a>,
    from: AccountInfo<'a>,
    to_vault: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
    mint_decimals: u8,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new(
            token_program,
            token_interface::TransferChecked {
                from,
                to: to_vault,
                authority,
                mint,
            },
        ),
        amount,
        mint_decimals,
    )
    .map_err(|err| {
        msg!("custody deposit failed: {}", err);
        error!(ErrorCode::TransferFailed)
    })
}

/// Release `amount` from custody, signed by the custody authority PDA.
pub fn transfer_from_custody_to_user<'a>(
    authority: AccountInfo<'a>,
    from_vault: AccountInfo<'a>,
    to: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
    mint_decimals: u8,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program,
            token_interface::TransferChecked {
                from: from_vault,
                to,
                authority,
                mint,
            },
            signer_seeds,
        ),
        amount,
        mint_decimals,
    )
    .map_err(|err| {
        msg!("custody release failed: {}", err);
        error!(ErrorCode::TransferFailed)
    })
}

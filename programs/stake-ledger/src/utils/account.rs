use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_lang::system_program;

/// Deserialize a program-owned account, or `None` when the account is
/// missing, owned elsewhere or carries a different discriminator.
///
/// Used where absence is a normal outcome (membership flags, an
/// uninitialized roster) rather than an account-validation failure.
pub fn load_program_account<T: AccountDeserialize>(info: &AccountInfo) -> Option<T> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return None;
    }
    let data = info.try_borrow_data().ok()?;
    let mut slice: &[u8] = &data;
    T::try_deserialize(&mut slice).ok()
}

/// Write `value` back into a program-owned account.
pub fn store_program_account<T: AccountSerialize>(value: &T, info: &AccountInfo) -> Result<()> {
    require_keys_eq!(*info.owner, crate::ID, ErrorCode::InvalidArguments);
    let mut data = info.try_borrow_mut_data()?;
    let mut dst: &mut [u8] = &mut data;
    value.try_serialize(&mut dst)
}

/// Return an account's lamports to `destination` and hand it back to the
/// system program. No-op on an account this program does not own.
pub fn close_program_account<'info>(
    info: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
) -> Result<()> {
    if info.owner != &crate::ID {
        return Ok(());
    }
    let dest_starting_lamports = destination.lamports();
    **destination.lamports.borrow_mut() = dest_starting_lamports
        .checked_add(info.lamports())
        .ok_or(ErrorCode::MathOverflow)?;
    **info.lamports.borrow_mut() = 0;

    info.assign(&system_program::ID);
    info.realloc(0, false).map_err(Into::into)
}

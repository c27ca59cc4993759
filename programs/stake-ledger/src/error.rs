use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Invalid arguments for the requested operation")]
    InvalidArguments,

    #[msg("Address is not a valid identity")]
    InvalidAddress,

    #[msg("Amount must be a positive multiple of the stake modulus")]
    InvalidAmount,

    #[msg("Duration must be between 1 and 24 months")]
    InvalidDuration,

    #[msg("Required signature or quorum is missing")]
    Unauthorized,

    #[msg("Address is not on the KYC allow-list")]
    NotWhitelisted,

    #[msg("A stake with this id already exists")]
    DuplicateStake,

    #[msg("Stake not found")]
    StakeNotFound,

    #[msg("Stake has not reached its end time")]
    NotMatured,

    #[msg("Stake has already been completed")]
    AlreadyCompleted,

    #[msg("Token transfer failed")]
    TransferFailed,

    #[msg("A staking token is already bound")]
    ContractAlreadyBound,

    #[msg("No staking token is bound")]
    ContractNotBound,

    #[msg("Legacy stake has already been completed")]
    LegacyStakeCompleted,

    #[msg("Address is already a whitelist admin")]
    DuplicateWhitelistAdmin,

    #[msg("Whitelist admin list is full")]
    TooManyWhitelistAdmins,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,

    #[msg("Insufficient custody balance for the operation")]
    InsufficientCustody,
}

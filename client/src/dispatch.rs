//! Operation-name dispatcher: maps `name arg...` onto a typed [`Operation`].
//!
//! Names and arities follow the ledger's public operation surface. Arity and
//! argument parsing are checked here so a malformed call never reaches the
//! network.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use thiserror::Error;

use crate::instructions::utils::get_stake_record_address;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("`{operation}` takes {expected} argument(s), got {got}")]
    InvalidArguments {
        operation: String,
        expected: usize,
        got: usize,
    },

    #[error("`{0}` is not a valid address")]
    InvalidAddress(String),

    #[error("`{0}` is not a valid unsigned integer")]
    InvalidNumber(String),

    #[error("`{0}` is not a 32-byte hex stake id")]
    InvalidStakeId(String),

    #[error("stake for {staker} must be signed by that key, but the payer is {payer}")]
    StakerNotPayer { staker: Pubkey, payer: Pubkey },
}

/// How a stake is named on the command line: either its record address,
/// or `<tx_hash hex>:<addr>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeRef {
    Record(Pubkey),
    Id { tx_hash: [u8; 32], addr: Pubkey },
}

impl StakeRef {
    pub fn record_address(&self, program_id: &Pubkey) -> Pubkey {
        match self {
            StakeRef::Record(record) => *record,
            StakeRef::Id { tx_hash, addr } => get_stake_record_address(program_id, tx_hash, addr),
        }
    }
}

impl FromStr for StakeRef {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((hash, addr)) => Ok(StakeRef::Id {
                tx_hash: parse_hash(hash)?,
                addr: parse_address(addr)?,
            }),
            None => Ok(StakeRef::Record(parse_address(s)?)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Stake { addr: Pubkey, amount: u64, duration: u64 },
    CompleteStake { stake: StakeRef },
    GetStake { stake: StakeRef },
    GetStakesByAddress { addr: Pubkey },
    TotalStaked,
    CalculateRate { duration: u64 },
    InitializeOwners,
    GetOwners,
    SwitchOwner { slot: String, new_owner: Pubkey },
    SetAdmin { admin: Pubkey },
    GetAdmin,
    MigrateStake { addr: Pubkey, legacy_stake_id: [u8; 32] },
    AddWhitelistAdmin { address: Pubkey },
    RemoveWhitelistAdmin { address: Pubkey },
    AddToWhitelist { address: Pubkey },
    RemoveFromWhitelist { address: Pubkey },
    IsWhitelisted { address: Pubkey },
    GetWhitelistAdmins,
    BindStakingToken { mint: Pubkey },
    EmergencyWithdraw { amount: u64, destination: Pubkey },
}

/// Every accepted operation name with its argument count.
pub const OPERATIONS: &[(&str, usize)] = &[
    ("stake", 3),
    ("completeStake", 1),
    ("getStake", 1),
    ("getStakesByAddress", 1),
    ("totalStaked", 0),
    ("calculateRate", 1),
    ("initializeOwners", 0),
    ("getOwners", 0),
    ("switchOwner", 2),
    ("setAdmin", 1),
    ("getAdmin", 0),
    ("migrateStake", 2),
    ("addWhitelistAdmin", 1),
    ("removeWhitelistAdmin", 1),
    ("addToWhitelist", 1),
    ("removeFromWhitelist", 1),
    ("isWhitelisted", 1),
    ("getWhitelistAdmins", 0),
    ("bindStakingToken", 1),
    ("emergencyWithdraw", 2),
];

impl Operation {
    pub fn parse<S: AsRef<str>>(name: &str, args: &[S]) -> Result<Operation, DispatchError> {
        let expected = OPERATIONS
            .iter()
            .find(|(operation, _)| *operation == name)
            .map(|(_, arity)| *arity)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;
        if args.len() != expected {
            return Err(DispatchError::InvalidArguments {
                operation: name.to_string(),
                expected,
                got: args.len(),
            });
        }
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();

        let operation = match name {
            "stake" => Operation::Stake {
                addr: parse_address(args[0])?,
                amount: parse_u64(args[1])?,
                duration: parse_u64(args[2])?,
            },
            "completeStake" => Operation::CompleteStake {
                stake: args[0].parse()?,
            },
            "getStake" => Operation::GetStake {
                stake: args[0].parse()?,
            },
            "getStakesByAddress" => Operation::GetStakesByAddress {
                addr: parse_address(args[0])?,
            },
            "totalStaked" => Operation::TotalStaked,
            "calculateRate" => Operation::CalculateRate {
                duration: parse_u64(args[0])?,
            },
            "initializeOwners" => Operation::InitializeOwners,
            "getOwners" => Operation::GetOwners,
            "switchOwner" => Operation::SwitchOwner {
                slot: args[0].to_string(),
                new_owner: parse_address(args[1])?,
            },
            "setAdmin" => Operation::SetAdmin {
                admin: parse_address(args[0])?,
            },
            "getAdmin" => Operation::GetAdmin,
            "migrateStake" => Operation::MigrateStake {
                addr: parse_address(args[0])?,
                legacy_stake_id: parse_hash(args[1])?,
            },
            "addWhitelistAdmin" => Operation::AddWhitelistAdmin {
                address: parse_address(args[0])?,
            },
            "removeWhitelistAdmin" => Operation::RemoveWhitelistAdmin {
                address: parse_address(args[0])?,
            },
            "addToWhitelist" => Operation::AddToWhitelist {
                address: parse_address(args[0])?,
            },
            "removeFromWhitelist" => Operation::RemoveFromWhitelist {
                address: parse_address(args[0])?,
            },
            "isWhitelisted" => Operation::IsWhitelisted {
                address: parse_address(args[0])?,
            },
            "getWhitelistAdmins" => Operation::GetWhitelistAdmins,
            "bindStakingToken" => Operation::BindStakingToken {
                mint: parse_address(args[0])?,
            },
            "emergencyWithdraw" => Operation::EmergencyWithdraw {
                amount: parse_u64(args[0])?,
                destination: parse_address(args[1])?,
            },
            other => return Err(DispatchError::UnknownOperation(other.to_string())),
        };
        Ok(operation)
    }

    /// The client signs with the payer alone, so a deposit can only be made
    /// for the payer's own address.
    pub fn ensure_signable(&self, payer: &Pubkey) -> Result<(), DispatchError> {
        match self {
            Operation::Stake { addr, .. } if addr != payer => Err(DispatchError::StakerNotPayer {
                staker: *addr,
                payer: *payer,
            }),
            _ => Ok(()),
        }
    }

    /// Operations that only read state and are answered by simulation.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Operation::GetStake { .. }
                | Operation::GetStakesByAddress { .. }
                | Operation::TotalStaked
                | Operation::CalculateRate { .. }
                | Operation::GetOwners
                | Operation::GetAdmin
                | Operation::IsWhitelisted { .. }
                | Operation::GetWhitelistAdmins
        )
    }
}

/// Base58 key of exactly 32 bytes.
pub fn parse_address(s: &str) -> Result<Pubkey, DispatchError> {
    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|_| DispatchError::InvalidAddress(s.to_string()))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| DispatchError::InvalidAddress(s.to_string()))?;
    Ok(Pubkey::new_from_array(bytes))
}

pub fn parse_hash(s: &str) -> Result<[u8; 32], DispatchError> {
    let bytes = hex::decode(s).map_err(|_| DispatchError::InvalidStakeId(s.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| DispatchError::InvalidStakeId(s.to_string()))
}

fn parse_u64(s: &str) -> Result<u64, DispatchError> {
    s.parse()
        .map_err(|_| DispatchError::InvalidNumber(s.to_string()))
}

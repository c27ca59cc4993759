#![allow(dead_code)]
use anchor_lang::AnchorDeserialize;
use anyhow::{bail, format_err, Result};
use clap::Parser;
use colorful::Colorful;
use configparser::ini::Ini;
use serde::Serialize;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};
use stake_ledger::states::{GlobalConfig, StakeOrigin, StakeRecord, StakeStatus};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

mod dispatch;
mod instructions;
use dispatch::{parse_hash, Operation, StakeRef};
use instructions::ledger_instructions::*;
use instructions::rpc::*;
use instructions::stakes_by_address::StakesByAddress;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    owner_paths: Vec<String>,
    stake_ledger_program: Pubkey,
}

fn required(config: &Ini, key: &str) -> Result<String> {
    match config.get("Global", key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!("{} must not be empty", key),
    }
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|err| format_err!("failed to load {}: {}", client_config, err))?;
    let http_url = required(&config, "http_url")?;
    let ws_url = required(&config, "ws_url")?;
    let payer_path = required(&config, "payer_path")?;
    let admin_path = required(&config, "admin_path")?;

    // Keypairs of roster owners that co-sign quorum operations.
    let owner_paths = config
        .get("Global", "owner_paths")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(String::from)
        .collect();

    let stake_ledger_program_str = required(&config, "stake_ledger_program")?;
    let stake_ledger_program = Pubkey::from_str(&stake_ledger_program_str)?;

    Ok(ClientConfig {
        http_url,
        ws_url,
        payer_path,
        admin_path,
        owner_paths,
        stake_ledger_program,
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: StakeLedgerCommands,
}

#[derive(Debug, Parser)]
pub enum StakeLedgerCommands {
    InitializeOwners,
    GetOwners,
    SwitchOwner {
        /// `owner1` .. `owner5`
        #[arg(long)]
        slot: String,
        #[arg(long)]
        new_owner: Pubkey,
    },
    SetAdmin {
        #[arg(long)]
        admin: Pubkey,
    },
    GetAdmin,
    BindStakingToken {
        #[arg(long)]
        mint: Pubkey,
    },
    AddWhitelistAdmin {
        #[arg(long)]
        address: Pubkey,
    },
    RemoveWhitelistAdmin {
        #[arg(long)]
        address: Pubkey,
    },
    GetWhitelistAdmins,
    AddToWhitelist {
        #[arg(long)]
        address: Pubkey,
    },
    RemoveFromWhitelist {
        #[arg(long)]
        address: Pubkey,
    },
    IsWhitelisted {
        #[arg(long)]
        address: Pubkey,
    },
    Stake {
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        duration: u64,
        /// Defaults to the payer, and must be the payer: the depositor signs
        /// the transfer into custody.
        #[arg(long)]
        staker: Option<Pubkey>,
    },
    CompleteStake {
        /// Record address or `<tx_hash hex>:<addr>`.
        #[arg(long)]
        stake: StakeRef,
    },
    GetStake {
        #[arg(long)]
        stake: StakeRef,
    },
    GetStakesByAddress {
        #[arg(long)]
        addr: Pubkey,
    },
    TotalStaked,
    CalculateRate {
        #[arg(long)]
        duration: u64,
    },
    MigrateStake {
        #[arg(long)]
        addr: Pubkey,
        /// Legacy stake id, 32 bytes hex.
        #[arg(long)]
        legacy_stake_id: String,
    },
    EmergencyWithdraw {
        #[arg(long)]
        amount: u64,
        /// Receiving token account.
        #[arg(long)]
        destination: Pubkey,
    },
    /// Invoke an operation by name, e.g. `call stake <addr> <amount> <duration>`.
    Call {
        operation: String,
        args: Vec<String>,
    },
}

impl StakeLedgerCommands {
    fn into_operation(self, payer: Pubkey) -> Result<Operation> {
        let operation = match self {
            StakeLedgerCommands::InitializeOwners => Operation::InitializeOwners,
            StakeLedgerCommands::GetOwners => Operation::GetOwners,
            StakeLedgerCommands::SwitchOwner { slot, new_owner } => {
                Operation::SwitchOwner { slot, new_owner }
            }
            StakeLedgerCommands::SetAdmin { admin } => Operation::SetAdmin { admin },
            StakeLedgerCommands::GetAdmin => Operation::GetAdmin,
            StakeLedgerCommands::BindStakingToken { mint } => Operation::BindStakingToken { mint },
            StakeLedgerCommands::AddWhitelistAdmin { address } => {
                Operation::AddWhitelistAdmin { address }
            }
            StakeLedgerCommands::RemoveWhitelistAdmin { address } => {
                Operation::RemoveWhitelistAdmin { address }
            }
            StakeLedgerCommands::GetWhitelistAdmins => Operation::GetWhitelistAdmins,
            StakeLedgerCommands::AddToWhitelist { address } => {
                Operation::AddToWhitelist { address }
            }
            StakeLedgerCommands::RemoveFromWhitelist { address } => {
                Operation::RemoveFromWhitelist { address }
            }
            StakeLedgerCommands::IsWhitelisted { address } => Operation::IsWhitelisted { address },
            StakeLedgerCommands::Stake {
                amount,
                duration,
                staker,
            } => Operation::Stake {
                addr: staker.unwrap_or(payer),
                amount,
                duration,
            },
            StakeLedgerCommands::CompleteStake { stake } => Operation::CompleteStake { stake },
            StakeLedgerCommands::GetStake { stake } => Operation::GetStake { stake },
            StakeLedgerCommands::GetStakesByAddress { addr } => {
                Operation::GetStakesByAddress { addr }
            }
            StakeLedgerCommands::TotalStaked => Operation::TotalStaked,
            StakeLedgerCommands::CalculateRate { duration } => {
                Operation::CalculateRate { duration }
            }
            StakeLedgerCommands::MigrateStake {
                addr,
                legacy_stake_id,
            } => Operation::MigrateStake {
                addr,
                legacy_stake_id: parse_hash(&legacy_stake_id)?,
            },
            StakeLedgerCommands::EmergencyWithdraw {
                amount,
                destination,
            } => Operation::EmergencyWithdraw {
                amount,
                destination,
            },
            StakeLedgerCommands::Call { operation, args } => Operation::parse(&operation, &args)?,
        };
        operation.ensure_signable(&payer)?;
        Ok(operation)
    }
}

#[derive(Debug, Serialize)]
struct StakeView {
    stake: String,
    addr: String,
    tx_hash: String,
    origin: String,
    amount: u64,
    rate: u64,
    duration: u64,
    start_time: i64,
    end_time: i64,
    complete: bool,
    status: String,
}

impl StakeView {
    fn new(stake: &Pubkey, record: &StakeRecord, now: i64) -> Self {
        StakeView {
            stake: stake.to_string(),
            addr: record.addr.to_string(),
            tx_hash: hex::encode(record.tx_hash),
            origin: match record.origin {
                StakeOrigin::Deposit => "deposit",
                StakeOrigin::LegacyMigration => "legacy-migration",
            }
            .to_string(),
            amount: record.amount,
            rate: record.rate,
            duration: record.duration,
            start_time: record.start_time,
            end_time: record.end_time,
            complete: record.complete,
            status: format!("{:?}", record.status(now)),
        }
    }
}

fn colored_status(status: StakeStatus) -> String {
    match status {
        StakeStatus::Active => "active".yellow().to_string(),
        StakeStatus::Matured => "matured".green().to_string(),
        StakeStatus::Completed => "completed".blue().to_string(),
    }
}

fn unix_now() -> Result<i64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64)
}

struct Ledger<'a> {
    config: &'a ClientConfig,
    rpc_client: &'a RpcClient,
    payer: &'a Keypair,
}

impl Ledger<'_> {
    fn program_id(&self) -> Pubkey {
        self.config.stake_ledger_program
    }

    fn owners(&self) -> Result<Vec<Keypair>> {
        self.config
            .owner_paths
            .iter()
            .map(|path| read_keypair_file(path))
            .collect()
    }

    fn admin(&self) -> Result<Vec<Keypair>> {
        Ok(vec![read_keypair_file(&self.config.admin_path)?])
    }

    fn build_txn(
        &self,
        instructions: &[Instruction],
        co_signers: &[Keypair],
        recent_hash: Hash,
    ) -> Result<Transaction> {
        let mut signers: Vec<&Keypair> = vec![self.payer];
        for keypair in co_signers {
            if !signers.iter().any(|s| s.pubkey() == keypair.pubkey()) {
                signers.push(keypair);
            }
        }
        let mut txn = Transaction::new_with_payer(instructions, Some(&self.payer.pubkey()));
        txn.try_sign(&signers, recent_hash)?;
        Ok(txn)
    }

    fn send(&self, instructions: Vec<Instruction>, co_signers: &[Keypair]) -> Result<Signature> {
        let recent_hash = self.rpc_client.get_latest_blockhash()?;
        let txn = self.build_txn(&instructions, co_signers, recent_hash)?;
        send_txn(self.rpc_client, &txn, true)
    }

    fn query<T: AnchorDeserialize>(&self, instructions: Vec<Instruction>) -> Result<T> {
        let recent_hash = self.rpc_client.get_latest_blockhash()?;
        let txn = self.build_txn(&instructions, &[], recent_hash)?;
        simulate_return(self.rpc_client, &txn, &self.program_id())
    }

    /// Boolean-returning mutations: simulate for the answer, then send
    /// only if the call would change something.
    fn send_checked(&self, instructions: Vec<Instruction>, co_signers: &[Keypair]) -> Result<()> {
        let recent_hash = self.rpc_client.get_latest_blockhash()?;
        let txn = self.build_txn(&instructions, co_signers, recent_hash)?;
        let accepted: bool = simulate_return(self.rpc_client, &txn, &self.program_id())?;
        if !accepted {
            println!("{}", serde_json::json!({ "result": false }));
            return Ok(());
        }
        let signature = send_txn(self.rpc_client, &txn, true)?;
        println!(
            "{}",
            serde_json::json!({ "result": true, "signature": signature.to_string() })
        );
        Ok(())
    }

    fn global_config(&self) -> Result<GlobalConfig> {
        let account = self
            .rpc_client
            .get_account(&get_global_config_address(&self.program_id()))?;
        deserialize_anchor_account(&account)
    }

    fn custody(&self) -> Result<CustodyAccounts> {
        let global_config = self.global_config()?;
        if !global_config.is_bound() {
            bail!("no staking token is bound");
        }
        let mint_account = self.rpc_client.get_account(&global_config.stake_mint)?;
        Ok(CustodyAccounts {
            stake_mint: global_config.stake_mint,
            custody_vault: global_config.custody_vault,
            token_program: mint_account.owner,
        })
    }

    fn execute(&self, operation: Operation) -> Result<()> {
        match operation {
            Operation::InitializeOwners => {
                self.send_checked(initialize_owners_instr(self.config)?, &[])?;
            }
            Operation::GetOwners => {
                let owners: [Pubkey; 5] = self.query(get_owners_instr(self.config)?)?;
                let owners: Vec<String> = owners.iter().map(|o| o.to_string()).collect();
                println!("{}", serde_json::to_string_pretty(&owners)?);
            }
            Operation::SwitchOwner { slot, new_owner } => {
                let owners = self.owners()?;
                let keys: Vec<Pubkey> = owners.iter().map(|k| k.pubkey()).collect();
                let ixs = switch_owner_instr(self.config, slot, new_owner, &keys)?;
                self.send_checked(ixs, &owners)?;
            }
            Operation::SetAdmin { admin } => {
                let owners = self.owners()?;
                let keys: Vec<Pubkey> = owners.iter().map(|k| k.pubkey()).collect();
                let signature = self.send(set_admin_instr(self.config, admin, &keys)?, &owners)?;
                println!("{}", signature);
            }
            Operation::GetAdmin => {
                let admin: Pubkey = self.query(get_admin_instr(self.config)?)?;
                println!("{}", admin);
            }
            Operation::BindStakingToken { mint } => {
                let owners = self.owners()?;
                let keys: Vec<Pubkey> = owners.iter().map(|k| k.pubkey()).collect();
                let token_program = self.rpc_client.get_account(&mint)?.owner;
                let ixs = bind_staking_token_instr(self.config, mint, token_program, &keys)?;
                let signature = self.send(ixs, &owners)?;
                println!("{}", signature);
            }
            Operation::AddWhitelistAdmin { address } => {
                let owners = self.owners()?;
                let keys: Vec<Pubkey> = owners.iter().map(|k| k.pubkey()).collect();
                let ixs = add_whitelist_admin_instr(self.config, address, &keys)?;
                self.send_checked(ixs, &owners)?;
            }
            Operation::RemoveWhitelistAdmin { address } => {
                let owners = self.owners()?;
                let keys: Vec<Pubkey> = owners.iter().map(|k| k.pubkey()).collect();
                let ixs = remove_whitelist_admin_instr(self.config, address, &keys)?;
                self.send_checked(ixs, &owners)?;
            }
            Operation::GetWhitelistAdmins => {
                let admins: Vec<Pubkey> = self.query(get_whitelist_admins_instr(self.config)?)?;
                let admins: Vec<String> = admins.iter().map(|a| a.to_string()).collect();
                println!("{}", serde_json::to_string_pretty(&admins)?);
            }
            Operation::AddToWhitelist { address } => {
                let admin = self.admin()?;
                let keys: Vec<Pubkey> = admin.iter().map(|k| k.pubkey()).collect();
                let ixs = add_to_whitelist_instr(self.config, address, &keys)?;
                println!("{}", self.send(ixs, &admin)?);
            }
            Operation::RemoveFromWhitelist { address } => {
                let admin = self.admin()?;
                let keys: Vec<Pubkey> = admin.iter().map(|k| k.pubkey()).collect();
                let ixs = remove_from_whitelist_instr(self.config, address, &keys)?;
                println!("{}", self.send(ixs, &admin)?);
            }
            Operation::IsWhitelisted { address } => {
                let listed: bool = self.query(is_whitelisted_instr(self.config, address)?)?;
                println!("{}", listed);
            }
            Operation::Stake {
                addr,
                amount,
                duration,
            } => {
                let custody = self.custody()?;
                let staker_token = get_associated_token_address_with_program_id(
                    &addr,
                    &custody.stake_mint,
                    &custody.token_program,
                );
                // The stake id is bound to the blockhash the transaction is signed with.
                let recent_hash = self.rpc_client.get_latest_blockhash()?;
                let tx_hash = derive_stake_tx_hash(&recent_hash, &addr, amount, duration);
                let ixs = stake_instr(
                    self.config,
                    addr,
                    staker_token,
                    amount,
                    duration,
                    tx_hash,
                    custody,
                )?;
                let txn = self.build_txn(&ixs, &[], recent_hash)?;
                let signature = send_txn(self.rpc_client, &txn, true)?;
                let stake_record = get_stake_record_address(&self.program_id(), &tx_hash, &addr);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "signature": signature.to_string(),
                        "stake_id": format!("{}:{}", hex::encode(tx_hash), addr),
                        "stake": stake_record.to_string(),
                    }))?
                );
            }
            Operation::CompleteStake { stake } => {
                let custody = self.custody()?;
                let stake_record = stake.record_address(&self.program_id());
                let record: StakeRecord = self
                    .rpc_client
                    .get_account(&stake_record)
                    .map_err(|_| format_err!("stake {} not found", stake_record))
                    .and_then(|account| deserialize_anchor_account(&account))?;
                let destination_token = get_associated_token_address_with_program_id(
                    &record.addr,
                    &custody.stake_mint,
                    &custody.token_program,
                );
                let mut ixs = vec![create_associated_token_account_idempotent(
                    &self.payer.pubkey(),
                    &record.addr,
                    &custody.stake_mint,
                    &custody.token_program,
                )];
                ixs.extend(complete_stake_instr(
                    self.config,
                    stake_record,
                    destination_token,
                    custody,
                )?);
                println!("{}", self.send(ixs, &[])?);
            }
            Operation::GetStake { stake } => {
                let stake_record = stake.record_address(&self.program_id());
                let record: StakeRecord = self.query(get_stake_instr(self.config, stake_record)?)?;
                let view = StakeView::new(&stake_record, &record, unix_now()?);
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
            Operation::GetStakesByAddress { addr } => {
                let now = unix_now()?;
                let stakes = StakesByAddress::scan(self.rpc_client, &self.program_id(), &addr)?;
                println!("{} stake(s) for {}", stakes.len(), addr);
                for item in stakes {
                    let (stake, record) = item?;
                    println!(
                        "{} {:>20} {:>2}m {:>3}% {}",
                        stake,
                        record.amount,
                        record.duration,
                        record.rate,
                        colored_status(record.status(now))
                    );
                }
            }
            Operation::TotalStaked => {
                let custody = self.custody()?;
                let total: u64 =
                    self.query(total_staked_instr(self.config, custody.custody_vault)?)?;
                println!("{}", total);
            }
            Operation::CalculateRate { duration } => {
                let rate: u64 = self.query(calculate_rate_instr(self.config, duration)?)?;
                println!("{}", rate);
            }
            Operation::MigrateStake {
                addr,
                legacy_stake_id,
            } => {
                let admin = self.admin()?;
                let keys: Vec<Pubkey> = admin.iter().map(|k| k.pubkey()).collect();
                let ixs = migrate_stake_instr(self.config, addr, legacy_stake_id, &keys)?;
                println!("{}", self.send(ixs, &admin)?);
            }
            Operation::EmergencyWithdraw {
                amount,
                destination,
            } => {
                let owners = self.owners()?;
                let keys: Vec<Pubkey> = owners.iter().map(|k| k.pubkey()).collect();
                let custody = self.custody()?;
                let ixs =
                    emergency_withdraw_instr(self.config, amount, destination, custody, &keys)?;
                println!("{}", self.send(ixs, &owners)?);
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let client_config = "client_config.ini";
    let ledger_config = load_cfg(client_config)?;
    // cluster params.
    let payer = read_keypair_file(&ledger_config.payer_path)?;
    // solana rpc client
    let rpc_client = RpcClient::new(ledger_config.http_url.to_string());

    let opts = Opts::parse();
    let operation = opts.command.into_operation(payer.pubkey())?;

    let ledger = Ledger {
        config: &ledger_config,
        rpc_client: &rpc_client,
        payer: &payer,
    };
    ledger.execute(operation)
}

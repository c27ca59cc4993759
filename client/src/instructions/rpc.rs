use anchor_lang::AnchorDeserialize;
use anyhow::{bail, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcSendTransactionConfig},
    rpc_filter::RpcFilterType,
};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::UiReturnDataEncoding;

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    Ok(client.send_and_confirm_transaction_with_spinner_and_config(
        txn,
        if wait_confirm {
            CommitmentConfig::confirmed()
        } else {
            CommitmentConfig::processed()
        },
        RpcSendTransactionConfig {
            skip_preflight: true,
            ..RpcSendTransactionConfig::default()
        },
    )?)
}

/// Simulate `txn` and decode the program's return data as `T`.
///
/// Read-only instructions answer through return data, so this is how the
/// client runs them without paying for a transaction.
pub fn simulate_return<T: AnchorDeserialize>(
    client: &RpcClient,
    txn: &Transaction,
    program_id: &Pubkey,
) -> Result<T> {
    let result = client.simulate_transaction(txn)?.value;
    if let Some(err) = result.err {
        for log in result.logs.unwrap_or_default() {
            println!("{}", log);
        }
        bail!("simulation failed: {}", err);
    }
    // All-zero results (`false`, `0`) are trimmed to nothing and reported as absent.
    let Some(return_data) = result.return_data else {
        return decode_return_data(&[]);
    };
    if return_data.program_id != program_id.to_string() {
        bail!("return data came from {}", return_data.program_id);
    }
    let (encoded, encoding) = return_data.data;
    if encoding != UiReturnDataEncoding::Base64 {
        bail!("unexpected return data encoding");
    }
    let bytes = STANDARD.decode(encoded)?;
    decode_return_data(&bytes)
}

pub fn decode_return_data<T: AnchorDeserialize>(bytes: &[u8]) -> Result<T> {
    // Trailing zeroes are trimmed from return data; borsh reads past them as zeroes.
    let mut padded = bytes.to_vec();
    padded.resize(bytes.len().max(1024), 0);
    let mut slice: &[u8] = &padded;
    T::deserialize(&mut slice).map_err(Into::into)
}

pub fn get_program_accounts_with_filters(
    client: &RpcClient,
    program_id: &Pubkey,
    filters: Vec<RpcFilterType>,
) -> Result<Vec<(Pubkey, Account)>> {
    Ok(client.get_program_accounts_with_config(
        program_id,
        RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        },
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::AnchorSerialize;

    #[test]
    fn return_data_survives_trimmed_zeroes() {
        let value: (u64, bool) = (48, false);
        let mut bytes = Vec::new();
        value.serialize(&mut bytes).unwrap();
        while bytes.last() == Some(&0) {
            bytes.pop();
        }
        let decoded: (u64, bool) = decode_return_data(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn empty_return_data_decodes_as_zero() {
        let decoded: u64 = decode_return_data(&[]).unwrap();
        assert_eq!(decoded, 0);
    }
}

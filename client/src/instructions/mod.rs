pub mod ledger_instructions;
pub mod rpc;
pub mod stakes_by_address;
pub mod utils;

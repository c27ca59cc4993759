pub mod owners;
pub use owners::*;

pub mod admin;
pub use admin::*;

pub mod bind_staking_token;
pub use bind_staking_token::*;

pub mod whitelist_admin;
pub use whitelist_admin::*;

pub mod whitelist;
pub use whitelist::*;

pub mod stake;
pub use stake::*;

pub mod complete_stake;
pub use complete_stake::*;

pub mod queries;
pub use queries::*;

pub mod migrate_stake;
pub use migrate_stake::*;

pub mod emergency_withdraw;
pub use emergency_withdraw::*;

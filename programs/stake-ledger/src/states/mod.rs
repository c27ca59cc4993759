pub mod events;
pub use events::*;

pub mod global_config;
pub use global_config::*;

pub mod owner_roster;
pub use owner_roster::*;

pub mod whitelist;
pub use whitelist::*;

pub mod stake_record;
pub use stake_record::*;

pub mod stake_index;
pub use stake_index::*;

pub mod legacy_stake;
pub use legacy_stake::*;

pub mod rate_schedule;
pub use rate_schedule::*;

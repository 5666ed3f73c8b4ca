//! Laravel Vapor API client and endpoint models

pub mod account;
pub mod client;
pub mod common;
pub mod error;
pub mod providers;
pub mod records;
pub mod teams;
pub mod zones;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use account::Account;
pub use client::{Client, DEFAULT_API_HOST};
pub use error::ApiError;
pub use providers::CloudProvider;
pub use records::ZoneRecord;
pub use teams::Team;
pub use zones::Zone;

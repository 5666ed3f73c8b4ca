pub mod account;
pub mod teams;

pub use account::AccountDataSource;
pub use teams::TeamsDataSource;

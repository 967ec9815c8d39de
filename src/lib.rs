pub mod catdrop;
pub mod chain_account;
pub mod error;
pub mod snapshot_utils;
pub mod token_amount;

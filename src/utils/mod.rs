//! Shared utilities

pub mod keychain;

pub use keychain::{KeychainManager, KeychainPort};

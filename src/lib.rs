pub mod client;
pub mod config;
pub mod deploy;
pub mod namehash;
pub mod rpc;

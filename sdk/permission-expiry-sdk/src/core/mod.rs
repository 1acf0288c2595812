pub mod config;
pub mod connection;
pub mod constants;
pub mod network;
pub mod rest;
pub mod signer;

pub mod actions;
pub mod client;
pub mod registry;

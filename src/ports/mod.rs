//! Port traits for external collaborators.

pub mod data_port;
pub mod config_port;

//! Port traits for the external collaborators of a screening run.

pub mod config_port;
pub mod export_port;
pub mod fundamentals_port;
pub mod price_data_port;

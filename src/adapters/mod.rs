//! Concrete implementations of the ports.

pub mod csv_export_adapter;
pub mod csv_fundamentals_adapter;
pub mod csv_price_adapter;
pub mod file_config_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
pub mod table_csv_adapter;

//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_result_adapter;
pub mod file_config_adapter;
#[cfg(feature = "telegram")]
pub mod telegram_adapter;
#[cfg(feature = "yahoo")]
pub mod yahoo_adapter;

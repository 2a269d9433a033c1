//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod strategy;
pub mod stock_pool;
pub mod screening;
pub mod universe;
pub mod config;
pub mod error;

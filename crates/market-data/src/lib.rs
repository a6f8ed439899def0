//! # Market Data Crate
//!
//! This crate is the system's file adapter. It turns a daily price file into a
//! validated `PriceSeries` and writes the derived signal and portfolio series
//! back out as tables.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** All CSV handling lives here. The strategy and
//!   backtester crates only ever see `core-types` values.
//! - **Explicit Window:** The loader is always told which dates to keep. It
//!   never consults the clock.
//! - **No Repair:** Out-of-order dates, duplicates and missing prices are
//!   reported, not fixed.
//!
//! ## Public API
//!
//! - `load_price_series`: Reads and validates the prices inside a window.
//! - `write_signals` / `write_portfolio`: Export the result series.
//! - `DataError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod export;
pub mod loader;

// Re-export the key components to create a clean, public-facing API.
pub use error::DataError;
pub use export::{write_portfolio, write_signals};
pub use loader::{load_price_series, read_price_series};

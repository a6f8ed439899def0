//! # Crossover Strategy Library
//!
//! This crate contains the signal-generation logic. It defines a universal
//! `Strategy` trait and the moving average crossover that implements it.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   portfolios, or reporting. It depends only on `core-types` and `configuration`.
//! - **Pure Functions:** `generate_signals` is a function of its arguments. The
//!   `MACrossover` struct only carries parameters, so one instance can be reused
//!   for any number of series.
//! - **Auditable Averaging:** The rolling mean is an explicit ring buffer
//!   (`RollingMean`) with a "minimum periods = 1" rule, tested in isolation.
//!
//! ## Public API
//!
//! - `Strategy`: The trait the backtester drives.
//! - `MACrossover` / `generate_signals`: The crossover signal generator.
//! - `RollingMean`: The windowed average used by the generator.

// Declare all the modules that constitute this crate.
pub mod error;
pub mod ma_crossover;
pub mod rolling;

// Re-export the key components to create a clean, public-facing API.
pub use error::StrategyError;
pub use ma_crossover::{MACrossover, generate_signals};
pub use rolling::RollingMean;

use core_types::{PriceSeries, SignalSeries};

/// The core trait that all signal generators implement.
///
/// A strategy turns a whole price series into a signal series in one forward
/// pass. Implementations hold parameters only, never per-run state, which is
/// why `generate` takes `&self`. The `Send + Sync` bounds allow independent
/// backtests to run on separate threads.
pub trait Strategy: Send + Sync {
    /// A short human-readable label, used in logs and reports.
    fn name(&self) -> String;

    /// Derives the signal series for `prices`.
    ///
    /// The result is aligned 1:1 with the input: same dates, same order.
    fn generate(&self, prices: &PriceSeries) -> Result<SignalSeries, StrategyError>;
}

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Exposure, Transition};
pub use error::CoreError;
pub use structs::{
    BacktestWindow, PortfolioRecord, PortfolioSeries, PricePoint, PriceSeries, SignalRecord,
    SignalSeries, Trade, TransitionMarker,
};

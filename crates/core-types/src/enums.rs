use serde::{Deserialize, Serialize};

/// The binary crossover signal: invested or not invested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Exposure {
    #[default]
    Flat,
    Long,
}

impl Exposure {
    /// Numeric form of the signal (0.0 or 1.0).
    pub fn as_f64(&self) -> f64 {
        match self {
            Exposure::Flat => 0.0,
            Exposure::Long => 1.0,
        }
    }

    /// Units held under this exposure for a fixed position size.
    pub fn units(&self, position_size: u32) -> u32 {
        match self {
            Exposure::Flat => 0,
            Exposure::Long => position_size,
        }
    }
}

/// A change (or lack of change) in exposure between two consecutive steps.
///
/// Transitions are derived by comparing `Exposure` values, so marking entries
/// and exits never depends on floating-point equality of a difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    Entry,
    Exit,
    Hold,
}

impl Transition {
    pub fn between(previous: Exposure, current: Exposure) -> Self {
        match (previous, current) {
            (Exposure::Flat, Exposure::Long) => Transition::Entry,
            (Exposure::Long, Exposure::Flat) => Transition::Exit,
            _ => Transition::Hold,
        }
    }

    /// The signed change of the numeric signal: +1.0, -1.0 or 0.0.
    pub fn delta(&self) -> f64 {
        match self {
            Transition::Entry => 1.0,
            Transition::Exit => -1.0,
            Transition::Hold => 0.0,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Transition::Hold)
    }
}

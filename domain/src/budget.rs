//! Cost guard: a per-session soft cap plus a global hard ceiling.

use serde::{Deserialize, Serialize};

/// Absolute spend limit for any single session, regardless of its own cap
pub const HARD_COST_CEILING_USD: f64 = 10.0;

/// Fraction of the soft cap at which a warning is raised
pub const WARNING_RATIO: f64 = 0.75;

/// Result of checking a session's spend against its soft cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub within_budget: bool,
    pub current_cost: f64,
    pub warning_threshold: bool,
}

impl BudgetStatus {
    /// Remaining spend before the soft cap, never negative
    pub fn remaining(&self, cap: f64) -> f64 {
        (cap - self.current_cost).max(0.0)
    }
}

/// Compare cumulative spend with the soft cap.
///
/// `within_budget` is false once `current_cost` reaches `cap`;
/// `warning_threshold` turns on at 75% of it.
pub fn check_budget_limit(current_cost: f64, cap: f64) -> BudgetStatus {
    BudgetStatus {
        within_budget: current_cost < cap,
        current_cost,
        warning_threshold: current_cost >= cap * WARNING_RATIO,
    }
}

pub fn hard_ceiling_reached(current_cost: f64) -> bool {
    current_cost >= HARD_COST_CEILING_USD
}

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Lending rules applied by the loan engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPolicy {
    /// Days between loan and due date.
    pub loan_period_days: i64,
    /// Maximum concurrently active loans per reader.
    pub max_active_loans: usize,
    /// Penalty days charged per day of delay.
    pub penalty_per_late_day: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: 30,
            max_active_loans: 3,
            penalty_per_late_day: 2,
        }
    }
}

impl LoanPolicy {
    /// Time between placing a loan and its due date.
    pub fn loan_period(&self) -> Duration {
        Duration::days(self.loan_period_days)
    }

    /// Penalty days charged for `delay_days` late.
    pub fn penalty_for(&self, delay_days: u32) -> u32 {
        delay_days.saturating_mul(self.penalty_per_late_day)
    }
}

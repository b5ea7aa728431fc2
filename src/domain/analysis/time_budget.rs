//! Wall-clock time budget for a session.

use serde::{Deserialize, Serialize};

/// Default length of an exercise.
pub const DEFAULT_BUDGET_MINUTES: u32 = 20;

/// How long before the budget the warning flag rises.
pub const DEFAULT_WARNING_LEAD_MINUTES: u32 = 2;

/// Advisory flags derived from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BudgetFlags {
    pub time_warning: bool,
    pub force_wrap_up: bool,
}

/// Time budget of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBudget {
    pub budget_minutes: u32,
    pub warning_lead_minutes: u32,
}

impl Default for TimeBudget {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET_MINUTES)
    }
}

impl TimeBudget {
    pub fn new(budget_minutes: u32) -> Self {
        Self {
            budget_minutes,
            warning_lead_minutes: DEFAULT_WARNING_LEAD_MINUTES,
        }
    }

    pub fn with_warning_lead(mut self, minutes: u32) -> Self {
        self.warning_lead_minutes = minutes;
        self
    }

    /// Flags for `elapsed_minutes`. Warning at `budget − lead`, wrap-up at `budget`.
    /// Nothing is raised before the clock has moved.
    pub fn assess(&self, elapsed_minutes: f64) -> BudgetFlags {
        let budget = self.budget_minutes as f64;
        let warn_at = budget - self.warning_lead_minutes.min(self.budget_minutes) as f64;
        BudgetFlags {
            time_warning: elapsed_minutes > 0.0 && elapsed_minutes >= warn_at,
            force_wrap_up: elapsed_minutes >= budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_is_twenty_minutes() {
        assert_eq!(TimeBudget::default().budget_minutes, 20);
        assert_eq!(TimeBudget::default().warning_lead_minutes, 2);
    }

    #[test]
    fn early_in_the_call_no_flags() {
        assert_eq!(TimeBudget::new(20).assess(5.0), BudgetFlags::default());
    }

    #[test]
    fn warning_rises_two_minutes_before_budget() {
        let flags = TimeBudget::new(20).assess(18.0);
        assert!(flags.time_warning);
        assert!(!flags.force_wrap_up);
    }

    #[test]
    fn wrap_up_at_budget() {
        let flags = TimeBudget::new(20).assess(20.1);
        assert!(flags.time_warning);
        assert!(flags.force_wrap_up);
    }

    #[test]
    fn lead_longer_than_budget_stays_quiet_at_start() {
        let budget = TimeBudget::new(1);
        assert_eq!(budget.assess(0.0), BudgetFlags::default());
        assert!(budget.assess(0.5).time_warning);
        assert!(budget.assess(1.0).force_wrap_up);
    }
}

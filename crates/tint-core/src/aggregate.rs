//! Aggregation of per-category periods into one overall status

use crate::models::BudgetPeriod;
use crate::status::{BudgetStatus, HealthStatus, StatusClassifier};

/// Description used when there is nothing to aggregate
pub const NO_BUDGETS_DESCRIPTION: &str =
    "No active budgets yet. Create a budget to start tracking your spending.";

impl StatusClassifier {
    /// Classify the summed spend of all periods against their summed budgets
    ///
    /// Only the totals matter: per-period `is_over_budget` flags are ignored
    /// and the result does not depend on ordering.
    pub fn aggregate(&self, periods: &[BudgetPeriod]) -> BudgetStatus {
        if periods.is_empty() {
            return BudgetStatus {
                description: NO_BUDGETS_DESCRIPTION.to_string(),
                ..BudgetStatus::new(HealthStatus::Good, 0.0)
            };
        }

        let (total_spent, total_budgeted) = periods.iter().fold((0.0, 0.0), |(s, b), p| {
            (s + p.spent_amount, b + p.budgeted_amount)
        });

        tracing::debug!(
            periods = periods.len(),
            total_spent,
            total_budgeted,
            "Aggregating budget periods"
        );

        self.classify(total_spent, total_budgeted)
    }
}

/// Aggregate with the default thresholds
pub fn aggregate_overall(periods: &[BudgetPeriod]) -> BudgetStatus {
    StatusClassifier::default().aggregate(periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::period;

    #[test]
    fn test_empty_is_good_with_no_budgets_message() {
        let result = aggregate_overall(&[]);
        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.status, HealthStatus::Good);
        assert!(result.description.contains("No active budgets"));
        assert_ne!(result.description, HealthStatus::Good.description());
    }

    #[test]
    fn test_sums_before_classifying() {
        let periods = vec![period("a", 500.0, 200.0), period("b", 300.0, 250.0)];
        let result = aggregate_overall(&periods);
        assert!((result.percentage - 56.25).abs() < 1e-9);
        assert_eq!(result.status, HealthStatus::Good);
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut periods = vec![
            period("a", 100.0, 90.0),
            period("b", 400.0, 10.0),
            period("c", 250.0, 300.0),
        ];
        let forward = aggregate_overall(&periods);
        periods.reverse();
        let backward = aggregate_overall(&periods);
        assert_eq!(forward.status, backward.status);
        assert!((forward.percentage - backward.percentage).abs() < 1e-9);
    }

    #[test]
    fn test_per_period_flags_are_ignored() {
        // One category blown, but totals are comfortably under budget
        let periods = vec![period("a", 100.0, 150.0), period("b", 1000.0, 100.0)];
        assert!(periods[0].is_over_budget);
        let result = aggregate_overall(&periods);
        assert_eq!(result.status, HealthStatus::Excellent);
    }

    #[test]
    fn test_all_zero_budgets_with_spend() {
        let periods = vec![period("a", 0.0, 10.0), period("b", 0.0, 0.0)];
        let result = aggregate_overall(&periods);
        assert!(result.percentage.is_infinite());
        assert_eq!(result.status, HealthStatus::OverBudget);
    }
}

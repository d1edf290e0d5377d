use chrono::{DateTime, Utc};
use shared::CategoryBreakdown;
use std::collections::BTreeMap;

/// Running totals for one member of one room
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub room_id: String,
    pub username: String,
    pub total_contributed: f64,
    pub total_expenses: f64,
    /// Denormalized share of the room total; only rewritten by an explicit recompute
    pub contribution_percentage: f64,
    pub last_updated: DateTime<Utc>,
    /// `YYYY-MM` -> amount
    pub monthly_contributions: BTreeMap<String, f64>,
    pub categories: CategoryBreakdown,
}

/// Month bucket key (`YYYY-MM`, UTC) for a contribution made at `at`
pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Each total as a percentage of the sum of all totals; all zero when the sum is zero
pub fn compute_percentages(totals: &[f64]) -> Vec<f64> {
    let room_total: f64 = totals.iter().sum();
    totals
        .iter()
        .map(|own| {
            if room_total > 0.0 {
                own / room_total * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_percentages_sum_to_hundred() {
        let percentages = compute_percentages(&[10.0, 30.0, 60.0]);
        assert_eq!(percentages, vec![10.0, 30.0, 60.0]);

        let uneven = compute_percentages(&[1.0, 1.0, 1.0]);
        let sum: f64 = uneven.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_zero_total() {
        assert_eq!(compute_percentages(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(compute_percentages(&[]).is_empty());
    }

    #[test]
    fn test_month_key() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(month_key(at), "2025-03");
    }
}

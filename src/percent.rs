// Percentage Deriver - each category as a fraction of total expenses
//
// Row-wise, Total row included. A zero-expense row yields missing
// ratios rather than NaN or infinity, and a missing amount stays missing.

use crate::aggregate::YearlySummary;
use serde::Serialize;

/// Percentage variant of a summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentSummary {
    pub tax_year: String,
    pub grants_pct: Option<f64>,
    pub contractor_pct: Option<f64>,
    pub total_compensation_pct: Option<f64>,
    pub compensation_filing_org_pct: Option<f64>,
}

/// amount / total_expenses, undefined when total_expenses is zero.
pub fn ratio(amount: Option<f64>, total_expenses: f64) -> Option<f64> {
    if total_expenses == 0.0 {
        return None;
    }
    amount.map(|a| a / total_expenses)
}

/// Derive the percentage table for a filer's summary rows.
pub fn percent_table(rows: &[YearlySummary]) -> Vec<PercentSummary> {
    rows.iter()
        .map(|row| PercentSummary {
            tax_year: row.tax_year.clone(),
            grants_pct: ratio(row.grants_given, row.total_expenses),
            contractor_pct: ratio(row.contractor_expenses, row.total_expenses),
            total_compensation_pct: ratio(row.total_compensation, row.total_expenses),
            compensation_filing_org_pct: ratio(row.compensation_filing_org, row.total_expenses),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{TOTAL_EIN, TOTAL_PERIOD};

    fn row(year: &str, expenses: f64, grants: Option<f64>) -> YearlySummary {
        YearlySummary {
            tax_year: year.to_string(),
            filing_ein: if year == TOTAL_PERIOD { TOTAL_EIN } else { 11 },
            filing_org: Some("ORG A".to_string()),
            total_expenses: expenses,
            grants_given: grants,
            contractor_expenses: None,
            total_compensation: None,
            compensation_filing_org: None,
        }
    }

    #[test]
    fn test_ratio_exact() {
        assert_eq!(ratio(Some(250.0), 1000.0), Some(0.25));
        assert_eq!(ratio(Some(0.0), 1000.0), Some(0.0));
    }

    #[test]
    fn test_zero_expenses_yields_missing_not_inf() {
        assert_eq!(ratio(Some(250.0), 0.0), None);
        assert_eq!(ratio(None, 0.0), None);
    }

    #[test]
    fn test_missing_amount_stays_missing() {
        assert_eq!(ratio(None, 1000.0), None);
    }

    #[test]
    fn test_percent_table_covers_total_row() {
        let rows = vec![
            row("2024-12-31", 1000.0, Some(400.0)),
            row(TOTAL_PERIOD, 1000.0, Some(400.0)),
        ];
        let pct = percent_table(&rows);
        assert_eq!(pct.len(), 2);
        assert_eq!(pct[1].tax_year, TOTAL_PERIOD);
        assert_eq!(pct[1].grants_pct, Some(0.4));
        assert_eq!(pct[0].contractor_pct, None);
    }

    #[test]
    fn test_no_nan_leaks_into_sums() {
        let rows = vec![row("2024-12-31", 0.0, Some(400.0))];
        let pct = percent_table(&rows);
        let sum: f64 = pct.iter().filter_map(|p| p.grants_pct).sum();
        assert!(sum.is_finite());
        assert_eq!(sum, 0.0);
    }
}

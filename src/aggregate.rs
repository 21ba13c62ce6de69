// 📊 Aggregator - per-year filer summaries plus a synthetic Total row
//
// Each relation is grouped by (tax_year, filing EIN) and summed, then the
// grant / contractor / compensation aggregates are left-merged onto the
// expense aggregate. A filer with no grants in a year keeps a missing
// grant figure for that year - missing is not the same as a confirmed
// zero. Total rows are computed from the per-year summaries (missing
// treated as zero there) so they always agree with the yearly breakdown.

use crate::records::Dataset;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sentinel EIN carried by Total rows; distinct from any real identifier.
pub const TOTAL_EIN: u64 = 999999999;

/// Sentinel tax period carried by Total rows.
pub const TOTAL_PERIOD: &str = "Total";

/// One row per (tax_year, filer), plus one Total row per filer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlySummary {
    pub tax_year: String,
    pub filing_ein: u64,
    pub filing_org: Option<String>,
    pub total_expenses: f64,
    pub grants_given: Option<f64>,
    pub contractor_expenses: Option<f64>,
    /// Leadership compensation, filing org plus related orgs.
    pub total_compensation: Option<f64>,
    /// Leadership compensation, filing org only.
    pub compensation_filing_org: Option<f64>,
}

impl YearlySummary {
    pub fn is_total(&self) -> bool {
        self.tax_year == TOTAL_PERIOD
    }
}

/// Group the four relations by (tax_year, filing EIN) and left-merge onto
/// the expense aggregate. Rows come out ordered by (tax_year, EIN).
pub fn yearly_summaries(data: &Dataset) -> Vec<YearlySummary> {
    let mut base: BTreeMap<(String, u64), YearlySummary> = BTreeMap::new();

    for r in &data.expenses {
        let entry = base
            .entry((r.tax_year.clone(), r.filing_ein))
            .or_insert_with(|| YearlySummary {
                tax_year: r.tax_year.clone(),
                filing_ein: r.filing_ein,
                filing_org: None,
                total_expenses: 0.0,
                grants_given: None,
                contractor_expenses: None,
                total_compensation: None,
                compensation_filing_org: None,
            });
        entry.total_expenses += r.tot_expenses;
        if entry.filing_org.is_none() {
            entry.filing_org = r.filing_org.clone();
        }
    }

    // Left merges: only (year, EIN) pairs already present on the expense
    // side pick up the other schedules.
    for r in &data.grants {
        if let Some(entry) = base.get_mut(&(r.tax_year.clone(), r.filing_ein)) {
            *entry.grants_given.get_or_insert(0.0) += r.grantee_cash_grant;
        }
    }

    for r in &data.contractors {
        if let Some(entry) = base.get_mut(&(r.tax_year.clone(), r.filing_ein)) {
            *entry.contractor_expenses.get_or_insert(0.0) += r.contractor_amt;
        }
    }

    for r in &data.compensation {
        if let Some(entry) = base.get_mut(&(r.tax_year.clone(), r.filing_ein)) {
            *entry.total_compensation.get_or_insert(0.0) += r.total_compensation;
            *entry.compensation_filing_org.get_or_insert(0.0) += r.total_compensation_filing_org;
        }
    }

    base.into_values().collect()
}

/// One Total row per filer, summed over the per-year summaries with
/// missing figures treated as zero. Ordered by the filer's real EIN even
/// though the emitted rows carry the sentinel.
pub fn filer_totals(yearly: &[YearlySummary]) -> Vec<YearlySummary> {
    let mut totals: BTreeMap<u64, YearlySummary> = BTreeMap::new();

    for row in yearly {
        let t = totals.entry(row.filing_ein).or_insert_with(|| YearlySummary {
            tax_year: TOTAL_PERIOD.to_string(),
            filing_ein: TOTAL_EIN,
            filing_org: None,
            total_expenses: 0.0,
            grants_given: Some(0.0),
            contractor_expenses: Some(0.0),
            total_compensation: Some(0.0),
            compensation_filing_org: Some(0.0),
        });

        t.total_expenses += row.total_expenses;
        *t.grants_given.get_or_insert(0.0) += row.grants_given.unwrap_or(0.0);
        *t.contractor_expenses.get_or_insert(0.0) += row.contractor_expenses.unwrap_or(0.0);
        *t.total_compensation.get_or_insert(0.0) += row.total_compensation.unwrap_or(0.0);
        *t.compensation_filing_org.get_or_insert(0.0) +=
            row.compensation_filing_org.unwrap_or(0.0);
        if t.filing_org.is_none() {
            t.filing_org = row.filing_org.clone();
        }
    }

    totals.into_values().collect()
}

/// The final wide relation: yearly rows followed by per-filer Total rows.
pub fn summary_table(data: &Dataset) -> Vec<YearlySummary> {
    let mut yearly = yearly_summaries(data);
    let totals = filer_totals(&yearly);
    yearly.extend(totals);
    yearly
}

/// Distinct canonical filer names in order of first appearance, for the
/// selection widget.
pub fn filer_names(summary: &[YearlySummary]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut names = Vec::new();
    for row in summary {
        if let Some(name) = &row.filing_org {
            if seen.insert(name.clone()) {
                names.push(name.clone());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CompensationRecord, ContractorRecord, ExpenseRecord, GrantRecord};

    fn fixture() -> Dataset {
        let mut ds = Dataset {
            expenses: vec![
                ExpenseRecord {
                    filing_ein: 11,
                    tax_year: "2023-12-31".into(),
                    filing_org: Some("ORG A".into()),
                    tot_expenses: 1000.0,
                },
                ExpenseRecord {
                    filing_ein: 11,
                    tax_year: "2024-12-31".into(),
                    filing_org: Some("ORG A".into()),
                    tot_expenses: 2000.0,
                },
                ExpenseRecord {
                    filing_ein: 22,
                    tax_year: "2024-12-31".into(),
                    filing_org: Some("ORG B".into()),
                    tot_expenses: 500.0,
                },
            ],
            grants: vec![
                GrantRecord {
                    filing_ein: 11,
                    tax_year: "2024-12-31".into(),
                    filing_org: Some("ORG A".into()),
                    grantee_ein: Some(22),
                    grantee_business_name: Some("ORG B".into()),
                    grantee_cash_grant: 300.0,
                },
                GrantRecord {
                    filing_ein: 11,
                    tax_year: "2024-12-31".into(),
                    filing_org: Some("ORG A".into()),
                    grantee_ein: Some(33),
                    grantee_business_name: Some("ORG C".into()),
                    grantee_cash_grant: 200.0,
                },
            ],
            contractors: vec![ContractorRecord {
                filing_ein: 11,
                tax_year: "2023-12-31".into(),
                filing_org: Some("ORG A".into()),
                contractor_name: "ACME".into(),
                contractor_amt: 150.0,
            }],
            compensation: vec![CompensationRecord {
                filing_ein: 11,
                tax_year: "2024-12-31".into(),
                filing_org: Some("ORG A".into()),
                compensation_name: "JANE DOE".into(),
                compensation_title: "CEO".into(),
                total_compensation: 400.0,
                total_compensation_filing_org: 350.0,
            }],
        };
        ds.resolve_identities();
        ds
    }

    fn find<'a>(rows: &'a [YearlySummary], year: &str, ein: u64) -> &'a YearlySummary {
        rows.iter()
            .find(|r| r.tax_year == year && r.filing_ein == ein)
            .unwrap()
    }

    #[test]
    fn test_grouped_sums_per_year() {
        let yearly = yearly_summaries(&fixture());
        assert_eq!(yearly.len(), 3);

        let y24 = find(&yearly, "2024-12-31", 11);
        assert_eq!(y24.total_expenses, 2000.0);
        assert_eq!(y24.grants_given, Some(500.0));
        assert_eq!(y24.total_compensation, Some(400.0));
        assert_eq!(y24.compensation_filing_org, Some(350.0));
    }

    #[test]
    fn test_left_merge_keeps_missing_not_zero() {
        let yearly = yearly_summaries(&fixture());

        // ORG A filed no grants in 2023 and no contractors in 2024
        let y23 = find(&yearly, "2023-12-31", 11);
        assert_eq!(y23.grants_given, None);
        assert_eq!(y23.contractor_expenses, Some(150.0));

        let y24 = find(&yearly, "2024-12-31", 11);
        assert_eq!(y24.contractor_expenses, None);

        // ORG B never appears in the other schedules at all
        let b = find(&yearly, "2024-12-31", 22);
        assert_eq!(b.grants_given, None);
        assert_eq!(b.contractor_expenses, None);
        assert_eq!(b.total_compensation, None);
    }

    #[test]
    fn test_total_row_sums_years_and_coerces_missing_to_zero() {
        let summary = summary_table(&fixture());
        let total_a = summary
            .iter()
            .find(|r| r.is_total() && r.filing_org.as_deref() == Some("ORG A"))
            .unwrap();

        assert_eq!(total_a.filing_ein, TOTAL_EIN);
        assert_eq!(total_a.total_expenses, 3000.0);
        assert_eq!(total_a.grants_given, Some(500.0));
        assert_eq!(total_a.contractor_expenses, Some(150.0));

        // ORG B has no rows in any other schedule: true summed zero
        let total_b = summary
            .iter()
            .find(|r| r.is_total() && r.filing_org.as_deref() == Some("ORG B"))
            .unwrap();
        assert_eq!(total_b.grants_given, Some(0.0));
        assert_eq!(total_b.contractor_expenses, Some(0.0));
    }

    #[test]
    fn test_total_row_reproduces_lifetime_expenses() {
        let summary = summary_table(&fixture());
        for name in ["ORG A", "ORG B"] {
            let yearly_sum: f64 = summary
                .iter()
                .filter(|r| !r.is_total() && r.filing_org.as_deref() == Some(name))
                .map(|r| r.total_expenses)
                .sum();
            let total = summary
                .iter()
                .find(|r| r.is_total() && r.filing_org.as_deref() == Some(name))
                .unwrap();
            assert_eq!(yearly_sum, total.total_expenses, "filer {name}");
        }
    }

    #[test]
    fn test_totals_appended_after_yearly_rows() {
        let summary = summary_table(&fixture());
        let first_total = summary.iter().position(|r| r.is_total()).unwrap();
        assert!(summary[first_total..].iter().all(|r| r.is_total()));
        assert!(summary[..first_total].iter().all(|r| !r.is_total()));
    }

    #[test]
    fn test_filer_names_in_first_appearance_order() {
        let summary = summary_table(&fixture());
        let names = filer_names(&summary);
        assert_eq!(names, vec!["ORG A".to_string(), "ORG B".to_string()]);
    }
}

// 📈 Presentation Adapter - chart-ready tables for one selected filer
//
// Everything here is plain data: ranked vectors, by-year vectors, and a
// couple of scalars. The rendering shells (TUI, plain-text report, JSON
// export) consume these tables and own all display formatting.

use crate::aggregate::YearlySummary;
use crate::percent::{self, PercentSummary};
use crate::records::{CompensationRecord, Dataset};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Bar-chart views truncate to this many entries.
pub const TOP_N: usize = 10;

/// One bar / pie slice: a counterparty or category with a dollar amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub amount: f64,
}

/// One row of a by-year breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearEntry {
    pub tax_year: String,
    pub name: String,
    pub amount: f64,
}

/// One slice of the Total-row expense share pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub share: Option<f64>,
}

/// One row of the compensation tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompensationEntry {
    pub tax_year: String,
    pub name: String,
    pub title: String,
    pub total_compensation: f64,
    pub compensation_filing_org: f64,
}

/// Everything the rendering shells need for one selected filer.
#[derive(Debug, Clone, Serialize)]
pub struct FilerReport {
    pub filing_org: String,
    /// (first, last) calendar year among non-Total rows, e.g. ("2013", "2024").
    pub year_range: Option<(String, String)>,

    /// Yearly summary rows for this filer, Total row last.
    pub yearly: Vec<YearlySummary>,
    /// Percentage variant of `yearly`, same row order.
    pub percentages: Vec<PercentSummary>,

    /// Expense categories summed across all real years, descending.
    pub category_breakdown: Vec<RankedEntry>,
    /// Total-row expense shares plus the untracked remainder ("Other").
    pub category_shares: Vec<CategoryShare>,

    /// Lifetime grants awarded by this filer.
    pub grants_aggregate: f64,
    /// Aggregate divided by the year span; undefined for a single year.
    pub grants_yearly_average: Option<f64>,
    /// Full by-grantee distribution, descending by amount.
    pub grants_by_grantee: Vec<RankedEntry>,
    pub grants_by_year: Vec<YearEntry>,

    /// Full by-contractor distribution, descending by amount.
    pub contractors_by_name: Vec<RankedEntry>,
    pub contractors_by_year: Vec<YearEntry>,

    /// Ranked compensation for the filer's most recent tax year.
    pub compensation_latest: Vec<CompensationEntry>,
    /// One row per (tax_year, person), ascending by year.
    pub compensation_by_year: Vec<CompensationEntry>,
}

impl FilerReport {
    pub fn build(data: &Dataset, summary: &[YearlySummary], filing_org: &str) -> FilerReport {
        let yearly: Vec<YearlySummary> = summary
            .iter()
            .filter(|r| r.filing_org.as_deref() == Some(filing_org))
            .cloned()
            .collect();
        let percentages = percent::percent_table(&yearly);
        let year_range = year_range(&yearly);

        let category_breakdown = category_breakdown(&yearly);
        let category_shares = category_shares(&yearly, &percentages);

        // Schedule I
        let filer_grants: Vec<_> = data
            .grants
            .iter()
            .filter(|g| g.filing_org.as_deref() == Some(filing_org))
            .collect();
        let grants_aggregate: f64 = filer_grants.iter().map(|g| g.grantee_cash_grant).sum();
        let grants_yearly_average = yearly_average(grants_aggregate, &year_range);
        let grants_by_grantee = ranked(
            filer_grants
                .iter()
                .filter_map(|g| Some((g.grantee_business_name.as_deref()?, g.grantee_cash_grant))),
        );
        let grants_by_year = by_year(
            filer_grants
                .iter()
                .filter_map(|g| {
                    Some((
                        g.tax_year.as_str(),
                        g.grantee_business_name.as_deref()?,
                        g.grantee_cash_grant,
                    ))
                }),
        );

        // Part VII-B
        let filer_contractors: Vec<_> = data
            .contractors
            .iter()
            .filter(|c| c.filing_org.as_deref() == Some(filing_org))
            .collect();
        let contractors_by_name = ranked(
            filer_contractors
                .iter()
                .map(|c| (c.contractor_name.as_str(), c.contractor_amt)),
        );
        let contractors_by_year = by_year(filer_contractors.iter().map(|c| {
            (
                c.tax_year.as_str(),
                c.contractor_name.as_str(),
                c.contractor_amt,
            )
        }));

        // Schedule J
        let filer_compensation: Vec<&CompensationRecord> = data
            .compensation
            .iter()
            .filter(|c| c.filing_org.as_deref() == Some(filing_org))
            .collect();
        let compensation_latest = compensation_latest(&filer_compensation);
        let compensation_by_year = compensation_by_year(&filer_compensation);

        FilerReport {
            filing_org: filing_org.to_string(),
            year_range,
            yearly,
            percentages,
            category_breakdown,
            category_shares,
            grants_aggregate,
            grants_yearly_average,
            grants_by_grantee,
            grants_by_year,
            contractors_by_name,
            contractors_by_year,
            compensation_latest,
            compensation_by_year,
        }
    }

    /// Top-10 view of the by-grantee distribution. Degrades gracefully
    /// below ten entries.
    pub fn top_grantees(&self) -> &[RankedEntry] {
        top_view(&self.grants_by_grantee)
    }

    pub fn top_contractors(&self) -> &[RankedEntry] {
        top_view(&self.contractors_by_name)
    }

    pub fn top_categories(&self) -> &[RankedEntry] {
        top_view(&self.category_breakdown)
    }
}

fn top_view(entries: &[RankedEntry]) -> &[RankedEntry] {
    &entries[..entries.len().min(TOP_N)]
}

/// Calendar year component of a tax period end date ("2024-12-31" → "2024").
pub fn year_component(tax_year: &str) -> String {
    match NaiveDate::parse_from_str(tax_year, "%Y-%m-%d") {
        Ok(date) => date.year().to_string(),
        Err(_) => tax_year.chars().take(4).collect(),
    }
}

fn year_range(yearly: &[YearlySummary]) -> Option<(String, String)> {
    let periods: Vec<&str> = yearly
        .iter()
        .filter(|r| !r.is_total())
        .map(|r| r.tax_year.as_str())
        .collect();
    let first = periods.iter().min().copied()?;
    let last = periods.iter().max().copied()?;
    Some((year_component(first), year_component(last)))
}

/// Lifetime aggregate divided by the year span, matching the headline
/// scalar of the grants schedule. Undefined when the range collapses to
/// a single year (division by zero).
fn yearly_average(aggregate: f64, year_range: &Option<(String, String)>) -> Option<f64> {
    let (first, last) = year_range.as_ref()?;
    let span = last.parse::<i64>().ok()? - first.parse::<i64>().ok()?;
    if span == 0 {
        return None;
    }
    Some(aggregate / span as f64)
}

/// Sum amounts per name and sort descending. Ties keep first-appearance
/// order (the sort is stable over insertion order).
fn ranked<'a>(pairs: impl Iterator<Item = (&'a str, f64)>) -> Vec<RankedEntry> {
    let mut sums: Vec<RankedEntry> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    for (name, amount) in pairs {
        match index.get(name) {
            Some(&i) => sums[i].amount += amount,
            None => {
                index.insert(name.to_string(), sums.len());
                sums.push(RankedEntry {
                    name: name.to_string(),
                    amount,
                });
            }
        }
    }

    sums.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));
    sums
}

/// Sum amounts per (tax_year, name), ordered by year then name.
fn by_year<'a>(triples: impl Iterator<Item = (&'a str, &'a str, f64)>) -> Vec<YearEntry> {
    let mut sums: BTreeMap<(String, String), f64> = BTreeMap::new();
    for (year, name, amount) in triples {
        *sums.entry((year.to_string(), name.to_string())).or_insert(0.0) += amount;
    }
    sums.into_iter()
        .map(|((tax_year, name), amount)| YearEntry {
            tax_year,
            name,
            amount,
        })
        .collect()
}

/// Expense categories summed across all real years, descending.
fn category_breakdown(yearly: &[YearlySummary]) -> Vec<RankedEntry> {
    let real: Vec<&YearlySummary> = yearly.iter().filter(|r| !r.is_total()).collect();

    let sum_opt = |f: &dyn Fn(&YearlySummary) -> Option<f64>| -> f64 {
        real.iter().filter_map(|&r| f(r)).sum()
    };

    let mut entries = vec![
        RankedEntry {
            name: "Total Expenses".to_string(),
            amount: real.iter().map(|r| r.total_expenses).sum(),
        },
        RankedEntry {
            name: "Grants Given".to_string(),
            amount: sum_opt(&|r| r.grants_given),
        },
        RankedEntry {
            name: "Independent Contractor Expenses".to_string(),
            amount: sum_opt(&|r| r.contractor_expenses),
        },
        RankedEntry {
            name: "Compensation For Leadership (Filing Org)".to_string(),
            amount: sum_opt(&|r| r.compensation_filing_org),
        },
    ];

    entries.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));
    entries
}

/// Total-row expense shares for the pie view. "Other" is the untracked
/// remainder of total expenses, clamped at zero. All shares are missing
/// when the Total row has zero expenses.
fn category_shares(yearly: &[YearlySummary], percentages: &[PercentSummary]) -> Vec<CategoryShare> {
    let total_pct = yearly
        .iter()
        .zip(percentages)
        .find(|(row, _)| row.is_total())
        .map(|(_, pct)| pct);

    let (grants, contractor, comp) = match total_pct {
        Some(p) => (p.grants_pct, p.contractor_pct, p.compensation_filing_org_pct),
        None => (None, None, None),
    };

    let tracked = grants.unwrap_or(0.0) + contractor.unwrap_or(0.0) + comp.unwrap_or(0.0);
    let other = if grants.is_none() && contractor.is_none() && comp.is_none() {
        None
    } else {
        Some((1.0 - tracked).max(0.0))
    };

    vec![
        CategoryShare {
            category: "Grants Given".to_string(),
            share: grants,
        },
        CategoryShare {
            category: "Independent Contractor Expenses".to_string(),
            share: contractor,
        },
        CategoryShare {
            category: "Compensation For Leadership (Filing Org)".to_string(),
            share: comp,
        },
        CategoryShare {
            category: "Other".to_string(),
            share: other,
        },
    ]
}

/// Ranked compensation for the filer's most recent tax year, one row per
/// person (the source schedules repeat people across related filings).
fn compensation_latest(rows: &[&CompensationRecord]) -> Vec<CompensationEntry> {
    let Some(latest) = rows.iter().map(|r| r.tax_year.as_str()).max() else {
        return Vec::new();
    };
    let latest = latest.to_string();

    let mut seen = HashSet::new();
    let mut entries: Vec<CompensationEntry> = rows
        .iter()
        .filter(|r| r.tax_year == latest)
        .filter(|r| seen.insert(r.compensation_name.clone()))
        .map(|r| CompensationEntry {
            tax_year: r.tax_year.clone(),
            name: r.compensation_name.clone(),
            title: r.compensation_title.clone(),
            total_compensation: r.total_compensation,
            compensation_filing_org: r.total_compensation_filing_org,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_compensation
            .partial_cmp(&a.total_compensation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries
}

/// One row per (tax_year, person), ascending by year, natural order
/// within a year.
fn compensation_by_year(rows: &[&CompensationRecord]) -> Vec<CompensationEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<CompensationEntry> = rows
        .iter()
        .filter(|r| seen.insert((r.tax_year.clone(), r.compensation_name.clone())))
        .map(|r| CompensationEntry {
            tax_year: r.tax_year.clone(),
            name: r.compensation_name.clone(),
            title: r.compensation_title.clone(),
            total_compensation: r.total_compensation,
            compensation_filing_org: r.total_compensation_filing_org,
        })
        .collect();

    entries.sort_by(|a, b| a.tax_year.cmp(&b.tax_year));
    entries
}

/// Grants awarded across the whole network for one tax period - the
/// headline scalar shown before a filer is selected.
pub fn network_grant_total(data: &Dataset, tax_year: &str) -> f64 {
    data.grants
        .iter()
        .filter(|g| g.tax_year == tax_year)
        .map(|g| g.grantee_cash_grant)
        .sum()
}

/// Most recent tax period present in the grants schedule.
pub fn latest_grant_year(data: &Dataset) -> Option<String> {
    data.grants
        .iter()
        .map(|g| g.tax_year.clone())
        .max()
}

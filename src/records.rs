// 📋 Source Records - the four Form 990 relations
//
// One struct per input file, field names matching the CSV headers so the
// csv crate deserializes rows directly. Names are Option<String> because
// a handful of filings carry no organization name (resolved later by the
// identity module); grantee EINs can be absent entirely.

use serde::{Deserialize, Serialize};

/// One row of `total_expenses.csv` - aggregate expenses per filing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExpenseRecord {
    pub filing_ein: u64,
    /// Tax period end date, e.g. "2024-12-31".
    pub tax_year: String,
    pub filing_org: Option<String>,
    pub tot_expenses: f64,
}

/// One row of `schedule_i.csv` - a grant awarded to another organization.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrantRecord {
    pub filing_ein: u64,
    pub tax_year: String,
    pub filing_org: Option<String>,
    pub grantee_ein: Option<u64>,
    pub grantee_business_name: Option<String>,
    pub grantee_cash_grant: f64,
}

/// One row of `part_vii_b.csv` - an independent contractor payment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractorRecord {
    pub filing_ein: u64,
    pub tax_year: String,
    pub filing_org: Option<String>,
    pub contractor_name: String,
    pub contractor_amt: f64,
}

/// One row of `schedule_j.csv` - compensation for an officer, director,
/// trustee, key employee, or highest compensated employee.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompensationRecord {
    pub filing_ein: u64,
    pub tax_year: String,
    pub filing_org: Option<String>,
    pub compensation_name: String,
    pub compensation_title: String,
    /// Compensation from the filing org plus related organizations.
    pub total_compensation: f64,
    /// Compensation from the filing org alone.
    pub total_compensation_filing_org: f64,
}

/// The four loaded relations. An immutable snapshot once identity
/// resolution has run; everything downstream is derived from it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub expenses: Vec<ExpenseRecord>,
    pub grants: Vec<GrantRecord>,
    pub contractors: Vec<ContractorRecord>,
    pub compensation: Vec<CompensationRecord>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.expenses.len() + self.grants.len() + self.contractors.len() + self.compensation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

// Form 990 Explorer - Core Library
// Data pipeline over four IRS Form 990 extracts: loading, identity
// resolution, yearly aggregation, percentage derivation, and the
// per-filer report tables the rendering shells consume.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod identity;
pub mod loader;
pub mod percent;
pub mod records;
pub mod render;
pub mod report;

// Re-export commonly used types
pub use aggregate::{
    filer_names, filer_totals, summary_table, yearly_summaries, YearlySummary, TOTAL_EIN,
    TOTAL_PERIOD,
};
pub use cache::DatasetCache;
pub use error::PipelineError;
pub use identity::{apply_canonical_names, canonical_name_map, resolve_names, NAME_OVERRIDES};
pub use loader::{load_dataset, SourcePaths};
pub use percent::{percent_table, ratio, PercentSummary};
pub use records::{CompensationRecord, ContractorRecord, Dataset, ExpenseRecord, GrantRecord};
pub use report::{
    latest_grant_year, network_grant_total, year_component, CategoryShare, CompensationEntry,
    FilerReport, RankedEntry, YearEntry, TOP_N,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The filer the explorer opens on when present in the data.
pub const DEFAULT_FILER: &str = "ILLINOIS POLICY INSTITUTE";

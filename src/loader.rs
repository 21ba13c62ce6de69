// 📂 Loader - four CSV files → four in-memory relations
//
// All-or-nothing: if any file is missing or any row fails to parse, the
// whole load fails with one descriptive error. There is no partial mode.

use crate::error::PipelineError;
use crate::records::{CompensationRecord, ContractorRecord, Dataset, ExpenseRecord, GrantRecord};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Fixed source file names, as produced by the 990 scrape.
pub const EXPENSES_FILE: &str = "total_expenses.csv";
pub const SCHEDULE_I_FILE: &str = "schedule_i.csv";
pub const PART_VII_B_FILE: &str = "part_vii_b.csv";
pub const SCHEDULE_J_FILE: &str = "schedule_j.csv";

/// Locations of the four source files.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub expenses: PathBuf,
    pub schedule_i: PathBuf,
    pub part_vii_b: PathBuf,
    pub schedule_j: PathBuf,
}

impl SourcePaths {
    /// All four files under one data directory, with the fixed names.
    pub fn in_dir(dir: &Path) -> Self {
        SourcePaths {
            expenses: dir.join(EXPENSES_FILE),
            schedule_i: dir.join(SCHEDULE_I_FILE),
            part_vii_b: dir.join(PART_VII_B_FILE),
            schedule_j: dir.join(SCHEDULE_J_FILE),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            &self.expenses,
            &self.schedule_i,
            &self.part_vii_b,
            &self.schedule_j,
        ]
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let record: T = result.map_err(|source| PipelineError::MalformedData {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Load the four relations. The returned dataset still carries raw
/// organization names; callers run identity resolution before using it.
pub fn load_dataset(paths: &SourcePaths) -> Result<Dataset, PipelineError> {
    let expenses: Vec<ExpenseRecord> = read_records(&paths.expenses)?;
    let grants: Vec<GrantRecord> = read_records(&paths.schedule_i)?;
    let contractors: Vec<ContractorRecord> = read_records(&paths.part_vii_b)?;
    let compensation: Vec<CompensationRecord> = read_records(&paths.schedule_j)?;

    Ok(Dataset {
        expenses,
        grants,
        contractors,
        compensation,
    })
}

// 🪪 Identity Resolver - one canonical display name per EIN
//
// A filer appears across thousands of rows with inconsistent (or absent)
// organization names. Per relation we pick the first non-missing name
// observed for each EIN, apply the fixed override table, uppercase the
// result, and write it back onto every row carrying that EIN.

use crate::records::Dataset;
use std::collections::HashMap;

/// Filings known to carry no organization name anywhere in the source
/// data. The override always wins, even when a raw name was observed.
pub const NAME_OVERRIDES: &[(u64, &str)] = &[
    (133859811, "THE COMMON GOOD INSTITUTE INC"),
    (221539721, "THE SEEING EYE INC"),
    (391134735, "MILWAUKEE BALLET COMPANY INC"),
];

/// Build the identifier → canonical name map for one relation.
///
/// First non-missing name per identifier wins, in natural row order.
/// Overrides are applied last and unconditionally. Names come out
/// uppercase. Identifiers with no name and no override get no entry.
pub fn canonical_name_map<T>(
    rows: &[T],
    id_of: impl Fn(&T) -> Option<u64>,
    name_of: impl Fn(&T) -> Option<&str>,
    overrides: &[(u64, &str)],
) -> HashMap<u64, String> {
    let mut map: HashMap<u64, String> = HashMap::new();

    for row in rows {
        let Some(id) = id_of(row) else { continue };
        if map.contains_key(&id) {
            continue;
        }
        if let Some(name) = name_of(row) {
            map.insert(id, name.to_uppercase());
        }
    }

    for (id, name) in overrides {
        map.insert(*id, name.to_uppercase());
    }

    map
}

/// Overwrite the name column on every row from the canonical map.
/// Rows whose identifier has no entry end up with a missing name.
pub fn apply_canonical_names<T>(
    rows: &mut [T],
    id_of: impl Fn(&T) -> Option<u64>,
    set_name: impl Fn(&mut T, Option<String>),
    map: &HashMap<u64, String>,
) {
    for row in rows {
        let name = id_of(row).and_then(|id| map.get(&id).cloned());
        set_name(row, name);
    }
}

/// Resolve one (relation, id column, name column) triple end to end.
pub fn resolve_names<T>(
    rows: &mut [T],
    id_of: impl Fn(&T) -> Option<u64> + Copy,
    name_of: impl Fn(&T) -> Option<&str>,
    set_name: impl Fn(&mut T, Option<String>),
) {
    let map = canonical_name_map(rows, id_of, name_of, NAME_OVERRIDES);
    apply_canonical_names(rows, id_of, set_name, &map);
}

impl Dataset {
    /// Run the five resolutions: filing org name on each of the four
    /// relations, plus grantee business name within the grants relation.
    pub fn resolve_identities(&mut self) {
        resolve_names(
            &mut self.expenses,
            |r| Some(r.filing_ein),
            |r| r.filing_org.as_deref(),
            |r, n| r.filing_org = n,
        );
        resolve_names(
            &mut self.grants,
            |r| Some(r.filing_ein),
            |r| r.filing_org.as_deref(),
            |r, n| r.filing_org = n,
        );
        resolve_names(
            &mut self.grants,
            |r| r.grantee_ein,
            |r| r.grantee_business_name.as_deref(),
            |r, n| r.grantee_business_name = n,
        );
        resolve_names(
            &mut self.contractors,
            |r| Some(r.filing_ein),
            |r| r.filing_org.as_deref(),
            |r, n| r.filing_org = n,
        );
        resolve_names(
            &mut self.compensation,
            |r| Some(r.filing_ein),
            |r| r.filing_org.as_deref(),
            |r, n| r.filing_org = n,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ExpenseRecord, GrantRecord};

    fn expense(ein: u64, year: &str, org: Option<&str>) -> ExpenseRecord {
        ExpenseRecord {
            filing_ein: ein,
            tax_year: year.to_string(),
            filing_org: org.map(String::from),
            tot_expenses: 0.0,
        }
    }

    #[test]
    fn test_first_observed_name_wins() {
        let rows = vec![
            expense(11, "2023-12-31", Some("First Name Inc")),
            expense(11, "2024-12-31", Some("Second Name Inc")),
        ];
        let map = canonical_name_map(&rows, |r| Some(r.filing_ein), |r| r.filing_org.as_deref(), &[]);
        assert_eq!(map.get(&11).map(String::as_str), Some("FIRST NAME INC"));
    }

    #[test]
    fn test_missing_names_are_skipped_until_one_appears() {
        let rows = vec![
            expense(11, "2022-12-31", None),
            expense(11, "2023-12-31", Some("Late Name")),
        ];
        let map = canonical_name_map(&rows, |r| Some(r.filing_ein), |r| r.filing_org.as_deref(), &[]);
        assert_eq!(map.get(&11).map(String::as_str), Some("LATE NAME"));
    }

    #[test]
    fn test_override_beats_observed_name() {
        let rows = vec![expense(133859811, "2024-12-31", Some("Wrong Name"))];
        let map = canonical_name_map(
            &rows,
            |r| Some(r.filing_ein),
            |r| r.filing_org.as_deref(),
            NAME_OVERRIDES,
        );
        assert_eq!(
            map.get(&133859811).map(String::as_str),
            Some("THE COMMON GOOD INSTITUTE INC")
        );
    }

    #[test]
    fn test_all_three_overrides_resolve() {
        let rows: Vec<ExpenseRecord> = vec![];
        let map = canonical_name_map(
            &rows,
            |r: &ExpenseRecord| Some(r.filing_ein),
            |r| r.filing_org.as_deref(),
            NAME_OVERRIDES,
        );
        assert_eq!(
            map.get(&133859811).map(String::as_str),
            Some("THE COMMON GOOD INSTITUTE INC")
        );
        assert_eq!(map.get(&221539721).map(String::as_str), Some("THE SEEING EYE INC"));
        assert_eq!(
            map.get(&391134735).map(String::as_str),
            Some("MILWAUKEE BALLET COMPANY INC")
        );
    }

    #[test]
    fn test_names_are_uppercased() {
        let rows = vec![expense(42, "2024-12-31", Some("lower case institute"))];
        let map = canonical_name_map(&rows, |r| Some(r.filing_ein), |r| r.filing_org.as_deref(), &[]);
        assert_eq!(map.get(&42).map(String::as_str), Some("LOWER CASE INSTITUTE"));
    }

    #[test]
    fn test_apply_writes_back_onto_every_row() {
        let mut rows = vec![
            expense(42, "2023-12-31", Some("Some Org")),
            expense(42, "2024-12-31", None),
            expense(99, "2024-12-31", None), // no name, no override
        ];
        resolve_names(
            &mut rows,
            |r| Some(r.filing_ein),
            |r| r.filing_org.as_deref(),
            |r, n| r.filing_org = n,
        );

        assert_eq!(rows[0].filing_org.as_deref(), Some("SOME ORG"));
        assert_eq!(rows[1].filing_org.as_deref(), Some("SOME ORG"));
        // Unresolved identity propagates as a missing display name
        assert!(rows[2].filing_org.is_none());
    }

    #[test]
    fn test_grantee_resolution_is_independent_of_filer_resolution() {
        let mut ds = Dataset {
            grants: vec![GrantRecord {
                filing_ein: 366304585,
                tax_year: "2024-12-31".to_string(),
                filing_org: Some("Illinois Policy Institute".to_string()),
                grantee_ein: Some(133859811),
                grantee_business_name: None,
                grantee_cash_grant: 250000.0,
            }],
            ..Dataset::default()
        };
        ds.resolve_identities();

        let g = &ds.grants[0];
        assert_eq!(g.filing_org.as_deref(), Some("ILLINOIS POLICY INSTITUTE"));
        assert_eq!(
            g.grantee_business_name.as_deref(),
            Some("THE COMMON GOOD INSTITUTE INC")
        );
    }
}

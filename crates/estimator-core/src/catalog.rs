//! Merging organisation-wide resource libraries into a project's own list.

use crate::resource::{CatalogItem, Machine, SubcontractService, TechnicianType};
use std::collections::{HashMap, HashSet};

/// Anything with a stable identifier that survives catalogue edits.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Machine {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for TechnicianType {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for CatalogItem {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for SubcontractService {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Merge an organisation catalogue with project-level entries.
///
/// Catalogue order is kept; a project entry sharing a key replaces the
/// catalogue entry in place, and project-only entries follow in their own
/// order. If the project lists a key twice the last entry wins.
pub fn merge_by_key<T>(org_catalog: &[T], project_overrides: &[T]) -> Vec<T>
where
    T: Keyed + Clone,
{
    let mut overrides: HashMap<&str, &T> = HashMap::with_capacity(project_overrides.len());
    for item in project_overrides {
        overrides.insert(item.key(), item);
    }

    let mut merged = Vec::with_capacity(org_catalog.len() + project_overrides.len());
    let mut emitted: HashSet<&str> = HashSet::new();
    for item in org_catalog {
        if !emitted.insert(item.key()) {
            continue;
        }
        match overrides.get(item.key()) {
            Some(project_item) => merged.push((*project_item).clone()),
            None => merged.push(item.clone()),
        }
    }
    for item in project_overrides {
        if emitted.insert(item.key()) {
            if let Some(latest) = overrides.get(item.key()) {
                merged.push((*latest).clone());
            }
        }
    }

    tracing::debug!(
        catalog = org_catalog.len(),
        project = project_overrides.len(),
        merged = merged.len(),
        "merged resource catalogue"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_entries_override_in_place_and_append() {
        let org = vec![
            TechnicianType::new("hvac", "hvac", 2000.0, 4.0),
            TechnicianType::new("elec", "electrical", 1800.0, 6.0),
        ];
        let project = vec![
            TechnicianType::new("plumb", "plumbing", 1700.0, 5.0),
            TechnicianType::new("hvac", "hvac", 2400.0, 4.0),
        ];

        let merged = merge_by_key(&org, &project);
        let ids: Vec<&str> = merged.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["hvac", "elec", "plumb"]);
        assert_eq!(merged[0].monthly_salary, 2400.0);
    }

    #[test]
    fn duplicate_project_keys_keep_last() {
        let org: Vec<CatalogItem> = Vec::new();
        let project = vec![
            CatalogItem::new("filter", 10.0, 4.0),
            CatalogItem::new("filter", 12.0, 4.0),
        ];
        let merged = merge_by_key(&org, &project);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].unit_rate, 12.0);
    }
}

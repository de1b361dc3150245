//! Duplicate record detection on a set of key columns

use std::collections::HashMap;

use crate::core::model::{AttributeValue, GeoRecord};

/// Records sharing one key value
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    /// Values of the selected columns, in selection order
    pub key: Vec<AttributeValue>,
    /// Record positions in the source collection, ascending
    pub indices: Vec<usize>,
}

/// Group records by the values of `columns` and keep the groups that occur
/// more than once
///
/// # Arguments
/// * `records` - Loaded records, in file order
/// * `columns` - Key columns; each must exist in the schema
///
/// # Returns
/// Duplicate groups ordered by the position of their first record
pub fn find_duplicate_groups(
    records: &[GeoRecord],
    columns: &[String],
) -> Vec<DuplicateGroup> {
    let mut slot_of: HashMap<Vec<AttributeValue>, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let key = record.key(columns);
        match slot_of.get(&key) {
            Some(&slot) => groups[slot].indices.push(index),
            None => {
                slot_of.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    indices: vec![index],
                });
            }
        }
    }

    groups.retain(|g| g.indices.len() > 1);
    groups
}

/// Positions of every record in a duplicate group, in original order
///
/// Every occurrence is kept, not only the second and later ones.
pub fn duplicate_indices(groups: &[DuplicateGroup]) -> Vec<usize> {
    let mut indices: Vec<usize> = groups.iter().flat_map(|g| g.indices.iter().copied()).collect();
    indices.sort_unstable();
    indices
}

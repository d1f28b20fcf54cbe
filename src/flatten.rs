//! Flattening of expandable record trees into windowable row sequences.
//!
//! A record's children are emitted right after it (depth-first pre-order) only
//! when its key is in the expanded set. Collapsed subtrees are absent from the
//! output entirely, so the result can be indexed directly by a windowed list.

use crate::types::{ExpandedKeys, FlatRow, Record, RowKey};

/// Flatten `records` into the visible row sequence.
///
/// `key_of` receives each record and its position in the flattened output.
/// Keys are only derived when at least one key is expanded.
pub fn flatten<'a, R, F>(
    records: &'a [R],
    children_key: &str,
    expanded_keys: &ExpandedKeys,
    key_of: F,
) -> Vec<FlatRow<'a, R>>
where
    R: Record,
    F: Fn(&R, usize) -> RowKey,
{
    if expanded_keys.is_empty() {
        return records
            .iter()
            .enumerate()
            .map(|(index, record)| FlatRow {
                record,
                indent: 0,
                index,
            })
            .collect();
    }

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        fill_rows(&mut rows, record, 0, children_key, expanded_keys, &key_of);
    }
    rows
}

fn fill_rows<'a, R, F>(
    rows: &mut Vec<FlatRow<'a, R>>,
    record: &'a R,
    indent: u32,
    children_key: &str,
    expanded_keys: &ExpandedKeys,
    key_of: &F,
) where
    R: Record,
    F: Fn(&R, usize) -> RowKey,
{
    let index = rows.len();
    rows.push(FlatRow {
        record,
        indent,
        index,
    });

    let Some(children) = record.children(children_key) else {
        return;
    };
    if children.is_empty() || !expanded_keys.contains(&key_of(record, index)) {
        return;
    }
    for child in children {
        fill_rows(
            rows,
            child,
            indent + 1,
            children_key,
            expanded_keys,
            key_of,
        );
    }
}

/// Number of rows [`flatten`] would produce, without building them.
pub fn count_reachable<R, F>(
    records: &[R],
    children_key: &str,
    expanded_keys: &ExpandedKeys,
    key_of: F,
) -> usize
where
    R: Record,
    F: Fn(&R, usize) -> RowKey,
{
    fn count<R: Record, F: Fn(&R, usize) -> RowKey>(
        record: &R,
        next_index: &mut usize,
        children_key: &str,
        expanded_keys: &ExpandedKeys,
        key_of: &F,
    ) {
        let index = *next_index;
        *next_index += 1;
        if let Some(children) = record.children(children_key) {
            if !children.is_empty() && expanded_keys.contains(&key_of(record, index)) {
                for child in children {
                    count(child, next_index, children_key, expanded_keys, key_of);
                }
            }
        }
    }

    if expanded_keys.is_empty() {
        return records.len();
    }
    let mut next_index = 0;
    for record in records {
        count(
            record,
            &mut next_index,
            children_key,
            expanded_keys,
            &key_of,
        );
    }
    next_index
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn key_of(record: &Value, index: usize) -> RowKey {
        record
            .get("key")
            .and_then(RowKey::from_json)
            .unwrap_or_else(|| RowKey::from(index))
    }

    fn keys(rows: &[FlatRow<'_, Value>]) -> Vec<(i64, u32, usize)> {
        rows.iter()
            .map(|r| (r.record["key"].as_i64().unwrap(), r.indent, r.index))
            .collect()
    }

    #[test]
    fn test_expanded_parent_emits_children() {
        let data = vec![json!({"key": 1, "children": [{"key": 2}]})];
        let expanded: ExpandedKeys = [RowKey::from(1)].into_iter().collect();

        let rows = flatten(&data, "children", &expanded, key_of);
        assert_eq!(keys(&rows), vec![(1, 0, 0), (2, 1, 1)]);
    }

    #[test]
    fn test_collapsed_parent_hides_children() {
        let data = vec![json!({"key": 1, "children": [{"key": 2}]})];

        let rows = flatten(&data, "children", &ExpandedKeys::new(), key_of);
        assert_eq!(keys(&rows), vec![(1, 0, 0)]);
    }

    #[test]
    fn test_children_key_is_configurable() {
        let data = vec![json!({"key": 1, "items": [{"key": 2}], "children": [{"key": 3}]})];
        let expanded: ExpandedKeys = [RowKey::from(1)].into_iter().collect();

        let rows = flatten(&data, "items", &expanded, key_of);
        assert_eq!(keys(&rows), vec![(1, 0, 0), (2, 1, 1)]);
    }

    #[test]
    fn test_non_array_children_is_leaf() {
        let data = vec![json!({"key": 1, "children": "nope"}), json!({"key": 2})];
        let expanded: ExpandedKeys = [RowKey::from(1)].into_iter().collect();

        let rows = flatten(&data, "children", &expanded, key_of);
        assert_eq!(keys(&rows), vec![(1, 0, 0), (2, 0, 1)]);
    }

    #[test]
    fn test_count_matches_flatten() {
        let data = vec![
            json!({"key": 1, "children": [{"key": 2, "children": [{"key": 3}]}, {"key": 4}]}),
            json!({"key": 5, "children": [{"key": 6}]}),
        ];
        let expanded: ExpandedKeys = [RowKey::from(1), RowKey::from(2)].into_iter().collect();

        let rows = flatten(&data, "children", &expanded, key_of);
        assert_eq!(rows.len(), 5);
        assert_eq!(count_reachable(&data, "children", &expanded, key_of), 5);
    }
}

// ── Response reshaping ──
//
// Turns raw management responses into the flat shapes the grids display.

use serde_json::{Map, Value};

use crate::grid::{Row, RowSet};

/// Hoist every entry of a nested `statistics` object into its parent, and
/// do the same for each element of any array held by the parent.
///
/// The `statistics` key itself is kept.
pub fn flatten_statistics(data: &mut Value) {
    let Value::Object(map) = data else {
        return;
    };

    if let Some(Value::Object(stats)) = map.get("statistics").cloned() {
        map.extend(stats);
    }

    for value in map.values_mut() {
        if let Value::Array(items) = value {
            items.iter_mut().for_each(flatten_statistics);
        }
    }
}

/// Convert a configuration map into `{id, value}` rows, one per entry.
pub fn config_rows(config: Option<&Map<String, Value>>) -> RowSet {
    config
        .map(|entries| {
            entries
                .iter()
                .map(|(key, value)| {
                    let mut row = Row::new();
                    row.insert("id".into(), Value::String(key.clone()));
                    row.insert("value".into(), value.clone());
                    row
                })
                .collect()
        })
        .unwrap_or_default()
}

// ── Grid synchronisation ──
//
// Compares freshly fetched rows against the rows a grid is currently
// showing and decides whether the grid must be redrawn. Redrawing on every
// poll tick would drop the user's selection and flicker, so replacement
// happens only on an actual content change.

use serde_json::{Map, Value};
use tracing::trace;

use crate::compare::records_equal;

/// One entity's display fields.
pub type Row = Map<String, Value>;

/// Ordered rows backing a grid; insertion order is display order.
pub type RowSet = Vec<Row>;

/// What the owner of a grid widget should do with a freshly fetched row set.
#[derive(Debug, Clone, PartialEq)]
pub enum GridUpdate {
    /// Nothing to show: hide the panel holding the grid, keep its rows.
    NoData,
    /// Same rows as rendered: leave the grid and its selection untouched.
    Unchanged,
    /// Rows differ: install them and redraw.
    Replace(RowSet),
    /// Rows differ and the grid goes from empty to a single row: install them
    /// and force a full render pass, which some backends need after being hidden.
    ReplaceAndForceRender(RowSet),
}

impl GridUpdate {
    /// Whether the rendered rows will be replaced.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Replace(_) | Self::ReplaceAndForceRender(_))
    }
}

/// Order-sensitive row comparison.
pub fn rows_equal(a: &[Row], b: &[Row]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| records_equal(x, y))
}

/// Decide how a grid showing `rendered` should react to `new_rows`.
pub fn plan_update(new_rows: Option<RowSet>, rendered: &[Row]) -> GridUpdate {
    let Some(rows) = new_rows.filter(|rows| !rows.is_empty()) else {
        return GridUpdate::NoData;
    };

    if rows_equal(&rows, rendered) {
        GridUpdate::Unchanged
    } else if rendered.is_empty() && rows.len() == 1 {
        GridUpdate::ReplaceAndForceRender(rows)
    } else {
        GridUpdate::Replace(rows)
    }
}

/// The backing store of one rendered grid.
///
/// Holds the committed rows plus the visibility and forced-render state the
/// rendering layer reads after each [`sync`](GridStore::sync).
#[derive(Debug, Clone, Default)]
pub struct GridStore {
    rows: RowSet,
    visible: bool,
    force_render: bool,
    revision: u64,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently committed to the grid.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the panel holding this grid should be shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the last replacement requires a forced render pass.
    pub fn needs_forced_render(&self) -> bool {
        self.force_render
    }

    /// Clear the forced-render flag once the caller has rendered.
    pub fn take_forced_render(&mut self) -> bool {
        std::mem::take(&mut self.force_render)
    }

    /// Bumped every time the rows are replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Compare `new_rows` with the committed rows and apply the outcome.
    ///
    /// Returns `true` when the rows were replaced and the grid must be
    /// redrawn. `None` or an empty set hides the grid without touching the
    /// committed rows.
    pub fn sync(&mut self, new_rows: Option<RowSet>) -> bool {
        let update = plan_update(new_rows, &self.rows);
        self.apply(update)
    }

    /// Apply a previously planned update. Returns `true` if rows were replaced.
    pub fn apply(&mut self, update: GridUpdate) -> bool {
        match update {
            GridUpdate::NoData => {
                trace!("grid has no data, hiding");
                self.visible = false;
                false
            }
            GridUpdate::Unchanged => {
                trace!(rows = self.rows.len(), "grid unchanged");
                self.visible = true;
                false
            }
            GridUpdate::Replace(rows) => self.install(rows, false),
            GridUpdate::ReplaceAndForceRender(rows) => self.install(rows, true),
        }
    }

    fn install(&mut self, rows: RowSet, force_render: bool) -> bool {
        trace!(rows = rows.len(), force_render, "grid rows replaced");
        self.rows = rows;
        self.visible = true;
        self.force_render |= force_render;
        self.revision += 1;
        true
    }
}

/// String value of `key` in `row`, if present and a string.
pub fn row_str<'a>(row: &'a Row, key: &str) -> Option<&'a str> {
    row.get(key).and_then(Value::as_str)
}

/// Render a cell value as display text: strings verbatim, `null` empty,
/// everything else as compact JSON.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Collect rows out of a JSON array, skipping non-object elements.
pub fn rows_from_value(value: Option<&Value>) -> Option<RowSet> {
    value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_object)
            .cloned()
            .collect()
    })
}

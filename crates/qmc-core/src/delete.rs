// ── Delete-selection flow ──
//
// A selection of grid rows becomes a confirmation prompt plus the id list
// sent to the broker. Nothing is deleted unless the prompt is accepted.

use url::form_urlencoded;

use crate::grid::{Row, row_str};

/// Query parameter used to identify objects when none is given.
pub const DEFAULT_ID_PARAM: &str = "id";

/// Confirmation text for deleting `names`.
///
/// One name reads `"{prefix} 'a'?"`; several read
/// `"{prefix}s \"a\", \"b\"?"`. An empty selection has no prompt.
pub fn confirmation_message(prefix: &str, names: &[&str]) -> Option<String> {
    match names {
        [] => None,
        [single] => Some(format!("{prefix} '{single}'?")),
        many => {
            let quoted: Vec<String> = many.iter().map(|n| format!("\"{n}\"")).collect();
            Some(format!("{prefix}s {}?", quoted.join(", ")))
        }
    }
}

/// Append one `id_param=<id>` query pair per id to `url`.
pub fn build_delete_query(url: &str, ids: &[&str], id_param: Option<&str>) -> String {
    if ids.is_empty() {
        return url.to_owned();
    }
    let param = id_param.unwrap_or(DEFAULT_ID_PARAM);
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(ids.iter().map(|id| (param, *id)))
        .finish();
    format!("{url}?{query}")
}

/// A confirmed-or-pending deletion of selected rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    ids: Vec<String>,
    names: Vec<String>,
    message: String,
}

impl DeletePlan {
    /// Build a plan from selected rows. Returns `None` for an empty selection.
    ///
    /// Rows without an `id` fall back to their `name`.
    pub fn from_selection(selection: &[Row], prefix: &str) -> Option<Self> {
        let names: Vec<String> = selection
            .iter()
            .map(|row| row_str(row, "name").unwrap_or_default().to_owned())
            .collect();
        let ids: Vec<String> = selection
            .iter()
            .zip(&names)
            .map(|(row, name)| row_str(row, "id").map_or_else(|| name.clone(), str::to_owned))
            .collect();

        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let message = confirmation_message(prefix, &name_refs)?;
        Some(Self { ids, names, message })
    }

    /// The prompt to show before deleting.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn ids(&self) -> Vec<&str> {
        self.ids.iter().map(String::as_str).collect()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Console-relative delete reference for these ids under `url`.
    pub fn query(&self, url: &str, id_param: Option<&str>) -> String {
        build_delete_query(url, &self.ids(), id_param)
    }
}

/// Ask `confirm` about the selection and, if accepted, hand the plan to `delete`.
///
/// Returns `Ok(true)` only when the deletion was confirmed and performed. An
/// empty selection never prompts.
pub async fn delete_selected<C, D, Fut, E>(
    selection: &[Row],
    prefix: &str,
    confirm: C,
    delete: D,
) -> Result<bool, E>
where
    C: FnOnce(&str) -> bool,
    D: FnOnce(DeletePlan) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let Some(plan) = DeletePlan::from_selection(selection, prefix) else {
        return Ok(false);
    };
    if !confirm(plan.message()) {
        return Ok(false);
    }
    delete(plan).await?;
    Ok(true)
}

// ── Naming helpers ──

use serde::Serialize;

/// Exchange names owned by the broker itself, which users may not delete.
pub fn is_reserved_exchange_name(name: Option<&str>) -> bool {
    match name {
        None | Some("" | "<<default>>") => true,
        Some(name) => name.starts_with("amq.") || name.starts_with("qpid."),
    }
}

/// An entry of a type selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeOption {
    pub id: String,
    pub name: String,
}

/// Build selector options from type names, keeping their order.
pub fn type_options<I, S>(types: I) -> Vec<TypeOption>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    types
        .into_iter()
        .map(|t| {
            let t = t.into();
            TypeOption {
                id: t.clone(),
                name: t,
            }
        })
        .collect()
}

/// Selector options for every type of `category`, sorted by name.
pub fn sorted_type_options(metadata: &qmc_api::Metadata, category: &str) -> Vec<TypeOption> {
    let mut types = metadata.types_for_category(category);
    types.sort();
    type_options(types)
}

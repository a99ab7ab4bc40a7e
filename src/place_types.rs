//! Translation from user-facing category labels to the place provider's
//! category vocabulary.

/// Domain label -> provider category. Unknown labels fall back to
/// [`DEFAULT_PLACE_TYPE`].
const PLACE_TYPE_MAPPING: &[(&str, &str)] = &[
    ("식당", "restaurant"),
    ("카페", "cafe"),
    ("서점", "book_store"),
    ("백화점", "department_store"),
];

pub const DEFAULT_PLACE_TYPE: &str = "restaurant";

/// Default category set for the curated search path.
pub const SEARCH_DEFAULT_TYPES: &[&str] = &["restaurant", "cafe", "department_store"];

/// Default category set for the recommendation path.
pub const RECOMMEND_DEFAULT_TYPES: &[&str] = &["restaurant", "cafe"];

/// Resolves one domain label to a provider category.
pub fn resolve(label: &str) -> &'static str {
    PLACE_TYPE_MAPPING
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, place_type)| *place_type)
        .unwrap_or(DEFAULT_PLACE_TYPE)
}

/// Resolves a label list to provider categories, substituting `defaults`
/// when the list is empty. Duplicates after mapping are kept; each entry
/// is queried independently.
pub fn resolve_all(labels: &[String], defaults: &[&str]) -> Vec<String> {
    if labels.is_empty() {
        defaults.iter().map(|t| t.to_string()).collect()
    } else {
        labels.iter().map(|label| resolve(label).to_string()).collect()
    }
}

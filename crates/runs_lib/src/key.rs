//! Identity keys of the runs.
//!
//! Two runs compete against each other exactly when their entry keys match, and a
//! run can supersede another exactly when their personal-best keys match. The keys
//! are plain strings so they can be grouped on, logged and compared across
//! exports.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::models::Run;

/// Renders category variables as `k=v` pairs joined by `&`.
///
/// The input map keeps its keys sorted, so the rendering is deterministic.
pub fn variable_pairs(variables: &BTreeMap<String, String>) -> String {
    variables
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .join("&")
}

/// The key of the entry a category and variables pair points at, in the shape
/// `{category_id}_{pairs}`.
pub fn entry_key(category_id: &str, variables: &BTreeMap<String, String>) -> String {
    format!("{category_id}_{}", variable_pairs(variables))
}

/// The key of the entry the run belongs to. Runs are only ever compared within
/// the same entry key.
pub fn compare_key(run: &Run) -> String {
    entry_key(&run.category_id, &run.variables)
}

/// The personal-best key of the run, in the shape
/// `{user_id}_{category_id}_{pairs}`.
///
/// At most one approved run may exist per personal-best key; approving a new one
/// supersedes the others. See
/// [`supersede_plan`](crate::moderation::supersede_plan).
pub fn pb_key(run: &Run) -> String {
    format!("{}_{}", run.user_id, entry_key(&run.category_id, &run.variables))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_pairs_render_in_key_order() {
        let variables = BTreeMap::from([
            ("star".to_owned(), "3".to_owned()),
            ("route".to_owned(), "carpetless".to_owned()),
        ]);
        assert_eq!(variable_pairs(&variables), "route=carpetless&star=3");
        assert_eq!(
            entry_key("frosted-hollow", &variables),
            "frosted-hollow_route=carpetless&star=3"
        );
    }

    #[test]
    fn entry_key_of_a_bare_category_keeps_the_separator() {
        assert_eq!(entry_key("frosted-hollow", &BTreeMap::new()), "frosted-hollow_");
    }
}

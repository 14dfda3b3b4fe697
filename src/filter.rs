//! Pure derivation of the visible record subset from full state plus a
//! category selection. Never mutates or copies stored data.

use std::collections::BTreeSet;

use crate::model::{Category, CategoryId, Record};

/// Returns the records visible under `selected`, preserving load order.
///
/// An empty selection means "no filter": every record is returned. Otherwise
/// a record is visible when its `country` display name equals the name of
/// some selected category. Matching is by name, not id, so a record whose
/// `country_id` is mid-flight stale may transiently fail to match; this is an
/// accepted consequence of the denormalized country pair.
#[must_use]
pub fn visible<'a>(
    records: &'a [Record],
    categories: &[Category],
    selected: &[CategoryId],
) -> Vec<&'a Record> {
    if selected.is_empty() {
        return records.iter().collect();
    }

    let allowed_names: BTreeSet<&str> = categories
        .iter()
        .filter(|c| selected.contains(&c.id))
        .map(|c| c.name.as_str())
        .collect();

    records
        .iter()
        .filter(|r| allowed_names.contains(r.country.as_str()))
        .collect()
}

//! Serial range overlap detection.

use crate::contract::model::{Passport, PassportId};

/// Closed intervals `[a_from, a_to]` and `[b_from, b_to]` share at least one value.
pub fn overlaps(a_from: i64, a_to: i64, b_from: i64, b_to: i64) -> bool {
    a_from <= b_to && b_from <= a_to
}

/// First passport in `existing` that claims part of `[from, to]` under `prefix`,
/// ignoring the passport `exclude_id` (the one being updated).
pub fn find_conflict<'a>(
    existing: &'a [Passport],
    prefix: &str,
    from: i64,
    to: i64,
    exclude_id: Option<PassportId>,
) -> Option<&'a Passport> {
    existing.iter().find(|p| {
        Some(p.id) != exclude_id
            && p.serial_prefix == prefix
            && overlaps(p.from_serial_number, p.to_serial_number, from, to)
    })
}

pub fn has_conflict(
    existing: &[Passport],
    prefix: &str,
    from: i64,
    to: i64,
    exclude_id: Option<PassportId>,
) -> bool {
    find_conflict(existing, prefix, from, to, exclude_id).is_some()
}

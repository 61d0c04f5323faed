//! Warranty expiration arithmetic.

use chrono::{Months, NaiveDate};

/// Extra warranty granted to devices with a registered owner.
pub const OWNER_EXTENSION_MONTHS: u32 = 12;

/// Calendar month addition; the day is clamped to the end of a shorter month.
/// Saturates at `NaiveDate::MAX`.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(NaiveDate::MAX)
}

/// Warranty end for a device bought on `purchase_date` under a passport with
/// `warranty_months`. Owned devices get the extension on top of the base term.
pub fn compute_expiration(
    purchase_date: NaiveDate,
    warranty_months: u32,
    has_owner: bool,
) -> NaiveDate {
    let base = add_months(purchase_date, warranty_months);
    if has_owner {
        add_months(base, OWNER_EXTENSION_MONTHS)
    } else {
        base
    }
}

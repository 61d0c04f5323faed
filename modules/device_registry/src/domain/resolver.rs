//! Serial number → passport resolution.

use crate::contract::model::Passport;
use crate::domain::error::DomainError;
use crate::domain::serial::suffix_after;

/// Pick the passport governing `serial` among `candidates`.
///
/// Each candidate's own prefix is stripped from `serial`; candidates whose
/// remainder is not a number are skipped, and the first remaining candidate
/// whose range covers the suffix wins. Candidates are scanned in ascending id
/// order, so overlapping passports (which the range check should have
/// prevented) resolve to the oldest one.
pub fn resolve(serial: &str, mut candidates: Vec<Passport>) -> Result<Passport, DomainError> {
    candidates.sort_by_key(|p| p.id);

    candidates
        .into_iter()
        .filter_map(|p| suffix_after(serial, &p.serial_prefix).map(|suffix| (p, suffix)))
        .find(|(p, suffix)| p.covers(*suffix))
        .map(|(p, _)| p)
        .ok_or_else(|| DomainError::no_passport_for_serial(serial))
}

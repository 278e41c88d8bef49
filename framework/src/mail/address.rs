//! Recipient list splitting and address-shape filtering.
//!
//! The shape check is deliberately loose: `local@domain.tld` or
//! `local@domain.tld.tld2`, where `local` and `domain` are ASCII word
//! characters and the tld parts are lowercase letters. Anything else (dots in
//! the local part, hyphens, display names, surrounding whitespace) is dropped.

use once_cell::sync::Lazy;
use regex::Regex;

static ADDRESS_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?-u:\w)+@(?-u:\w)+\.[a-z]+(?:\.[a-z]+)?$").expect("address pattern compiles")
});

/// Whether `candidate` passes the address-shape check as a whole.
pub fn is_well_formed(candidate: &str) -> bool {
    ADDRESS_SHAPE.is_match(candidate)
}

/// Split a comma-separated field and keep only well-formed addresses, in order.
///
/// Candidates are not trimmed, so `"a@b.com, c@d.com"` yields only `a@b.com`.
pub fn filter_addresses(field: &str) -> Vec<String> {
    field
        .split(',')
        .filter(|candidate| is_well_formed(candidate))
        .map(str::to_owned)
        .collect()
}

/// Filter an optional field. `None` when the field is blank or nothing survives.
pub fn filter_optional(field: Option<&str>) -> Option<Vec<String>> {
    let field = field.filter(|f| !f.trim().is_empty())?;
    let addresses = filter_addresses(field);
    (!addresses.is_empty()).then_some(addresses)
}

//! World Wide Name format
//!
//! A WWN is eight colon-separated hexadecimal octets. Only the format is
//! checked; the value is never interpreted.

use std::sync::OnceLock;

use regex::Regex;

/// Canonical WWN pattern, anchored at both ends
pub const WWN_PATTERN: &str = r"^(?:[0-9a-fA-F]{2}:){7}[0-9a-fA-F]{2}$";

fn wwn_regex() -> &'static Regex {
    static WWN_REGEX: OnceLock<Regex> = OnceLock::new();
    WWN_REGEX.get_or_init(|| Regex::new(WWN_PATTERN).expect("WWN pattern is a valid regex"))
}

/// Whether `candidate` is written as a canonical WWN
pub fn is_wwn(candidate: &str) -> bool {
    wwn_regex().is_match(candidate)
}

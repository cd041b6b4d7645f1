//! `format` assertions.
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

// Sources are literals; `None` only if the regex crate rejects them.
static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").ok());
static URI: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]*$").ok());
static UUID: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$").ok()
});
static HOSTNAME: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9\-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)*$")
        .ok()
});

/// `Some(conforms)` for a known format, `None` for formats we only
/// annotate.
pub(crate) fn check(format_name: &str, value: &str) -> Option<bool> {
    let ok = match format_name {
        "date-time" => DateTime::parse_from_rfc3339(value).is_ok(),
        "date" => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        // RFC 3339 full-time: borrow the date-time parser with a fixed date
        "time" => DateTime::parse_from_rfc3339(&format!("1970-01-01T{value}")).is_ok(),
        "email" => matches(&EMAIL, value),
        "uri" => matches(&URI, value),
        "uuid" => matches(&UUID, value),
        "hostname" => value.len() <= 253 && matches(&HOSTNAME, value),
        "ipv4" => value.parse::<Ipv4Addr>().is_ok(),
        "ipv6" => value.parse::<Ipv6Addr>().is_ok(),
        "regex" => Regex::new(value).is_ok(),
        _ => return None,
    };
    Some(ok)
}

fn matches(re: &Lazy<Option<Regex>>, value: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(value))
}

//! Small helpers shared by the parser, the orchestrator and the CLI.
//!
//! - Date stamping in the `en-IN` short style used on article cards
//! - Random record ids (the upstream model assigns none)
//! - Log-safe truncation of long model responses

use chrono::{Local, NaiveDate};
use rand::{Rng, rng};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random part of a live article id.
const ID_TOKEN_LEN: usize = 5;

/// Format a date the way an `en-IN` locale renders
/// `{ day: 'numeric', month: 'short', year: 'numeric' }`.
///
/// # Examples
///
/// ```ignore
/// let d = NaiveDate::from_ymd_opt(2024, 10, 5).unwrap();
/// assert_eq!(format_en_in(d), "5 Oct 2024");
/// ```
pub fn format_en_in(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Today's local date in the `en-IN` short style.
pub fn today_en_in() -> String {
    format_en_in(Local::now().date_naive())
}

/// Generate an opaque id for a live article, e.g. `live-k3f9a`.
pub fn live_id() -> String {
    let mut r = rng();
    let token: String = (0..ID_TOKEN_LEN)
        .map(|_| ID_ALPHABET[r.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("live-{token}")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last char boundary at or below `max` bytes
/// and suffixed with `"…(+N bytes)"`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

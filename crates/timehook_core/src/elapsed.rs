use chrono::{DateTime, FixedOffset};
use timehook_logging::hook_warn;

/// Timestamp layout used by the API, e.g. `2018-01-29T12:32:25+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Whole seconds from `from` to `to`.
///
/// A missing or malformed timestamp yields 0 so progress output keeps going;
/// the malformed value is logged as a warning instead of being surfaced.
pub fn elapsed_seconds(from: Option<&str>, to: Option<&str>) -> i64 {
    let (Some(from), Some(to)) = (from, to) else {
        return 0;
    };
    match (parse(from), parse(to)) {
        (Some(from), Some(to)) => (to - from).num_seconds(),
        _ => 0,
    }
}

fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::<FixedOffset>::parse_from_str(raw, TIMESTAMP_FORMAT) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            hook_warn!("Ignoring malformed timestamp {:?}: {}", raw, err);
            None
        }
    }
}

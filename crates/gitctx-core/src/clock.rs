//! Wall-clock helpers. All persisted timestamps are RFC 3339 strings.

use time::OffsetDateTime;

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .expect("RFC3339 formatting should not fail")
}

/// Current UTC time as a filesystem-safe stamp, e.g. `20260806_142530`.
/// Used for archive directory names.
pub fn compact_stamp() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

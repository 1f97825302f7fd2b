// LogDeck - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{
    DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, Offset, SecondsFormat, TimeZone,
    Timelike, Utc,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// =============================================================================
// Log Record
// =============================================================================

/// A single web-server access-log entry.
///
/// Records are immutable once built: every stage of the query pipeline reads
/// them through shared references and produces index lists, never copies or
/// edits. Serialised key names match the dashboard's data format
/// (`ip`, `timestamp`, `statusCode`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogRecord {
    /// Client address, usually a dotted quad.
    #[serde(rename = "ip")]
    pub source_address: String,

    /// Instant the request was served.
    #[serde(rename = "timestamp", with = "iso_millis")]
    pub occurred_at: DateTime<Utc>,

    /// HTTP verb. Treated as an opaque string for filtering.
    pub method: String,

    /// Request path.
    pub path: String,

    /// HTTP status code, nominally 100-599.
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    /// Response size in bytes. Zero is a real value, not "unknown".
    #[serde(rename = "size")]
    pub byte_size: u64,

    /// Free-text user agent. Classified, never parsed structurally.
    #[serde(rename = "userAgent")]
    pub agent_string: String,

    /// Referer URL. Empty means "no referer".
    #[serde(rename = "referer", default)]
    pub referer_url: String,

    /// Short classification tag such as "html", "image" or "api".
    #[serde(rename = "fileType")]
    pub content_category: String,
}

impl LogRecord {
    /// Whether this request came from a crawler, by agent-string heuristic.
    ///
    /// Derived on every call; deliberately not stored on the record.
    pub fn is_bot(&self) -> bool {
        is_bot(&self.agent_string)
    }

    /// Status bucket of this record, `None` for codes outside 200-599.
    pub fn status_class(&self) -> Option<StatusClass> {
        StatusClass::of(self.status_code)
    }
}

/// Bot/human classification by lowercase containment of any of the markers
/// in [`BOT_MARKERS`](crate::util::constants::BOT_MARKERS).
pub fn is_bot(agent_string: &str) -> bool {
    let agent_lower = agent_string.to_lowercase();
    crate::util::constants::BOT_MARKERS
        .iter()
        .any(|marker| agent_lower.contains(marker))
}

// =============================================================================
// Timestamp representation
// =============================================================================

/// Render an instant in the canonical export form:
/// RFC 3339, millisecond precision, `Z` suffix (`2023-04-10T08:00:00.000Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse any RFC 3339 timestamp and normalise it to UTC.
///
/// Precision is cut to whole milliseconds so the stored instant equals its
/// `format_timestamp` form.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw.trim()).map(|ts| truncate_millis(ts.with_timezone(&Utc)))
}

fn truncate_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.nanosecond() / 1_000_000 * 1_000_000;
    ts.with_nanosecond(nanos).unwrap_or(ts)
}

/// serde adapter that keeps JSON timestamps in the same form as CSV.
mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}

/// Zone that timestamps are shown in and calendar dates are read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The machine's time zone, with its daylight-saving rules.
    #[default]
    Local,
    /// A fixed offset (UTC is `+00:00`).
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// Parse `local`, `utc`, `z`, `+HH:MM`, `-HH:MM` or `+HHMM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("local") {
            return Some(DisplayZone::Local);
        }
        if raw.eq_ignore_ascii_case("utc") || raw.eq_ignore_ascii_case("z") {
            return FixedOffset::east_opt(0).map(DisplayZone::Fixed);
        }

        let (sign, rest) = match raw.as_bytes().first() {
            Some(b'+') => (1, &raw[1..]),
            Some(b'-') => (-1, &raw[1..]),
            _ => return None,
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let hours: i32 = digits[..2].parse().ok()?;
        let minutes: i32 = digits[2..].parse().ok()?;
        if hours > 23 || minutes > 59 {
            return None;
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(DisplayZone::Fixed)
    }

    /// Offset in effect at `ts`. `Local` follows the zone's daylight-saving
    /// rules for that instant, not the offset of today.
    pub fn offset_at(self, ts: &DateTime<Utc>) -> FixedOffset {
        match self {
            DisplayZone::Local => Local.offset_from_utc_datetime(&ts.naive_utc()).fix(),
            DisplayZone::Fixed(offset) => offset,
        }
    }

    /// `ts` as wall-clock time in this zone.
    pub fn to_display(self, ts: &DateTime<Utc>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.offset_at(ts))
    }

    /// The instant a wall-clock time names in this zone. An ambiguous time
    /// takes the earlier instant; a time inside a forward gap moves past it.
    pub fn resolve_local(self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        let local = match self {
            DisplayZone::Fixed(offset) => return naive.and_local_timezone(offset).single(),
            DisplayZone::Local => match Local.from_local_datetime(&naive) {
                LocalResult::Single(ts) | LocalResult::Ambiguous(ts, _) => ts,
                LocalResult::None => Local
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()?,
            },
        };
        Some(local.with_timezone(&local.offset().fix()))
    }
}

impl From<FixedOffset> for DisplayZone {
    fn from(offset: FixedOffset) -> Self {
        DisplayZone::Fixed(offset)
    }
}

// =============================================================================
// Field
// =============================================================================

/// How a field's values compare when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Compared by instant.
    Temporal,
    /// Compared numerically.
    Numeric,
    /// Compared case-insensitively as text.
    Text,
}

/// The nine logical fields of a [`LogRecord`], in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Timestamp,
    Ip,
    Method,
    Path,
    Status,
    Size,
    UserAgent,
    Referer,
    FileType,
}

impl Field {
    /// Number of fields; the length of every per-field array.
    pub const COUNT: usize = 9;

    /// All fields in export order.
    pub fn all() -> &'static [Field; Field::COUNT] {
        &[
            Field::Timestamp,
            Field::Ip,
            Field::Method,
            Field::Path,
            Field::Status,
            Field::Size,
            Field::UserAgent,
            Field::Referer,
            Field::FileType,
        ]
    }

    /// Position of this field in [`Field::all`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Timestamp => FieldKind::Temporal,
            Field::Status | Field::Size => FieldKind::Numeric,
            _ => FieldKind::Text,
        }
    }

    /// Column header used in CSV export.
    pub fn export_header(self) -> &'static str {
        match self {
            Field::Timestamp => "Timestamp",
            Field::Ip => "IP",
            Field::Method => "Method",
            Field::Path => "Path",
            Field::Status => "Status",
            Field::Size => "Size",
            Field::UserAgent => "User Agent",
            Field::Referer => "Referer",
            Field::FileType => "File Type",
        }
    }

    /// Human-readable label for table headers and detail views.
    pub fn label(self) -> &'static str {
        match self {
            Field::Timestamp => "Timestamp",
            Field::Ip => "IP Address",
            Field::Method => "Method",
            Field::Path => "Path",
            Field::Status => "Status",
            Field::Size => "Size",
            Field::UserAgent => "User Agent",
            Field::Referer => "Referer",
            Field::FileType => "File Type",
        }
    }

    /// Stable identifier used on the command line and in config.toml.
    pub fn key(self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Ip => "ip",
            Field::Method => "method",
            Field::Path => "path",
            Field::Status => "status",
            Field::Size => "size",
            Field::UserAgent => "user-agent",
            Field::Referer => "referer",
            Field::FileType => "file-type",
        }
    }

    /// Lenient lookup by key, export header, or JSON key, ignoring case,
    /// spaces, dashes and underscores.
    pub fn parse(raw: &str) -> Option<Field> {
        let normalised: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        let field = match normalised.as_str() {
            "timestamp" | "time" => Field::Timestamp,
            "ip" | "ipaddress" | "sourceaddress" => Field::Ip,
            "method" => Field::Method,
            "path" => Field::Path,
            "status" | "statuscode" => Field::Status,
            "size" | "bytes" | "bytesize" => Field::Size,
            "useragent" | "agent" => Field::UserAgent,
            "referer" | "referrer" => Field::Referer,
            "filetype" | "type" | "contenttype" | "category" => Field::FileType,
            _ => return None,
        };
        Some(field)
    }

    /// String representation of this field's value, as written to CSV and
    /// used for case-insensitive text ordering.
    pub fn raw_value(self, record: &LogRecord) -> Cow<'_, str> {
        match self {
            Field::Timestamp => Cow::Owned(format_timestamp(&record.occurred_at)),
            Field::Ip => Cow::Borrowed(&record.source_address),
            Field::Method => Cow::Borrowed(&record.method),
            Field::Path => Cow::Borrowed(&record.path),
            Field::Status => Cow::Owned(record.status_code.to_string()),
            Field::Size => Cow::Owned(record.byte_size.to_string()),
            Field::UserAgent => Cow::Borrowed(&record.agent_string),
            Field::Referer => Cow::Borrowed(&record.referer_url),
            Field::FileType => Cow::Borrowed(&record.content_category),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Status class
// =============================================================================

/// Status-code buckets. Codes below 200 or at/above 600 belong to none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusClass {
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusClass {
    /// All buckets in ascending code order.
    pub fn all() -> &'static [StatusClass] {
        &[
            StatusClass::Success,
            StatusClass::Redirection,
            StatusClass::ClientError,
            StatusClass::ServerError,
        ]
    }

    /// Half-open code range `[start, end)` covered by this bucket.
    pub fn range(self) -> std::ops::Range<u16> {
        match self {
            StatusClass::Success => 200..300,
            StatusClass::Redirection => 300..400,
            StatusClass::ClientError => 400..500,
            StatusClass::ServerError => 500..600,
        }
    }

    pub fn contains(self, code: u16) -> bool {
        self.range().contains(&code)
    }

    /// Bucket containing `code`, if any.
    pub fn of(code: u16) -> Option<StatusClass> {
        Self::all().iter().copied().find(|class| class.contains(code))
    }

    /// Selection label (`2xx`, `3xx`, `4xx`, `5xx`).
    pub fn label(self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::Redirection => "3xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
        }
    }

    /// Interpret a filter selection. `"all"` and anything unrecognised mean
    /// "no status filter".
    pub fn parse_selection(raw: &str) -> Option<StatusClass> {
        let raw = raw.trim();
        let parsed = Self::all()
            .iter()
            .copied()
            .find(|class| class.label().eq_ignore_ascii_case(raw));
        if parsed.is_none() && !is_all_selection(raw) {
            tracing::debug!(selection = raw, "Unknown status selection treated as all");
        }
        parsed
    }
}

impl std::fmt::Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Traffic class
// =============================================================================

/// Bot/human traffic selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traffic {
    Bots,
    Humans,
}

impl Traffic {
    /// Classify an agent string.
    pub fn of(agent_string: &str) -> Traffic {
        if is_bot(agent_string) {
            Traffic::Bots
        } else {
            Traffic::Humans
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Traffic::Bots => "bots",
            Traffic::Humans => "humans",
        }
    }

    /// Interpret a filter selection. `"all"` and anything unrecognised mean
    /// "no traffic filter".
    pub fn parse_selection(raw: &str) -> Option<Traffic> {
        let raw = raw.trim();
        match raw.to_lowercase().as_str() {
            "bots" | "bot" => Some(Traffic::Bots),
            "humans" | "human" => Some(Traffic::Humans),
            _ => {
                if !is_all_selection(raw) {
                    tracing::debug!(selection = raw, "Unknown traffic selection treated as all");
                }
                None
            }
        }
    }
}

impl std::fmt::Display for Traffic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a raw selection string is the explicit "no filter" choice.
pub fn is_all_selection(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("all")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_record() -> LogRecord {
        LogRecord {
            source_address: "10.0.0.1".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2023, 4, 10, 8, 0, 0).unwrap(),
            method: "GET".to_string(),
            path: "/index.html".to_string(),
            status_code: 200,
            byte_size: 0,
            agent_string: "Mozilla/5.0".to_string(),
            referer_url: String::new(),
            content_category: "html".to_string(),
        }
    }

    #[test]
    fn test_bot_classification() {
        assert!(is_bot(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
        ));
        assert!(!is_bot("Mozilla/5.0"));
        assert!(is_bot("Baiduspider"));
        assert!(is_bot("SomeCRAWLER/1.0"));
        assert_eq!(Traffic::of("YandexBot/3.0"), Traffic::Bots);
    }

    #[test]
    fn test_status_class_boundaries() {
        assert_eq!(StatusClass::of(199), None);
        assert_eq!(StatusClass::of(200), Some(StatusClass::Success));
        assert_eq!(StatusClass::of(299), Some(StatusClass::Success));
        assert_eq!(StatusClass::of(300), Some(StatusClass::Redirection));
        assert_eq!(StatusClass::of(404), Some(StatusClass::ClientError));
        assert_eq!(StatusClass::of(599), Some(StatusClass::ServerError));
        assert_eq!(StatusClass::of(600), None);
        assert_eq!(StatusClass::of(101), None);
    }

    #[test]
    fn test_selection_parsing_is_lenient() {
        assert_eq!(StatusClass::parse_selection("4XX"), Some(StatusClass::ClientError));
        assert_eq!(StatusClass::parse_selection("all"), None);
        assert_eq!(StatusClass::parse_selection("7xx"), None);
        assert_eq!(Traffic::parse_selection("Humans"), Some(Traffic::Humans));
        assert_eq!(Traffic::parse_selection("robots"), None);
    }

    #[test]
    fn test_timestamp_format_is_iso_millis_utc() {
        let record = make_record();
        assert_eq!(format_timestamp(&record.occurred_at), "2023-04-10T08:00:00.000Z");
        let parsed = parse_timestamp("2023-04-10T10:00:00+02:00").unwrap();
        assert_eq!(parsed, record.occurred_at);
    }

    #[test]
    fn test_json_uses_dashboard_keys() {
        let json = serde_json::to_value(make_record()).unwrap();
        assert_eq!(json["ip"], "10.0.0.1");
        assert_eq!(json["timestamp"], "2023-04-10T08:00:00.000Z");
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["size"], 0);
        assert_eq!(json["fileType"], "html");
        assert_eq!(json["referer"], "");
    }

    #[test]
    fn test_field_parse_accepts_keys_and_headers() {
        for field in Field::all() {
            assert_eq!(Field::parse(field.key()), Some(*field));
            assert_eq!(Field::parse(field.export_header()), Some(*field));
        }
        assert_eq!(Field::parse("statusCode"), Some(Field::Status));
        assert_eq!(Field::parse("userAgent"), Some(Field::UserAgent));
        assert_eq!(Field::parse("colour"), None);
    }

    #[test]
    fn test_field_index_matches_order() {
        for (i, field) in Field::all().iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_parse_timestamp_keeps_whole_milliseconds() {
        let parsed = parse_timestamp("2023-04-10T08:00:00.0005Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 4, 10, 8, 0, 0).unwrap());
        let parsed = parse_timestamp("2023-04-10T08:00:00.123987654Z").unwrap();
        assert_eq!(format_timestamp(&parsed), "2023-04-10T08:00:00.123Z");
        assert_eq!(parse_timestamp(&format_timestamp(&parsed)).unwrap(), parsed);
    }

    #[test]
    fn test_display_zone_parse() {
        assert_eq!(DisplayZone::parse("local"), Some(DisplayZone::Local));
        assert_eq!(
            DisplayZone::parse("UTC"),
            Some(DisplayZone::Fixed(FixedOffset::east_opt(0).unwrap()))
        );
        assert_eq!(
            DisplayZone::parse("-0800"),
            Some(DisplayZone::Fixed(FixedOffset::west_opt(8 * 3600).unwrap()))
        );
        assert_eq!(DisplayZone::parse("+5"), None);
        assert_eq!(DisplayZone::parse("Europe/Paris"), None);
    }

    #[test]
    fn test_local_zone_offset_follows_the_instant() {
        let winter = Utc.with_ymd_and_hms(2023, 1, 15, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2023, 7, 15, 12, 0, 0).unwrap();
        for ts in [winter, summer] {
            let expected = ts.with_timezone(&Local).offset().fix();
            assert_eq!(DisplayZone::Local.offset_at(&ts), expected);
            assert_eq!(DisplayZone::Local.to_display(&ts).naive_local(), ts.with_timezone(&Local).naive_local());
        }
    }

    #[test]
    fn test_resolve_local_in_fixed_zone() {
        let plus_two = DisplayZone::from(FixedOffset::east_opt(2 * 3600).unwrap());
        let naive = chrono::NaiveDate::from_ymd_opt(2023, 4, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let resolved = plus_two.resolve_local(naive).unwrap();
        assert_eq!(resolved.with_timezone(&Utc), Utc.with_ymd_and_hms(2023, 4, 9, 22, 0, 0).unwrap());
    }
}

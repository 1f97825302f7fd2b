// LogDeck - tests/local_zone.rs
//
// Local-zone date handling under a zone with daylight saving. Kept in its own
// test binary because it sets TZ for the whole process.

use chrono::{Local, Offset, TimeZone, Utc};
use logdeck::core::filter::{parse_date_bound, DateRange, DayEdge};
use logdeck::core::model::{DisplayZone, Field, LogRecord};
use logdeck::core::table::format_cell;

fn record_at(ts: chrono::DateTime<Utc>) -> LogRecord {
    LogRecord {
        source_address: "10.0.0.1".to_string(),
        occurred_at: ts,
        method: "GET".to_string(),
        path: "/".to_string(),
        status_code: 200,
        byte_size: 0,
        agent_string: "Mozilla/5.0".to_string(),
        referer_url: String::new(),
        content_category: "html".to_string(),
    }
}

#[test]
fn e2e_local_dates_follow_daylight_saving() {
    std::env::set_var("TZ", "Europe/Berlin");

    let winter_late = Local.with_ymd_and_hms(2023, 1, 15, 23, 30, 0).unwrap();
    let summer_late = Local.with_ymd_and_hms(2023, 7, 15, 23, 30, 0).unwrap();
    let winter_offset = winter_late.offset().fix();
    let summer_offset = summer_late.offset().fix();

    for (date, late) in [("2023-01-15", winter_late), ("2023-07-15", summer_late)] {
        let range = DateRange {
            from: parse_date_bound(date, DisplayZone::Local, DayEdge::Start),
            to: parse_date_bound(date, DisplayZone::Local, DayEdge::End),
        };
        let late = late.with_timezone(&Utc);
        assert!(range.contains(&late), "23:30 local on {date} must pass");
        assert!(!range.contains(&(late + chrono::Duration::minutes(31))), "next day must fail");
        assert!(!range.contains(&(late - chrono::Duration::hours(24))), "previous day must fail");

        assert_eq!(
            format_cell(Field::Timestamp, &record_at(late), DisplayZone::Local),
            format!("{} 23:30:00", date)
        );
    }

    // Without tz data both offsets are UTC; with it they differ by an hour.
    if winter_offset != summer_offset {
        assert_eq!(winter_offset.local_minus_utc(), 3600);
        assert_eq!(summer_offset.local_minus_utc(), 7200);
    }
}

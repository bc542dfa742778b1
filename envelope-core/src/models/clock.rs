use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, offset, time};
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const EASTERN_STANDARD: UtcOffset = offset!(-5);
const EASTERN_DAYLIGHT: UtcOffset = offset!(-4);

const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Clock used to stamp outbound creation timestamps.
pub type Clock = fn() -> OffsetDateTime;

/// Current time in US Eastern, truncated to whole seconds.
pub fn reference_now() -> OffsetDateTime {
    to_reference_zone(OffsetDateTime::now_utc())
}

pub fn to_reference_zone(instant: OffsetDateTime) -> OffsetDateTime {
    let truncated = instant - Duration::nanoseconds(i64::from(instant.nanosecond()));
    truncated.to_offset(eastern_offset(truncated))
}

/// US Eastern offset for an instant: daylight time from 07:00 UTC on the
/// second Sunday of March until 06:00 UTC on the first Sunday of November.
/// This is the rule in force since 2007; only current instants are stamped.
fn eastern_offset(instant: OffsetDateTime) -> UtcOffset {
    let year = instant.to_offset(UtcOffset::UTC).year();
    let start = nth_sunday(year, Month::March, 2).map(|d| PrimitiveDateTime::new(d, time!(7:00)).assume_utc());
    let end = nth_sunday(year, Month::November, 1).map(|d| PrimitiveDateTime::new(d, time!(6:00)).assume_utc());

    match (start, end) {
        (Some(start), Some(end)) if instant >= start && instant < end => EASTERN_DAYLIGHT,
        _ => EASTERN_STANDARD,
    }
}

fn nth_sunday(year: i32, month: Month, nth: i64) -> Option<Date> {
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let to_sunday = (7 - i64::from(first.weekday().number_days_from_sunday())) % 7;
    first.checked_add(Duration::days(to_sunday + 7 * (nth - 1)))
}

pub fn format_date_time(value: &OffsetDateTime) -> Result<String, time::error::Format> {
    value.format(DATE_TIME_FORMAT)
}

pub fn parse_date_time(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(text.trim(), &Rfc3339).or_else(|_| OffsetDateTime::parse(text.trim(), DATE_TIME_FORMAT))
}

pub fn format_date(value: &Date) -> Result<String, time::error::Format> {
    value.format(DATE_FORMAT)
}

pub fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text.trim(), DATE_FORMAT)
}

/// `YYYY-MM-DDThh:mm:ss±hh:mm` with serde.
pub mod iso_datetime {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let text = super::format_date_time(value).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_date_time(&text).map_err(D::Error::custom)
    }

    pub mod option {
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
        use time::OffsetDateTime;

        pub fn serialize<S: Serializer>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(text) if !text.trim().is_empty() => {
                    crate::models::clock::parse_date_time(&text).map(Some).map_err(D::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }
}

/// `YYYY-MM-DD` with serde.
pub mod iso_date {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(value: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = super::format_date(value).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(D::Error::custom)
    }

    pub mod option {
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(text) if !text.trim().is_empty() => {
                    crate::models::clock::parse_date(&text).map(Some).map_err(D::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn eastern_offset_follows_daylight_saving() {
        assert_eq!(to_reference_zone(datetime!(2024-01-15 12:00 UTC)).offset(), offset!(-5));
        assert_eq!(to_reference_zone(datetime!(2024-07-04 12:00 UTC)).offset(), offset!(-4));
        // 2024-03-10 is the second Sunday of March
        assert_eq!(to_reference_zone(datetime!(2024-03-10 06:59 UTC)).offset(), offset!(-5));
        assert_eq!(to_reference_zone(datetime!(2024-03-10 07:00 UTC)).offset(), offset!(-4));
        // 2024-11-03 is the first Sunday of November
        assert_eq!(to_reference_zone(datetime!(2024-11-03 05:59 UTC)).offset(), offset!(-4));
        assert_eq!(to_reference_zone(datetime!(2024-11-03 06:00 UTC)).offset(), offset!(-5));
    }

    #[test]
    fn transitions_track_the_calendar_each_year() {
        // (second Sunday of March, first Sunday of November)
        let transitions = [
            (datetime!(2025-03-09 07:00 UTC), datetime!(2025-11-02 06:00 UTC)),
            (datetime!(2026-03-08 07:00 UTC), datetime!(2026-11-01 06:00 UTC)),
            (datetime!(2027-03-14 07:00 UTC), datetime!(2027-11-07 06:00 UTC)),
        ];
        for (spring, fall) in transitions {
            assert_eq!(to_reference_zone(spring - Duration::seconds(1)).offset(), offset!(-5));
            assert_eq!(to_reference_zone(spring).offset(), offset!(-4));
            assert_eq!(to_reference_zone(fall - Duration::seconds(1)).offset(), offset!(-4));
            assert_eq!(to_reference_zone(fall).offset(), offset!(-5));
        }
        // local wall clock at the spring transition jumps from 01:59:59 to 03:00:00
        assert_eq!(format_date_time(&to_reference_zone(datetime!(2026-03-08 07:00 UTC))).unwrap(), "2026-03-08T03:00:00-04:00");
    }

    #[test]
    fn reference_time_drops_subseconds() {
        let stamped = to_reference_zone(datetime!(2024-01-15 12:00:01.987 UTC));
        assert_eq!(stamped.nanosecond(), 0);
        assert_eq!(format_date_time(&stamped).unwrap(), "2024-01-15T07:00:01-05:00");
    }

    #[test]
    fn date_time_accepts_rfc3339_and_offset_forms() {
        let zulu = parse_date_time("2024-05-01T10:15:00Z").unwrap();
        let offset = parse_date_time("2024-05-01T06:15:00-04:00").unwrap();
        assert_eq!(zulu, offset);
        assert!(parse_date_time("yesterday").is_err());
    }
}

//! Calendar days and months, as seen in the user's local calendar

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in time, in the user's local timezone
pub type Timestamp = DateTime<Local>;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Returns the first instant of a local calendar day
pub fn start_of_day(date: NaiveDate) -> Timestamp {
    let naive = date.and_time(NaiveTime::MIN);
    Local.from_local_datetime(&naive)
        .earliest()
        // Midnight falls in a DST gap in a handful of timezones
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}


/// Identifies a calendar day. Two timestamps have the same key iff they fall on the same local day.
///
/// Its textual form is `YYYY-MM-DD`, which is also the way it is serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey {
    date: NaiveDate,
}

impl DayKey {
    /// The key of the local day `timestamp` falls on
    pub fn of(timestamp: &Timestamp) -> Self {
        Self { date: timestamp.date_naive() }
    }

    /// Returns `None` for dates that do not exist (e.g. February 30th)
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    pub fn year(&self) -> i32  { self.date.year()  }
    pub fn month(&self) -> u32 { self.date.month() }
    pub fn day(&self) -> u32   { self.date.day()   }
    pub fn as_date(&self) -> NaiveDate { self.date }

    /// The month this day belongs to
    pub fn month_start(&self) -> MonthStart {
        MonthStart::of(self.date)
    }

    pub fn first_instant(&self) -> Timestamp {
        start_of_day(self.date)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.date.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)?;
        Ok(Self::from(date))
    }
}

/// Used to support serde
impl Serialize for DayKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D>(deserializer: D) -> Result<DayKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}



/// The first day of a calendar month
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthStart {
    first_day: NaiveDate,
}

impl MonthStart {
    /// The month `date` belongs to
    pub fn of(date: NaiveDate) -> Self {
        Self { first_day: date - Duration::days(date.day0() as i64) }
    }

    /// Returns `None` for an invalid month number
    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    pub fn year(&self) -> i32  { self.first_day.year()  }
    pub fn month(&self) -> u32 { self.first_day.month() }
    pub fn first_day(&self) -> NaiveDate { self.first_day }

    /// Shift by a (possibly negative) number of months.
    ///
    /// Returns `None` past the bounds of the dates chrono is able to represent.
    pub fn add_months(&self, n: i32) -> Option<Self> {
        let shifted = if n >= 0 {
            self.first_day.checked_add_months(Months::new(n as u32))
        } else {
            self.first_day.checked_sub_months(Months::new(n.unsigned_abs()))
        };
        shifted.map(|first_day| Self { first_day })
    }

    /// The next month. This saturates at the last month chrono can represent.
    pub fn succ(&self) -> Self { self.add_months(1).unwrap_or(*self)  }
    /// The previous month. This saturates at the first month chrono can represent.
    pub fn pred(&self) -> Self { self.add_months(-1).unwrap_or(*self) }

    /// Signed number of months from `self` to `other`
    pub fn months_until(&self, other: &MonthStart) -> i32 {
        (other.year() - self.year()) * 12 + other.month() as i32 - self.month() as i32
    }

    pub fn days_in_month(&self) -> u32 {
        (self.succ().first_day - self.first_day).num_days() as u32
    }

    /// The key of a given day of this month, if it exists
    pub fn day(&self, day: u32) -> Option<DayKey> {
        DayKey::from_ymd(self.year(), self.month(), day)
    }

    pub fn contains(&self, day: &DayKey) -> bool {
        day.year() == self.year() && day.month() == self.month()
    }

    /// Local midnight of the first day of this month
    pub fn first_instant(&self) -> Timestamp {
        start_of_day(self.first_day)
    }
}

impl Display for MonthStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}



/// A half-open range of time, `[start, end)`
#[derive(Clone, Debug, PartialEq)]
pub struct DateRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DateRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Every instant from the start of `first` to the end of `last` (both inclusive)
    pub fn months(first: MonthStart, last: MonthStart) -> Self {
        Self::new(first.first_instant(), last.succ().first_instant())
    }

    pub fn contains(&self, timestamp: &Timestamp) -> bool {
        &self.start <= timestamp && timestamp < &self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "[{} .. {})", self.start.format("%Y-%m-%d %H:%M"), self.end.format("%Y-%m-%d %H:%M"))
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_day_same_key() {
        let morning = Local.with_ymd_and_hms(2024, 3, 7, 0, 5, 0).unwrap();
        let evening = Local.with_ymd_and_hms(2024, 3, 7, 23, 55, 0).unwrap();
        let next = Local.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap();

        assert_eq!(DayKey::of(&morning), DayKey::of(&evening));
        assert_ne!(DayKey::of(&evening), DayKey::of(&next));
        assert_eq!(DayKey::of(&morning).to_string(), "2024-03-07");
    }

    #[test]
    fn day_key_text_form() {
        let key: DayKey = "2024-03-07".parse().unwrap();
        assert_eq!(key, DayKey::from_ymd(2024, 3, 7).unwrap());
        assert!("2024-02-30".parse::<DayKey>().is_err());
        assert!(DayKey::from_ymd(2023, 2, 29).is_none());

        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-03-07\"");
        let back: DayKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn month_arithmetic() {
        let march = MonthStart::of(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(march, MonthStart::from_ym(2024, 3).unwrap());
        assert_eq!(march.add_months(-3), MonthStart::from_ym(2023, 12));
        assert_eq!(march.add_months(10), MonthStart::from_ym(2025, 1));
        assert_eq!(MonthStart::of(NaiveDate::MAX).add_months(1), None);
        assert_eq!(MonthStart::of(NaiveDate::MIN).add_months(-1), None);
        assert_eq!(march.pred().days_in_month(), 29);
        assert_eq!(march.months_until(&MonthStart::from_ym(2023, 12).unwrap()), -3);
        assert!(march.contains(&DayKey::from_ymd(2024, 3, 31).unwrap()));
        assert!(march.day(32).is_none());
    }

    #[test]
    fn month_range_is_half_open() {
        let jan = MonthStart::from_ym(2024, 1).unwrap();
        let feb = MonthStart::from_ym(2024, 2).unwrap();
        let range = DateRange::months(jan, feb);

        assert!(range.contains(&Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(&Local.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
        assert!(range.contains(&Local.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()) == false);
    }
}

//! Calendar periods resolved against an "as of" instant.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc, Weekday};
use store::TimeWindow;

/// Which ISO week, relative to the week containing "as of".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekOffset {
    Current,
    Previous,
}

/// A slice of the sale ledger by calendar period.
///
/// Relative variants (`Weekday`, `Week`) are resolved against the "as of"
/// instant passed to [`Period::window`]; `Month` is absolute. All calendar
/// arithmetic is done in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Every sale ever recorded.
    AllTime,
    /// One day of the ISO week containing "as of".
    Weekday(Weekday),
    /// The ISO week containing "as of", or the one before it.
    Week(WeekOffset),
    /// A calendar month, `month` in 1..=12.
    Month { year: i32, month: u32 },
}

impl Period {
    /// Checked constructor for a calendar month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Period::Month { year, month })
    }

    /// The calendar month containing `as_of`.
    pub fn current_month(as_of: DateTime<Utc>) -> Self {
        Period::Month {
            year: as_of.year(),
            month: as_of.month(),
        }
    }

    /// The calendar month before the one containing `as_of`.
    ///
    /// January rolls back to December of the previous year.
    pub fn previous_month(as_of: DateTime<Utc>) -> Self {
        if as_of.month() == 1 {
            Period::Month {
                year: as_of.year() - 1,
                month: 12,
            }
        } else {
            Period::Month {
                year: as_of.year(),
                month: as_of.month() - 1,
            }
        }
    }

    /// Monday through Sunday of the current ISO week.
    pub fn weekdays() -> [Period; 7] {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .map(Period::Weekday)
    }

    /// January through December of `year`.
    pub fn months_of(year: i32) -> [Period; 12] {
        std::array::from_fn(|i| Period::Month {
            year,
            month: i as u32 + 1,
        })
    }

    /// Resolves the period to a half-open UTC window.
    ///
    /// Returns None for `AllTime` (no bound). A `Month` outside 1..=12
    /// resolves to an empty window.
    pub fn window(&self, as_of: DateTime<Utc>) -> Option<TimeWindow> {
        match *self {
            Period::AllTime => None,
            Period::Weekday(day) => {
                let date = week_start(as_of) + Duration::days(day.num_days_from_monday().into());
                Some(TimeWindow::new(
                    midnight(date),
                    midnight(date + Duration::days(1)),
                ))
            }
            Period::Week(offset) => {
                let start = match offset {
                    WeekOffset::Current => week_start(as_of),
                    WeekOffset::Previous => week_start(as_of) - Duration::days(7),
                };
                Some(TimeWindow::new(
                    midnight(start),
                    midnight(start + Duration::days(7)),
                ))
            }
            Period::Month { year, month } => {
                let window = NaiveDate::from_ymd_opt(year, month, 1).and_then(|first| {
                    let next = first.checked_add_months(Months::new(1))?;
                    Some(TimeWindow::new(midnight(first), midnight(next)))
                });
                Some(window.unwrap_or(TimeWindow::new(as_of, as_of)))
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::AllTime => write!(f, "all time"),
            Period::Weekday(day) => write!(f, "{day}"),
            Period::Week(WeekOffset::Current) => write!(f, "current week"),
            Period::Week(WeekOffset::Previous) => write!(f, "previous week"),
            Period::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

/// Monday of the ISO week containing `as_of`.
fn week_start(as_of: DateTime<Utc>) -> NaiveDate {
    let date = as_of.date_naive();
    date - Duration::days(date.weekday().num_days_from_monday().into())
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn all_time_is_unbounded() {
        assert_eq!(Period::AllTime.window(Utc::now()), None);
    }

    #[test]
    fn current_week_starts_on_monday() {
        // 2026-10-22 is a Thursday in ISO week 43.
        let as_of = at(2026, 10, 22, 15);
        let window = Period::Week(WeekOffset::Current).window(as_of).unwrap();
        assert_eq!(window.start, at(2026, 10, 19, 0));
        assert_eq!(window.end, at(2026, 10, 26, 0));
        assert_eq!(window.start.iso_week().week(), as_of.iso_week().week());
    }

    #[test]
    fn previous_week_is_the_seven_days_before() {
        let as_of = at(2026, 10, 19, 0);
        let window = Period::Week(WeekOffset::Previous).window(as_of).unwrap();
        assert_eq!(window.start, at(2026, 10, 12, 0));
        assert_eq!(window.end, at(2026, 10, 19, 0));
    }

    #[test]
    fn sunday_belongs_to_the_week_that_started_monday() {
        let as_of = at(2026, 10, 25, 23);
        let window = Period::Week(WeekOffset::Current).window(as_of).unwrap();
        assert_eq!(window.start, at(2026, 10, 19, 0));
        assert!(window.contains(as_of));
    }

    #[test]
    fn previous_week_across_year_boundary() {
        // 2027-01-01 is a Friday in ISO week 53 of 2026.
        let as_of = at(2027, 1, 1, 12);
        let current = Period::Week(WeekOffset::Current).window(as_of).unwrap();
        assert_eq!(current.start, at(2026, 12, 28, 0));
        let previous = Period::Week(WeekOffset::Previous).window(as_of).unwrap();
        assert_eq!(previous.start, at(2026, 12, 21, 0));
    }

    #[test]
    fn weekday_windows_cover_the_week() {
        let as_of = at(2026, 10, 22, 9);
        let windows: Vec<_> = Period::weekdays()
            .iter()
            .map(|p| p.window(as_of).unwrap())
            .collect();
        assert_eq!(windows[0].start, at(2026, 10, 19, 0));
        assert_eq!(windows[6].start, at(2026, 10, 25, 0));
        assert_eq!(windows[6].end, at(2026, 10, 26, 0));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn previous_month_of_january_is_december() {
        let as_of = at(2027, 1, 15, 0);
        assert_eq!(
            Period::previous_month(as_of),
            Period::Month {
                year: 2026,
                month: 12
            }
        );
        let window = Period::previous_month(as_of).window(as_of).unwrap();
        assert_eq!(window.start, at(2026, 12, 1, 0));
        assert_eq!(window.end, at(2027, 1, 1, 0));
    }

    #[test]
    fn month_windows() {
        let as_of = at(2026, 10, 19, 0);
        let months = Period::months_of(2026);
        assert_eq!(months[0], Period::Month { year: 2026, month: 1 });
        let feb = months[1].window(as_of).unwrap();
        assert_eq!(feb.start, at(2026, 2, 1, 0));
        assert_eq!(feb.end, at(2026, 3, 1, 0));
        let dec = months[11].window(as_of).unwrap();
        assert_eq!(dec.end, at(2027, 1, 1, 0));
    }

    #[test]
    fn invalid_month() {
        assert_eq!(Period::month(2026, 13), None);
        assert!(Period::month(2026, 12).is_some());

        let as_of = Utc::now();
        let window = Period::Month { year: 2026, month: 0 }.window(as_of).unwrap();
        assert!(!window.contains(as_of));
    }

    #[test]
    fn display() {
        assert_eq!(Period::Month { year: 2026, month: 3 }.to_string(), "2026-03");
        assert_eq!(Period::Weekday(Weekday::Fri).to_string(), "Fri");
        assert_eq!(Period::Week(WeekOffset::Previous).to_string(), "previous week");
    }
}

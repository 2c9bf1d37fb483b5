use chrono::NaiveDate;

use crate::parse::Weeks;

/// Inclusive span of dates to build events for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every date of the range in order. Empty when `end` is before `start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        let count = (self.end - self.start).num_days() + 1;
        (0..count).map(move |x| start + chrono::Duration::days(x))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RangeMode {
    Explicit(DateRange),
    /// From today through the last date announced by the feed.
    Upcoming,
}

impl RangeMode {
    pub fn resolve(self, weeks: &Weeks, today: NaiveDate) -> Option<DateRange> {
        match self {
            Self::Explicit(range) => Some(range),
            Self::Upcoming => weeks
                .last_date_from(today)
                .map(|end| DateRange::new(today, end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::WeekRecord;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days() {
        let range = DateRange::new(date(30, 9, 2024), date(2, 10, 2024));
        let days: Vec<_> = range.days().collect();
        assert_eq!(days, vec![date(30, 9, 2024), date(1, 10, 2024), date(2, 10, 2024)]);
        assert_eq!(DateRange::new(date(2, 10, 2024), date(2, 10, 2024)).days().count(), 1);
        assert_eq!(DateRange::new(date(3, 10, 2024), date(2, 10, 2024)).days().count(), 0);
    }

    #[test]
    fn test_resolve_upcoming() {
        let weeks: Weeks = [
            WeekRecord::new(date(16, 9, 2024), date(22, 9, 2024), ""),
            WeekRecord::new(date(23, 9, 2024), date(29, 9, 2024), ""),
        ]
        .into_iter()
        .collect();
        let today = date(18, 9, 2024);
        assert_eq!(
            RangeMode::Upcoming.resolve(&weeks, today),
            Some(DateRange::new(today, date(29, 9, 2024)))
        );
        assert_eq!(RangeMode::Upcoming.resolve(&weeks, date(1, 10, 2024)), None);
        let explicit = DateRange::new(date(1, 1, 2024), date(2, 1, 2024));
        assert_eq!(
            RangeMode::Explicit(explicit).resolve(&weeks, today),
            Some(explicit)
        );
    }
}

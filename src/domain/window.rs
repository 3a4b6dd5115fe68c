use time::macros::time;
use time::{Date, OffsetDateTime, Time, UtcOffset};

/// First instant of `date` in UTC.
pub fn start_of_day(date: Date) -> OffsetDateTime {
    date.with_time(Time::MIDNIGHT).assume_utc()
}

/// Last representable instant of `date` in UTC.
pub fn end_of_day(date: Date) -> OffsetDateTime {
    date.with_time(time!(23:59:59.999999999)).assume_utc()
}

/// A reporting window aligned to whole UTC days.
///
/// Statistics are reported per calendar day, so whatever instants the
/// caller supplies are widened to the days that contain them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl StatWindow {
    /// Builds the window covering the whole days that contain `start`
    /// and `end`. Instants with a non-UTC offset are normalized first.
    pub fn enclosing(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        let start = start.to_offset(UtcOffset::UTC);
        let end = end.to_offset(UtcOffset::UTC);
        Self {
            start: start_of_day(start.date()),
            end: end_of_day(end.date()),
        }
    }

    /// Every calendar day covered by the window, in order. An inverted
    /// window covers no days.
    pub fn days(&self) -> Vec<Date> {
        let mut out = Vec::new();
        let mut day = self.start.date();
        let last = self.end.date();
        while day <= last {
            out.push(day);
            match day.next_day() {
                Some(next) => day = next,
                None => break,
            }
        }
        out
    }
}

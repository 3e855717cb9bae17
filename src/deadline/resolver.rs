use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveTime, Offset as _, TimeDelta,
    TimeZone, Timelike, Utc, Weekday,
};
use tracing::debug;

use super::error::ParseError;
use super::normalize::normalize;
use super::token::{tokenize, Offset, Period, Token};

/// Seconds east of UTC for Asia/Tokyo, which observes no daylight saving.
pub const TOKYO_OFFSET_SECS: i32 = 9 * 3600;

/// Turns Japanese deadline text into an absolute timestamp.
///
/// Resolution is a pure function of the text and the reference "now": the
/// same pair always yields the same result. Expressions that could mean more
/// than one instant are rejected instead of guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineResolver {
    zone: FixedOffset,
    default_time: NaiveTime,
}

impl Default for DeadlineResolver {
    fn default() -> Self {
        let zone = FixedOffset::east_opt(TOKYO_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
        let default_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::new(zone, default_time)
    }
}

impl DeadlineResolver {
    /// `default_time` is used when the text names a day but no time of day.
    pub fn new(zone: FixedOffset, default_time: NaiveTime) -> Self {
        Self { zone, default_time }
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub fn default_time(&self) -> NaiveTime {
        self.default_time
    }

    pub fn resolve<Tz: TimeZone>(
        &self,
        text: &str,
        now: &DateTime<Tz>,
    ) -> Result<DateTime<FixedOffset>, ParseError> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(ParseError::Empty);
        }

        let fields = Fields::collect(tokenize(&normalized)?)?;
        let now = now.with_timezone(&self.zone);
        let resolved = self.combine(&fields, &now)?;
        debug!(text, %resolved, "deadline resolved");
        Ok(resolved)
    }

    fn combine(
        &self,
        fields: &Fields,
        now: &DateTime<FixedOffset>,
    ) -> Result<DateTime<FixedOffset>, ParseError> {
        if let Some(elapsed) = fields.elapsed {
            if fields.has_date() || fields.time.is_some() || fields.period.is_some() {
                return Err(ParseError::Conflict("offset"));
            }
            let at = now
                .checked_add_signed(elapsed)
                .ok_or(ParseError::OutOfRange)?;
            return at
                .with_second(0)
                .and_then(|at| at.with_nanosecond(0))
                .ok_or(ParseError::OutOfRange);
        }

        let today = now.date_naive();
        let date = fields.date_on(today)?;
        let clock = fields.clock()?;

        match (date, clock) {
            (None, None) => Err(ParseError::NoDeadline),
            (Some(date), clock) => {
                let (time, carry) = clock.unwrap_or((self.default_time, 0));
                self.at(date, carry, time)
            }
            // A bare time means its next occurrence.
            // Hours past midnight may still be ahead today, so the carry is
            // tried one day early as well.
            (None, Some((time, carry))) => {
                for days in [carry - 1, carry] {
                    let candidate = self.at(today, days, time)?;
                    if candidate > *now {
                        return Ok(candidate);
                    }
                }
                self.at(today, carry + 1, time)
            }
        }
    }

    fn at(
        &self,
        date: NaiveDate,
        carry: i64,
        time: NaiveTime,
    ) -> Result<DateTime<FixedOffset>, ParseError> {
        let date = add_days(date, carry)?;
        self.zone
            .from_local_datetime(&date.and_time(time))
            .single()
            .ok_or(ParseError::OutOfRange)
    }
}

#[derive(Debug, Clone, Copy)]
enum Shift {
    Days(i64),
    Months(i32),
}

#[derive(Debug, Clone, Copy)]
enum MonthDay {
    Nth(u32),
    Last,
}

/// Slots filled from the token stream; each may be filled once.
#[derive(Debug, Default)]
struct Fields {
    day: Option<i64>,
    shift: Option<Shift>,
    week: Option<i64>,
    weekday: Option<Weekday>,
    month: Option<i32>,
    month_day: Option<MonthDay>,
    year: Option<i32>,
    date: Option<(Option<i32>, u32, u32)>,
    time: Option<(u32, u32)>,
    period: Option<Period>,
    elapsed: Option<TimeDelta>,
}

fn fill<T>(slot: &mut Option<T>, value: T, name: &'static str) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::Conflict(name));
    }
    *slot = Some(value);
    Ok(())
}

impl Fields {
    fn collect(tokens: Vec<Token>) -> Result<Self, ParseError> {
        let mut f = Self::default();
        for token in tokens {
            match token {
                Token::Day(n) => fill(&mut f.day, n, "day")?,
                Token::TodayAt(period) => {
                    fill(&mut f.day, 0, "day")?;
                    fill(&mut f.period, period, "part of the day")?;
                }
                Token::Offset(offset) => f.offset(offset)?,
                Token::Week(n) => fill(&mut f.week, n, "week")?,
                Token::Weekday(weekday) => fill(&mut f.weekday, weekday, "weekday")?,
                Token::Weekend(week) => {
                    if let Some(week) = week {
                        fill(&mut f.week, week, "week")?;
                    }
                    fill(&mut f.weekday, Weekday::Sat, "weekday")?;
                }
                Token::Month(n) => fill(&mut f.month, n, "month")?,
                Token::MonthEnd(month) => {
                    if let Some(month) = month {
                        fill(&mut f.month, month, "month")?;
                    }
                    fill(&mut f.month_day, MonthDay::Last, "day of month")?;
                }
                Token::Year(n) => fill(&mut f.year, n, "year")?,
                Token::Date { year, month, day } => fill(&mut f.date, (year, month, day), "date")?,
                Token::DayOfMonth(day) => {
                    fill(&mut f.month_day, MonthDay::Nth(day), "day of month")?
                }
                Token::Time { hour, minute } => fill(&mut f.time, (hour, minute), "time")?,
                Token::Period(period) => fill(&mut f.period, period, "part of the day")?,
            }
        }
        Ok(f)
    }

    fn offset(&mut self, offset: Offset) -> Result<(), ParseError> {
        match offset {
            Offset::Minutes(n) => {
                let delta = TimeDelta::try_minutes(n).ok_or(ParseError::OutOfRange)?;
                fill(&mut self.elapsed, delta, "offset")
            }
            Offset::Hours(n) => {
                let delta = TimeDelta::try_hours(n).ok_or(ParseError::OutOfRange)?;
                fill(&mut self.elapsed, delta, "offset")
            }
            Offset::Days(n) => fill(&mut self.shift, Shift::Days(n), "offset"),
            Offset::Weeks(n) => {
                let days = n.checked_mul(7).ok_or(ParseError::OutOfRange)?;
                fill(&mut self.shift, Shift::Days(days), "offset")
            }
            Offset::Months(n) => fill(&mut self.shift, Shift::Months(n), "offset"),
            Offset::Years(n) => {
                let months = n.checked_mul(12).ok_or(ParseError::OutOfRange)?;
                fill(&mut self.shift, Shift::Months(months), "offset")
            }
        }
    }

    fn has_date(&self) -> bool {
        self.day.is_some()
            || self.shift.is_some()
            || self.week.is_some()
            || self.weekday.is_some()
            || self.month.is_some()
            || self.month_day.is_some()
            || self.year.is_some()
            || self.date.is_some()
    }

    fn date_on(&self, today: NaiveDate) -> Result<Option<NaiveDate>, ParseError> {
        let relative = self.day.map(|n| add_days(today, n)).transpose()?;
        let shifted = self
            .shift
            .map(|shift| match shift {
                Shift::Days(n) => add_days(today, n),
                Shift::Months(n) => same_day_months(today, n),
            })
            .transpose()?;
        let monthly = self.monthly(today)?;
        let yearly = match (self.year, self.date) {
            (Some(n), None) => {
                let months = n.checked_mul(12).ok_or(ParseError::OutOfRange)?;
                Some(same_day_months(today, months)?)
            }
            _ => None,
        };
        let explicit = self.explicit(today)?;

        let mut anchors = [relative, shifted, monthly, yearly, explicit].into_iter().flatten();
        let anchor = anchors.next();
        if anchors.next().is_some() {
            return Err(ParseError::Conflict("date"));
        }

        match (anchor, self.week, self.weekday) {
            (Some(_), Some(_), _) => Err(ParseError::Conflict("date")),
            (Some(date), None, Some(weekday)) if date.weekday() != weekday => {
                Err(ParseError::WeekdayMismatch)
            }
            (Some(date), None, _) => Ok(Some(date)),
            (None, week, weekday) => weekly(today, week, weekday),
        }
    }

    fn monthly(&self, today: NaiveDate) -> Result<Option<NaiveDate>, ParseError> {
        let first = first_of_month(today)?;
        match (self.month, self.month_day) {
            (None, None) => Ok(None),
            (Some(n), None) => same_day_months(today, n).map(Some),
            (n, Some(MonthDay::Last)) => {
                let first = shift_months(first, n.unwrap_or(0))?;
                last_of_month(first).map(Some)
            }
            (Some(n), Some(MonthDay::Nth(day))) => {
                let first = shift_months(first, n)?;
                NaiveDate::from_ymd_opt(first.year(), first.month(), day)
                    .map(Some)
                    .ok_or_else(|| ParseError::InvalidDate(format!("{}月{}日", first.month(), day)))
            }
            // A bare day of month is its next occurrence.
            (None, Some(MonthDay::Nth(day))) => {
                for ahead in 0..12 {
                    let first = shift_months(first, ahead)?;
                    if let Some(date) = NaiveDate::from_ymd_opt(first.year(), first.month(), day) {
                        if date >= today {
                            return Ok(Some(date));
                        }
                    }
                }
                Err(ParseError::InvalidDate(format!("{day}日")))
            }
        }
    }

    fn explicit(&self, today: NaiveDate) -> Result<Option<NaiveDate>, ParseError> {
        let Some((year, month, day)) = self.date else {
            return Ok(None);
        };
        let invalid = || ParseError::InvalidDate(format!("{month}月{day}日"));

        match (year, self.year) {
            (Some(_), Some(_)) => Err(ParseError::Conflict("year")),
            (Some(year), None) => NaiveDate::from_ymd_opt(year, month, day)
                .map(Some)
                .ok_or_else(|| ParseError::InvalidDate(format!("{year}年{month}月{day}日"))),
            (None, Some(n)) => {
                let year = today.year().checked_add(n).ok_or(ParseError::OutOfRange)?;
                NaiveDate::from_ymd_opt(year, month, day)
                    .map(Some)
                    .ok_or_else(invalid)
            }
            // Without a year the next occurrence is meant; 2月29日 may be years away.
            (None, None) => {
                for ahead in 0..8 {
                    let year = today.year() + ahead;
                    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                        if date >= today {
                            return Ok(Some(date));
                        }
                    }
                }
                Err(invalid())
            }
        }
    }

    fn clock(&self) -> Result<Option<(NaiveTime, i64)>, ParseError> {
        let (hour, minute, carry) = match (self.time, self.period) {
            (None, None) => return Ok(None),
            (None, Some(period)) => return Ok(Some((period.default_time(), 0))),
            (Some((hour, minute)), None) => (hour, minute, 0),
            (Some((hour, minute)), Some(period)) => {
                let (adjusted, carry) = period.adjust(hour)?;
                (adjusted, minute, carry)
            }
        };

        let invalid = ParseError::InvalidTime { hour, minute };
        let (hour, carry) = match hour {
            24 if minute == 0 => (0, carry + 1),
            0..=23 => (hour, carry),
            _ => return Err(invalid),
        };
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(|time| Some((time, carry)))
            .ok_or(invalid)
    }
}

impl Period {
    fn default_time(self) -> NaiveTime {
        let hour = match self {
            Period::EarlyMorning => 6,
            Period::Morning => 8,
            Period::Forenoon => 9,
            Period::Noon | Period::Daytime => 12,
            Period::Afternoon => 15,
            Period::Evening => 17,
            Period::Night => 20,
            Period::LateNight => 23,
        };
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Map an hour said within this period onto the 24-hour clock, with a
    /// day carry for hours past midnight.
    fn adjust(self, hour: u32) -> Result<(u32, i64), ParseError> {
        let mismatch = Err(ParseError::PeriodMismatch { hour });
        let ambiguous = Err(ParseError::AmbiguousHour { hour });
        match self {
            Period::EarlyMorning | Period::Morning | Period::Forenoon => match hour {
                0..=11 => Ok((hour, 0)),
                12 => ambiguous,
                _ => mismatch,
            },
            Period::Noon => match hour {
                12 => Ok((12, 0)),
                _ => mismatch,
            },
            Period::Daytime => match hour {
                1..=5 => Ok((hour + 12, 0)),
                11..=17 => Ok((hour, 0)),
                _ => mismatch,
            },
            Period::Afternoon => match hour {
                0..=11 => Ok((hour + 12, 0)),
                12 => ambiguous,
                13..=23 => Ok((hour, 0)),
                _ => mismatch,
            },
            Period::Evening => match hour {
                1..=7 => Ok((hour + 12, 0)),
                13..=19 => Ok((hour, 0)),
                _ => mismatch,
            },
            Period::Night => match hour {
                0..=4 => Ok((hour, 1)),
                6..=11 => Ok((hour + 12, 0)),
                12 | 24 => Ok((0, 1)),
                18..=23 => Ok((hour, 0)),
                _ => mismatch,
            },
            Period::LateNight => match hour {
                0..=4 => Ok((hour, 1)),
                11 => Ok((23, 0)),
                12 | 24 => Ok((0, 1)),
                22 | 23 => Ok((hour, 0)),
                _ => mismatch,
            },
        }
    }
}

fn weekly(
    today: NaiveDate,
    week: Option<i64>,
    weekday: Option<Weekday>,
) -> Result<Option<NaiveDate>, ParseError> {
    let this_weekday = i64::from(today.weekday().num_days_from_monday());
    match (week, weekday) {
        (None, None) => Ok(None),
        (Some(week), None) => add_days(today, week * 7).map(Some),
        (Some(week), Some(weekday)) => {
            let monday = add_days(today, -this_weekday)?;
            let offset = week * 7 + i64::from(weekday.num_days_from_monday());
            add_days(monday, offset).map(Some)
        }
        (None, Some(weekday)) => {
            let ahead = (i64::from(weekday.num_days_from_monday()) - this_weekday).rem_euclid(7);
            add_days(today, ahead).map(Some)
        }
    }
}

fn add_days(date: NaiveDate, n: i64) -> Result<NaiveDate, ParseError> {
    TimeDelta::try_days(n)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(ParseError::OutOfRange)
}

fn shift_months(date: NaiveDate, n: i32) -> Result<NaiveDate, ParseError> {
    let months = Months::new(n.unsigned_abs());
    let shifted = if n >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.ok_or(ParseError::OutOfRange)
}

/// Same day of month `n` months away. A day the target month lacks is an
/// error rather than being clamped to the month's end.
fn same_day_months(date: NaiveDate, n: i32) -> Result<NaiveDate, ParseError> {
    let first = shift_months(first_of_month(date)?, n)?;
    NaiveDate::from_ymd_opt(first.year(), first.month(), date.day()).ok_or_else(|| {
        ParseError::InvalidDate(format!(
            "{}年{}月{}日",
            first.year(),
            first.month(),
            date.day()
        ))
    })
}

fn first_of_month(date: NaiveDate) -> Result<NaiveDate, ParseError> {
    date.with_day(1).ok_or(ParseError::OutOfRange)
}

fn last_of_month(first: NaiveDate) -> Result<NaiveDate, ParseError> {
    shift_months(first, 1)?
        .pred_opt()
        .ok_or(ParseError::OutOfRange)
}

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Weekday;
use regex::{Captures, Regex};

use super::error::ParseError;

/// Part of the day named in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    EarlyMorning,
    Morning,
    Forenoon,
    Noon,
    Daytime,
    Afternoon,
    Evening,
    Night,
    LateNight,
}

/// Offset measured from "now" with 後/先.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Weeks(i64),
    Months(i32),
    Years(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// 今日, 明日, ... as a day offset from today.
    Day(i64),
    /// 今朝, 今夜, 今晩: today within a given period.
    TodayAt(Period),
    Offset(Offset),
    /// 今週 / 来週 / 再来週 as a week offset.
    Week(i64),
    Weekday(Weekday),
    /// 週末, optionally attached to a week word.
    Weekend(Option<i64>),
    /// 今月 / 来月 / 再来月 as a month offset.
    Month(i32),
    /// 月末, optionally attached to a month word.
    MonthEnd(Option<i32>),
    /// 今年 / 来年 / 再来年 as a year offset.
    Year(i32),
    Date {
        year: Option<i32>,
        month: u32,
        day: u32,
    },
    DayOfMonth(u32),
    Time {
        hour: u32,
        minute: u32,
    },
    Period(Period),
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    FullDate,
    Relative,
    MonthDay,
    ClockTime,
    HourTime,
    DayOfMonth,
    DayWord,
    WeekWord,
    Weekday,
    MonthWord,
    YearWord,
    Period,
    Filler,
}

static RULES: LazyLock<Vec<(Rule, Regex)>> = LazyLock::new(|| {
    [
        (
            Rule::FullDate,
            r"^([0-9]{4})\s?(?:年|/|-)\s?([0-9]{1,2})\s?(?:月|/|-)\s?([0-9]{1,2})日?",
        ),
        (
            Rule::Relative,
            r"^([0-9]+)(分|時間|日|週間|週|か月|ヶ月|カ月|ヵ月|ケ月|年)(?:後|先)",
        ),
        (Rule::MonthDay, r"^([0-9]{1,2})\s?(?:月|/)\s?([0-9]{1,2})日?"),
        (Rule::ClockTime, r"^([0-9]{1,2}):([0-9]{2})"),
        (Rule::HourTime, r"^([0-9]{1,2})時(?:([0-9]{1,2})分|(半))?"),
        (Rule::DayOfMonth, r"^([0-9]{1,2})日"),
        (
            Rule::DayWord,
            r"^(明明後日|明々後日|しあさって|明後日|あさって|明日|あした|あす|今日|本日|きょう|昨日|きのう|今朝|今夜|今晩)",
        ),
        (Rule::WeekWord, r"^(?:(再来週|来週|今週)(末)?|週末)"),
        (Rule::Weekday, r"^(?:\(([月火水木金土日])\)|([月火水木金土日])曜日?)"),
        (Rule::MonthWord, r"^(?:(再来月|来月|今月)(末)?|月末)"),
        (Rule::YearWord, r"^(再来年|来年|今年)"),
        (
            Rule::Period,
            r"^(早朝|午前|正午|午後|夕方|深夜|夜中|朝|昼|夜|晩)",
        ),
        (
            Rule::Filler,
            r"^(\s+|までに|まで|ごろ|頃|くらい|ぐらい|の|に|で|、|。|・|,)",
        ),
    ]
    .into_iter()
    .map(|(rule, pattern)| (rule, Regex::new(pattern).expect("Invalid deadline pattern")))
    .collect()
});

/// Split normalized text into tokens; fillers are dropped.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = text;

    'outer: while !rest.is_empty() {
        for (rule, regex) in RULES.iter() {
            let Some(caps) = regex.captures(rest) else {
                continue;
            };
            let matched = caps.get(0).map_or(0, |m| m.end());
            if matched == 0 {
                continue;
            }
            if let Some(token) = build(*rule, &caps)? {
                tokens.push(token);
            }
            rest = &rest[matched..];
            continue 'outer;
        }
        return Err(ParseError::Unrecognized(rest.to_string()));
    }

    Ok(tokens)
}

fn build(rule: Rule, caps: &Captures) -> Result<Option<Token>, ParseError> {
    let token = match rule {
        Rule::FullDate => Token::Date {
            year: Some(number(caps, 1)?),
            month: number(caps, 2)?,
            day: number(caps, 3)?,
        },
        Rule::MonthDay => Token::Date {
            year: None,
            month: number(caps, 1)?,
            day: number(caps, 2)?,
        },
        Rule::Relative => {
            let n: i64 = number(caps, 1)?;
            let small =
                || i32::try_from(n).map_err(|_| ParseError::NumberOutOfRange(n.to_string()));
            let offset = match &caps[2] {
                "分" => Offset::Minutes(n),
                "時間" => Offset::Hours(n),
                "日" => Offset::Days(n),
                "週間" | "週" => Offset::Weeks(n),
                "年" => Offset::Years(small()?),
                _ => Offset::Months(small()?),
            };
            Token::Offset(offset)
        }
        Rule::ClockTime => Token::Time {
            hour: number(caps, 1)?,
            minute: number(caps, 2)?,
        },
        Rule::HourTime => {
            let minute = if caps.get(3).is_some() {
                30
            } else if caps.get(2).is_some() {
                number(caps, 2)?
            } else {
                0
            };
            Token::Time {
                hour: number(caps, 1)?,
                minute,
            }
        }
        Rule::DayOfMonth => Token::DayOfMonth(number(caps, 1)?),
        Rule::DayWord => match &caps[1] {
            "今日" | "本日" | "きょう" => Token::Day(0),
            "明日" | "あした" | "あす" => Token::Day(1),
            "明後日" | "あさって" => Token::Day(2),
            "明明後日" | "明々後日" | "しあさって" => Token::Day(3),
            "昨日" | "きのう" => Token::Day(-1),
            "今朝" => Token::TodayAt(Period::Morning),
            _ => Token::TodayAt(Period::Night),
        },
        Rule::WeekWord => {
            let week = caps.get(1).map(|m| match m.as_str() {
                "今週" => 0,
                "来週" => 1,
                _ => 2,
            });
            match week {
                Some(week) if caps.get(2).is_none() => Token::Week(week),
                week => Token::Weekend(week),
            }
        }
        Rule::Weekday => {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            Token::Weekday(weekday(name))
        }
        Rule::MonthWord => {
            let month = caps.get(1).map(|m| match m.as_str() {
                "今月" => 0,
                "来月" => 1,
                _ => 2,
            });
            match month {
                Some(month) if caps.get(2).is_none() => Token::Month(month),
                month => Token::MonthEnd(month),
            }
        }
        Rule::YearWord => match &caps[1] {
            "今年" => Token::Year(0),
            "来年" => Token::Year(1),
            _ => Token::Year(2),
        },
        Rule::Period => Token::Period(match &caps[1] {
            "早朝" => Period::EarlyMorning,
            "朝" => Period::Morning,
            "午前" => Period::Forenoon,
            "正午" => Period::Noon,
            "昼" => Period::Daytime,
            "午後" => Period::Afternoon,
            "夕方" => Period::Evening,
            "深夜" | "夜中" => Period::LateNight,
            _ => Period::Night,
        }),
        Rule::Filler => return Ok(None),
    };
    Ok(Some(token))
}

fn number<T: FromStr>(caps: &Captures, index: usize) -> Result<T, ParseError> {
    let text = caps.get(index).map_or("", |m| m.as_str());
    text.parse()
        .map_err(|_| ParseError::NumberOutOfRange(text.to_string()))
}

fn weekday(name: &str) -> Weekday {
    match name {
        "月" => Weekday::Mon,
        "火" => Weekday::Tue,
        "水" => Weekday::Wed,
        "木" => Weekday::Thu,
        "金" => Weekday::Fri,
        "土" => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_day_period_and_time() {
        let tokens = tokenize("明日の朝9時").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Day(1),
                Token::Period(Period::Morning),
                Token::Time { hour: 9, minute: 0 },
            ]
        );
    }

    #[test]
    fn relative_offsets_win_over_plain_units() {
        assert_eq!(tokenize("3日後").unwrap(), vec![Token::Offset(Offset::Days(3))]);
        assert_eq!(tokenize("2時間後").unwrap(), vec![Token::Offset(Offset::Hours(2))]);
        assert_eq!(tokenize("1ヶ月後").unwrap(), vec![Token::Offset(Offset::Months(1))]);
    }

    #[test]
    fn week_words_and_weekend() {
        assert_eq!(
            tokenize("来週の金曜日").unwrap(),
            vec![Token::Week(1), Token::Weekday(Weekday::Fri)]
        );
        assert_eq!(tokenize("週末").unwrap(), vec![Token::Weekend(None)]);
        assert_eq!(tokenize("来週末").unwrap(), vec![Token::Weekend(Some(1))]);
    }

    #[test]
    fn half_hour_and_minutes() {
        assert_eq!(tokenize("3時半").unwrap(), vec![Token::Time { hour: 3, minute: 30 }]);
        assert_eq!(tokenize("15時45分").unwrap(), vec![Token::Time { hour: 15, minute: 45 }]);
    }

    #[test]
    fn reports_the_unrecognized_tail() {
        let err = tokenize("明日てきとう").unwrap_err();
        assert_eq!(err, ParseError::Unrecognized("てきとう".to_string()));
    }

    #[test]
    fn only_ascii_digits_are_numbers() {
        let err = tokenize("٣日後").unwrap_err();
        assert_eq!(err, ParseError::Unrecognized("٣日後".to_string()));
    }
}

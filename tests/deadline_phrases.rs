use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Utc};
use reminder_assistant::{DeadlineResolver, ParseError};

/// Sunday 2024-03-10 05:30 UTC, which is 14:30 in Tokyo.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 5, 30, 0).unwrap()
}

fn resolve(resolver: &DeadlineResolver, text: &str) -> Result<String, ParseError> {
    resolver
        .resolve(text, &now())
        .map(|at| at.format("%Y-%m-%d %H:%M %:z").to_string())
}

#[test]
fn phrases_resolve_in_tokyo_time() {
    let resolver = DeadlineResolver::default();
    let cases = [
        ("明日の朝9時", "2024-03-11 09:00 +09:00"),
        ("今夜8時", "2024-03-10 20:00 +09:00"),
        ("明後日の午後3時半", "2024-03-12 15:30 +09:00"),
        ("３日後", "2024-03-13 09:00 +09:00"),
        ("来週の金曜日の夕方", "2024-03-15 17:00 +09:00"),
        ("１２月２５日　１８：００", "2024-12-25 18:00 +09:00"),
        ("月末までに", "2024-03-31 09:00 +09:00"),
        ("15分後", "2024-03-10 14:45 +09:00"),
    ];
    for (text, expected) in cases {
        assert_eq!(resolve(&resolver, text).as_deref(), Ok(expected), "{text}");
    }
}

#[test]
fn result_is_in_the_resolver_zone() {
    let utc = FixedOffset::east_opt(0).unwrap();
    let resolver = DeadlineResolver::new(utc, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(
        resolve(&resolver, "明日").as_deref(),
        Ok("2024-03-11 09:00 +00:00")
    );
}

#[test]
fn unresolvable_phrases_fail() {
    let resolver = DeadlineResolver::default();
    assert!(matches!(
        resolve(&resolver, "てきとうな時間"),
        Err(ParseError::Unrecognized(_))
    ));
    assert_eq!(resolve(&resolver, ""), Err(ParseError::Empty));
    assert_eq!(
        resolve(&resolver, "明日の3/15"),
        Err(ParseError::Conflict("date"))
    );
}

use chrono::{DateTime, FixedOffset, TimeZone};
use reminder_assistant::deadline::TOKYO_OFFSET_SECS;
use reminder_assistant::feedback::{self, FollowUp};
use reminder_assistant::submission::{Draft, InputField, Phase};
use reminder_assistant::{
    AccessState, DeadlineResolver, FailureKind, MemoryService, ReminderStore,
    SubmissionController, SubmissionOutcome,
};

fn tokyo() -> FixedOffset {
    FixedOffset::east_opt(TOKYO_OFFSET_SECS).unwrap()
}

/// Sunday 2024-03-10 14:30 in Tokyo.
fn now() -> DateTime<FixedOffset> {
    tokyo().with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap()
}

fn store() -> ReminderStore<MemoryService> {
    ReminderStore::new(MemoryService::sample(), tokyo())
}

fn with_draft(title: &str, deadline: &str, notes: &str) -> SubmissionController {
    let mut controller = SubmissionController::new(DeadlineResolver::default());
    *controller.draft_mut() = Draft {
        title: title.to_string(),
        deadline: deadline.to_string(),
        notes: notes.to_string(),
    };
    controller
}

#[tokio::test]
async fn creates_tomorrow_morning_and_resets_input() {
    let store = store();
    let mut controller = with_draft("牛乳を買う", "明日の朝9時", "");

    let outcome = controller.submit(&store, None, &now()).await;

    let expected = tokyo().with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            title: "牛乳を買う".to_string(),
            deadline: expected,
        }
    );
    assert_eq!(controller.phase(), Phase::Succeeded);
    assert!(controller.draft().is_empty());

    let saved = store.service().saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].list_id, "list-c");
    assert_eq!(saved[0].due, expected);
    assert_eq!(saved[0].alarm, expected);
    assert_eq!(saved[0].notes, None);

    let shown = feedback::for_outcome(&outcome);
    assert_eq!(shown.message, "牛乳を買う\n(2024年3月11日 09:00)");
}

#[tokio::test]
async fn unreadable_deadline_keeps_the_input() {
    let store = store();
    let mut controller = with_draft("会議", "てきとうな時間", "メモ");

    let outcome = controller.submit(&store, None, &now()).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::DateParseFailed));
    assert_eq!(controller.phase(), Phase::Failed(FailureKind::DateParseFailed));
    assert_eq!(controller.draft().title, "会議");
    assert_eq!(controller.draft().deadline, "てきとうな時間");
    assert_eq!(controller.draft().notes, "メモ");
    assert!(store.service().saved().is_empty());
}

#[tokio::test]
async fn missing_destination_list_is_reported() {
    let store = store();
    let mut controller = with_draft("掃除", "今夜8時", "");

    let outcome = controller.submit(&store, Some("list-x"), &now()).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::ListNotFound));
    assert_eq!(
        feedback::for_outcome(&outcome).follow_up,
        Some(FollowUp::AppSettings)
    );
    assert_eq!(controller.draft().title, "掃除");
    assert!(store.service().saved().is_empty());
}

#[tokio::test]
async fn denied_access_fails_before_parsing() {
    let store = store();
    store.service().set_access(AccessState::Denied);
    // Unparseable on purpose: a parse failure here would mean the resolver ran.
    let mut controller = with_draft("会議", "てきとうな時間", "");

    let outcome = controller.submit(&store, None, &now()).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::AccessDenied));
    assert_eq!(
        feedback::for_outcome(&outcome).follow_up,
        Some(FollowUp::PrivacySettings)
    );
}

#[tokio::test]
async fn partial_access_is_not_enough() {
    let store = store();
    store.service().set_access(AccessState::PartialAccess);
    let mut controller = with_draft("掃除", "今夜8時", "");

    let outcome = controller.submit(&store, None, &now()).await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::AccessDenied));
}

#[tokio::test]
async fn empty_fields_are_rejected_in_order() {
    let store = store();

    let mut controller = with_draft("  ", "", "");
    let outcome = controller.submit(&store, None, &now()).await;
    assert_eq!(
        outcome.failure_kind(),
        Some(FailureKind::InputInvalid(InputField::Title))
    );

    let mut controller = with_draft("掃除", " ", "");
    let outcome = controller.submit(&store, None, &now()).await;
    assert_eq!(
        outcome.failure_kind(),
        Some(FailureKind::InputInvalid(InputField::Deadline))
    );
}

#[tokio::test]
async fn corrected_input_can_be_resubmitted() {
    let store = store();
    let mut controller = with_draft("会議", "てきとうな時間", "メモ");
    let first = controller.submit(&store, None, &now()).await;
    assert!(!first.is_success());

    controller.draft_mut().deadline = "来週の月曜日 10:00".to_string();
    let second = controller.submit(&store, None, &now()).await;

    assert!(second.is_success());
    let saved = store.service().saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(
        saved[0].due,
        tokyo().with_ymd_and_hms(2024, 3, 11, 10, 0, 0).unwrap()
    );
    assert_eq!(saved[0].notes.as_deref(), Some("メモ"));
}

#[tokio::test]
async fn save_failure_is_shown_as_unexpected_error() {
    let store = store();
    store.service().fail_saves(Some("disk full"));
    let mut controller = with_draft("掃除", "今夜8時", "");

    let outcome = controller.submit(&store, None, &now()).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::CreateFailed));
    assert_eq!(
        feedback::for_outcome(&outcome).message,
        "予期せぬエラーが発生しました。"
    );
    assert_eq!(controller.draft().title, "掃除");
}

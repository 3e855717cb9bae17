use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use reminder_assistant::deadline::TOKYO_OFFSET_SECS;
use reminder_assistant::{
    AccessState, DeadlineResolver, MemoryService, ReminderList, ReminderRequest, ReminderStore,
    StoreError,
};

fn tokyo() -> FixedOffset {
    FixedOffset::east_opt(TOKYO_OFFSET_SECS).unwrap()
}

fn deadline() -> DateTime<FixedOffset> {
    tokyo().with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap()
}

fn store(service: MemoryService) -> ReminderStore<MemoryService> {
    ReminderStore::new(service, tokyo())
}

#[tokio::test]
async fn absent_destination_uses_the_default_list() {
    let store = store(MemoryService::sample());
    let record = store
        .create(&ReminderRequest::new("牛乳を買う", "明日の朝9時"), deadline())
        .await
        .unwrap();

    assert_eq!(record.list_id, "list-c");
    assert_eq!(record.notes, None);
    assert_eq!(store.service().saved(), vec![record]);
}

#[tokio::test]
async fn default_list_is_read_at_call_time() {
    let store = store(MemoryService::sample());
    store.service().set_default(Some("list-e"));

    let record = store
        .create(&ReminderRequest::new("掃除", "今夜8時"), deadline())
        .await
        .unwrap();
    assert_eq!(record.list_id, "list-e");
}

#[tokio::test]
async fn missing_default_list_fails() {
    let store = store(MemoryService::sample());
    store.service().set_default(None);

    let err = store
        .create(&ReminderRequest::new("掃除", "今夜8時"), deadline())
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::NoDefaultList);
    assert_eq!(store.default_list(), Err(StoreError::NoDefaultList));
}

#[tokio::test]
async fn unknown_destination_never_falls_back() {
    let store = store(MemoryService::sample());
    let request = ReminderRequest::new("掃除", "今夜8時").with_destination("list-x");

    let err = store.create(&request, deadline()).await.unwrap_err();
    assert_eq!(err, StoreError::ListNotFound("list-x".to_string()));
    assert!(store.service().saved().is_empty());
}

#[tokio::test]
async fn removed_list_is_not_found_on_the_next_call() {
    let store = store(MemoryService::sample());
    let request = ReminderRequest::new("掃除", "今夜8時").with_destination("list-b");
    store.create(&request, deadline()).await.unwrap();

    store.service().remove_list("list-b");
    let err = store.create(&request, deadline()).await.unwrap_err();
    assert_eq!(err, StoreError::ListNotFound("list-b".to_string()));
}

#[tokio::test]
async fn duplicate_list_ids_are_rejected() {
    let store = store(MemoryService::sample());
    store
        .service()
        .add_list(ReminderList::new("list-a", "もう一つのリストA"));
    let request = ReminderRequest::new("掃除", "今夜8時").with_destination("list-a");

    let err = store.create(&request, deadline()).await.unwrap_err();
    assert_eq!(err, StoreError::DuplicateListId("list-a".to_string()));
}

#[tokio::test]
async fn operations_require_full_access() {
    for state in [
        AccessState::Denied,
        AccessState::PartialAccess,
        AccessState::NotDetermined,
    ] {
        let store = store(MemoryService::sample());
        store.service().set_access(state);

        assert_eq!(store.list_all(), Err(StoreError::AccessDenied));
        assert_eq!(store.default_list(), Err(StoreError::AccessDenied));
        let err = store
            .create(&ReminderRequest::new("掃除", "今夜8時"), deadline())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::AccessDenied);
    }
}

#[tokio::test]
async fn save_failures_become_create_failed() {
    let store = store(MemoryService::sample());
    store.service().fail_saves(Some("disk full"));

    let err = store
        .create(&ReminderRequest::new("掃除", "今夜8時"), deadline())
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::CreateFailed("disk full".to_string()));
}

#[tokio::test]
async fn due_and_alarm_are_the_resolved_instant_in_store_zone() {
    let store = store(MemoryService::sample());
    let now = tokyo().with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap();
    let resolved = DeadlineResolver::default()
        .resolve("明日の朝9時", &now)
        .unwrap();

    let request = ReminderRequest::new("牛乳を買う", "明日の朝9時").with_notes("2本");
    let record = store.create(&request, resolved).await.unwrap();

    assert_eq!(record.due, resolved);
    assert_eq!(record.alarm, resolved);
    assert_eq!(record.due.offset(), &tokyo());
    assert_eq!(record.notes.as_deref(), Some("2本"));
}

#[tokio::test]
async fn deadline_in_another_zone_is_recorded_in_store_zone() {
    let store = store(MemoryService::sample());
    let utc = Utc
        .with_ymd_and_hms(2024, 3, 11, 0, 0, 0)
        .unwrap()
        .fixed_offset();

    let record = store
        .create(&ReminderRequest::new("掃除", "明日の朝9時"), utc)
        .await
        .unwrap();
    assert_eq!(record.due, deadline());
    assert_eq!(record.due.offset(), &tokyo());
}

#[tokio::test]
async fn request_access_prompts_only_once() {
    let store = store(MemoryService::sample().undecided(AccessState::FullAccess));
    assert_eq!(store.access_state(), AccessState::NotDetermined);

    assert_eq!(store.request_access().await, Ok(AccessState::FullAccess));
    assert_eq!(store.request_access().await, Ok(AccessState::FullAccess));
    assert_eq!(store.service().prompts(), 1);
}

#[tokio::test]
async fn request_access_returns_a_prior_denial() {
    let store = store(MemoryService::sample());
    store.service().set_access(AccessState::Denied);

    assert_eq!(store.request_access().await, Ok(AccessState::Denied));
    assert_eq!(store.service().prompts(), 0);
}

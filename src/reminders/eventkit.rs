use async_trait::async_trait;
use block2::RcBlock;
use chrono::{DateTime, FixedOffset};
use objc2::rc::Retained;
use objc2::runtime::Bool;
use objc2_event_kit::{
    EKAlarm, EKAuthorizationStatus, EKCalendar, EKEntityType, EKEventStore, EKReminder,
};
use objc2_foundation::{NSCalendar, NSDate, NSError, NSString, NSTimeZone};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::access::AccessState;
use super::error::{Result, StoreError};
use super::list::ReminderList;
use super::reminder::ReminderRecord;
use super::service::ReminderService;

/// Seconds between Unix epoch (1970-01-01) and NSDate reference date (2001-01-01)
const NSDATE_UNIX_OFFSET: f64 = 978307200.0;

/// The macOS reminders store, reached through EventKit.
pub struct EventKitService {
    store: Retained<EKEventStore>,
}

impl EventKitService {
    pub fn new() -> Self {
        let store = unsafe { EKEventStore::new() };
        Self { store }
    }

    fn authorization_status() -> EKAuthorizationStatus {
        unsafe { EKEventStore::authorizationStatusForEntityType(EKEntityType::Reminder) }
    }

    fn calendar(&self, id: &str) -> Option<Retained<EKCalendar>> {
        unsafe { self.store.calendarWithIdentifier(&NSString::from_str(id)) }
    }
}

impl Default for EventKitService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ReminderService for EventKitService {
    fn name(&self) -> &str {
        "eventkit"
    }

    fn access_state(&self) -> AccessState {
        match Self::authorization_status() {
            EKAuthorizationStatus::FullAccess => AccessState::FullAccess,
            EKAuthorizationStatus::WriteOnly => AccessState::PartialAccess,
            EKAuthorizationStatus::Denied | EKAuthorizationStatus::Restricted => {
                AccessState::Denied
            }
            _ => AccessState::NotDetermined,
        }
    }

    async fn request_access(&self) -> Result<AccessState> {
        let current = self.access_state();
        if current.is_decided() {
            return Ok(current);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let block = RcBlock::new(move |granted: Bool, error: *mut NSError| {
            let message = unsafe { error.as_ref() }
                .map(|e| e.localizedDescription().to_string());
            let _ = tx.send((granted.as_bool(), message));
        });

        unsafe {
            self.store
                .requestFullAccessToRemindersWithCompletion(&*block as *const _ as *mut _);
        }

        let (granted, message) = rx.recv().await.ok_or_else(|| {
            StoreError::RequestAccessFailed("no response from the permission prompt".to_string())
        })?;
        if let Some(message) = message {
            warn!(%message, "reminders permission prompt reported an error");
            if !granted {
                return Err(StoreError::RequestAccessFailed(message));
            }
        }
        debug!(granted, "reminders permission prompt answered");
        Ok(self.access_state())
    }

    fn lists(&self) -> Vec<ReminderList> {
        let calendars = unsafe { self.store.calendarsForEntityType(EKEntityType::Reminder) };

        let mut lists = Vec::new();
        let count = calendars.len();

        for i in 0..count {
            let cal = calendars.objectAtIndex(i);
            lists.push(convert_calendar(&cal));
        }

        lists
    }

    fn default_list(&self) -> Option<ReminderList> {
        unsafe { self.store.defaultCalendarForNewReminders() }.map(|cal| convert_calendar(&cal))
    }

    async fn save(&self, record: &ReminderRecord) -> Result<()> {
        let calendar = self
            .calendar(&record.list_id)
            .ok_or_else(|| StoreError::ListNotFound(record.list_id.clone()))?;

        let reminder = unsafe { EKReminder::reminderWithEventStore(&self.store) };
        let alarm_at = datetime_to_nsdate(&record.alarm);
        unsafe {
            reminder.setTitle(Some(&NSString::from_str(&record.title)));
            let notes = record.notes.as_deref().map(NSString::from_str);
            reminder.setNotes(notes.as_deref());

            let offset = record.due.offset().local_minus_utc();
            let zone = NSTimeZone::timeZoneForSecondsFromGMT(offset as _);
            let components = NSCalendar::currentCalendar()
                .componentsInTimeZone_fromDate(&zone, &datetime_to_nsdate(&record.due));
            reminder.setDueDateComponents(Some(&components));

            reminder.addAlarm(&EKAlarm::alarmWithAbsoluteDate(&alarm_at));
            reminder.setCalendar(Some(&calendar));
        }

        unsafe { self.store.saveReminder_commit_error(&reminder, true) }
            .map_err(|e| StoreError::CreateFailed(e.localizedDescription().to_string()))
    }
}

fn convert_calendar(cal: &EKCalendar) -> ReminderList {
    let id = unsafe { cal.calendarIdentifier().to_string() };
    let display_name = unsafe { cal.title().to_string() };
    ReminderList { id, display_name }
}

fn datetime_to_nsdate(dt: &DateTime<FixedOffset>) -> Retained<NSDate> {
    let unix_ts = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_millis()) / 1000.0;
    let nsdate_ts = unix_ts - NSDATE_UNIX_OFFSET;
    NSDate::dateWithTimeIntervalSinceReferenceDate(nsdate_ts)
}

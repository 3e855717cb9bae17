use std::cell::RefCell;

use async_trait::async_trait;
use tracing::debug;

use super::access::AccessState;
use super::error::{Result, StoreError};
use super::list::ReminderList;
use super::reminder::ReminderRecord;
use super::service::ReminderService;

#[derive(Debug)]
struct State {
    access: AccessState,
    answer: AccessState,
    prompts: usize,
    lists: Vec<ReminderList>,
    default_id: Option<String>,
    saved: Vec<ReminderRecord>,
    save_error: Option<String>,
}

/// A reminders service held in memory.
///
/// Serves as the backend where the platform store is unavailable and as a
/// scriptable stand-in for tests: access answers, list churn and save
/// failures can all be set from outside.
#[derive(Debug)]
pub struct MemoryService {
    state: RefCell<State>,
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl MemoryService {
    /// Starts with access granted.
    pub fn new(lists: Vec<ReminderList>, default_id: Option<&str>) -> Self {
        Self {
            state: RefCell::new(State {
                access: AccessState::FullAccess,
                answer: AccessState::FullAccess,
                prompts: 0,
                lists,
                default_id: default_id.map(str::to_string),
                saved: Vec::new(),
                save_error: None,
            }),
        }
    }

    /// Five lists with the third as default.
    pub fn sample() -> Self {
        let lists = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|c| ReminderList::new(format!("list-{}", c.to_lowercase()), format!("リスト{c}")))
            .collect();
        Self::new(lists, Some("list-c"))
    }

    /// Start undecided; the next prompt is answered with `answer`.
    pub fn undecided(mut self, answer: AccessState) -> Self {
        let state = self.state.get_mut();
        state.access = AccessState::NotDetermined;
        state.answer = answer;
        self
    }

    pub fn set_access(&self, access: AccessState) {
        self.state.borrow_mut().access = access;
    }

    pub fn set_default(&self, id: Option<&str>) {
        self.state.borrow_mut().default_id = id.map(str::to_string);
    }

    pub fn add_list(&self, list: ReminderList) {
        self.state.borrow_mut().lists.push(list);
    }

    pub fn remove_list(&self, id: &str) {
        self.state.borrow_mut().lists.retain(|list| list.id != id);
    }

    /// Make every following save fail with `reason`, or succeed again.
    pub fn fail_saves(&self, reason: Option<&str>) {
        self.state.borrow_mut().save_error = reason.map(str::to_string);
    }

    pub fn saved(&self) -> Vec<ReminderRecord> {
        self.state.borrow().saved.clone()
    }

    /// How many times the user was actually prompted.
    pub fn prompts(&self) -> usize {
        self.state.borrow().prompts
    }
}

#[async_trait(?Send)]
impl ReminderService for MemoryService {
    fn name(&self) -> &str {
        "memory"
    }

    fn access_state(&self) -> AccessState {
        self.state.borrow().access
    }

    async fn request_access(&self) -> Result<AccessState> {
        let mut state = self.state.borrow_mut();
        if state.access == AccessState::NotDetermined {
            state.prompts += 1;
            state.access = state.answer;
        }
        Ok(state.access)
    }

    fn lists(&self) -> Vec<ReminderList> {
        self.state.borrow().lists.clone()
    }

    fn default_list(&self) -> Option<ReminderList> {
        let state = self.state.borrow();
        let id = state.default_id.as_deref()?;
        state.lists.iter().find(|list| list.id == id).cloned()
    }

    async fn save(&self, record: &ReminderRecord) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = &state.save_error {
            return Err(StoreError::CreateFailed(reason.clone()));
        }
        debug!(list = %record.list_id, title = %record.title, "stored reminder in memory");
        state.saved.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_a_default() {
        let service = MemoryService::sample();
        assert_eq!(service.lists().len(), 5);
        assert_eq!(service.default_list().unwrap().display_name, "リストC");
    }

    #[test]
    fn default_disappears_with_its_list() {
        let service = MemoryService::sample();
        service.remove_list("list-c");
        assert!(service.default_list().is_none());
    }

    #[tokio::test]
    async fn prompts_only_while_undecided() {
        let service = MemoryService::sample().undecided(AccessState::Denied);
        assert_eq!(service.request_access().await.unwrap(), AccessState::Denied);
        assert_eq!(service.request_access().await.unwrap(), AccessState::Denied);
        assert_eq!(service.prompts(), 1);
    }
}

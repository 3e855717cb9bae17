use chrono::{DateTime, FixedOffset};

/// Absolute timestamp a deadline text resolved to.
pub type ResolvedDeadline = DateTime<FixedOffset>;

/// One "create reminder" submission as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub title: String,
    pub deadline_text: String,
    pub notes: Option<String>,
    pub destination_list_id: Option<String>,
}

impl ReminderRequest {
    pub fn new(title: impl Into<String>, deadline_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            deadline_text: deadline_text.into(),
            notes: None,
            destination_list_id: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_destination(mut self, list_id: impl Into<String>) -> Self {
        self.destination_list_id = Some(list_id.into());
        self
    }

    /// Notes, with an empty string treated as absent.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|notes| !notes.is_empty())
    }

    /// Destination list id, with an empty string meaning "default list".
    pub fn destination(&self) -> Option<&str> {
        self.destination_list_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

/// The record handed to the platform for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRecord {
    pub list_id: String,
    pub title: String,
    pub notes: Option<String>,
    /// Due date, expressed in the store's fixed zone.
    pub due: ResolvedDeadline,
    /// The single alarm; always the same instant as `due`.
    pub alarm: ResolvedDeadline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_notes_and_destination_are_absent() {
        let request = ReminderRequest::new("掃除", "今夜8時")
            .with_notes("")
            .with_destination("");
        assert_eq!(request.notes(), None);
        assert_eq!(request.destination(), None);
    }

    #[test]
    fn non_empty_fields_pass_through() {
        let request = ReminderRequest::new("会議", "明日")
            .with_notes("メモ")
            .with_destination("list-a");
        assert_eq!(request.notes(), Some("メモ"));
        assert_eq!(request.destination(), Some("list-a"));
    }
}

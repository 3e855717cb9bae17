/// A named container of reminders, as enumerated from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderList {
    pub id: String,
    pub display_name: String,
}

impl ReminderList {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

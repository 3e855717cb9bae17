pub mod alert;
pub mod form;
pub mod settings;
pub mod status_bar;

pub use alert::FloatingAlert;
pub use form::ReminderForm;
pub use settings::SettingsView;
pub use status_bar::StatusBar;

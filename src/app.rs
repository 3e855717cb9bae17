use std::path::PathBuf;

use chrono::Local;
use color_eyre::Result;
use reminder_assistant::feedback::{self, Feedback, FollowUp};
use reminder_assistant::submission::Draft;
use reminder_assistant::{
    AccessState, ReminderService, ReminderStore, Settings, SubmissionController,
    SubmissionOutcome,
};
use tracing::{info, warn};

use crate::components::settings::{ListSource, SettingsPanel};

pub type Store = ReminderStore<Box<dyn ReminderService>>;

/// Which form field has the keyboard. `None` means no field is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Title,
    Deadline,
    Notes,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Title => Focus::Deadline,
            Focus::Deadline => Focus::Notes,
            Focus::Notes => Focus::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Focus::Title => Focus::Notes,
            Focus::Deadline => Focus::Title,
            Focus::Notes => Focus::Deadline,
        }
    }
}

pub struct App {
    pub running: bool,
    pub focus: Option<Focus>,
    pub access: AccessState,
    pub alert: Option<Feedback>,
    pub settings_panel: Option<SettingsPanel>,
    pub status_message: Option<String>,
    /// Display name of the list new reminders go to.
    pub destination_label: String,
    settings: Settings,
    config_path: Option<PathBuf>,
    controller: SubmissionController,
    store: Store,
}

impl App {
    pub async fn new(
        store: Store,
        settings: Settings,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let controller = SubmissionController::new(settings.resolver()?);
        let access = match store.request_access().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "requesting reminders access failed");
                store.access_state()
            }
        };
        let focus = settings.auto_focus.then_some(Focus::Title);

        let mut app = Self {
            running: true,
            focus,
            access,
            alert: None,
            settings_panel: None,
            status_message: None,
            destination_label: String::new(),
            settings,
            config_path,
            controller,
            store,
        };
        app.refresh_destination();
        Ok(app)
    }

    pub fn draft(&self) -> &Draft {
        self.controller.draft()
    }

    pub fn backend_name(&self) -> &str {
        self.store.service().name()
    }

    /// What the deadline field currently resolves to, for the live hint.
    pub fn deadline_preview(&self) -> Option<std::result::Result<String, String>> {
        let text = self.draft().deadline.trim();
        if text.is_empty() {
            return None;
        }
        let preview = self
            .controller
            .resolver()
            .resolve(text, &Local::now())
            .map(|at| at.format("%Y年%-m月%-d日 %H:%M").to_string())
            .map_err(|e| e.to_string());
        Some(preview)
    }

    // ── Form editing ──

    pub fn focus_next(&mut self) {
        self.focus = Some(self.focus.map_or(Focus::Title, |f| f.next()));
    }

    pub fn focus_prev(&mut self) {
        self.focus = Some(self.focus.map_or(Focus::Notes, |f| f.prev()));
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        let draft = self.controller.draft_mut();
        match self.focus? {
            Focus::Title => Some(&mut draft.title),
            Focus::Deadline => Some(&mut draft.deadline),
            Focus::Notes => Some(&mut draft.notes),
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.field_mut() {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.field_mut() {
            field.pop();
        }
    }

    /// Return key: title moves on to deadline, deadline submits, notes
    /// takes a newline. Returns whether a submission should run.
    pub fn on_return(&mut self) -> bool {
        match self.focus {
            Some(Focus::Title) => {
                self.focus = Some(Focus::Deadline);
                false
            }
            Some(Focus::Deadline) | None => true,
            Some(Focus::Notes) => {
                self.input_char('\n');
                false
            }
        }
    }

    // ── Submission ──

    pub async fn submit(&mut self) {
        // Dropping focus first keeps keystrokes out of the draft mid-submit.
        self.clear_focus();
        self.access = self.store.access_state();

        let outcome = self
            .controller
            .submit(&self.store, self.settings.destination(), &Local::now())
            .await;
        if let SubmissionOutcome::Failure { detail: Some(detail), .. } = &outcome {
            self.status_message = Some(detail.clone());
        }
        self.alert = Some(feedback::for_outcome(&outcome));
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Act on the alert's follow-up, if it has one.
    pub fn follow_up(&mut self) {
        let Some(alert) = self.alert.take() else {
            return;
        };
        match alert.follow_up {
            Some(FollowUp::AppSettings) => self.open_settings(),
            Some(FollowUp::PrivacySettings) => self.open_privacy_settings(),
            None => {}
        }
    }

    fn open_privacy_settings(&mut self) {
        #[cfg(target_os = "macos")]
        {
            let url = "x-apple.systempreferences:com.apple.preference.security?Privacy_Reminders";
            match std::process::Command::new("open").arg(url).spawn() {
                Ok(_) => return,
                Err(e) => warn!(error = %e, "could not open System Settings"),
            }
        }
        self.status_message =
            Some("System Settings > Privacy & Security > Reminders".to_string());
    }

    // ── Settings ──

    pub fn open_settings(&mut self) {
        let source = match (self.store.default_list(), self.store.list_all()) {
            (Ok(default), Ok(lists)) => {
                if self.settings.reconcile(&lists) {
                    self.persist_settings();
                }
                ListSource::Loaded {
                    default_name: default.display_name,
                    lists,
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "cannot read reminder lists for settings");
                ListSource::Unavailable
            }
        };
        self.settings_panel = Some(SettingsPanel::new(source, &self.settings));
    }

    pub fn close_settings(&mut self) {
        let Some(panel) = self.settings_panel.take() else {
            return;
        };
        if panel.apply(&mut self.settings) {
            info!(
                destination = %self.settings.destination_list_id,
                auto_focus = self.settings.auto_focus,
                "settings changed"
            );
            self.persist_settings();
        }
        self.refresh_destination();
    }

    pub fn settings_panel_mut(&mut self) -> Option<&mut SettingsPanel> {
        self.settings_panel.as_mut()
    }

    fn persist_settings(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.settings.save(path) {
            warn!(error = %e, "saving settings failed");
            self.status_message = Some(format!("Settings not saved: {e}"));
        }
    }

    fn refresh_destination(&mut self) {
        self.destination_label = match self.settings.destination() {
            None => match self.store.default_list() {
                Ok(list) => format!("{} (デフォルト)", list.display_name),
                Err(_) => "デフォルトリスト".to_string(),
            },
            Some(id) => self
                .store
                .list_all()
                .ok()
                .and_then(|lists| lists.into_iter().find(|list| list.id == id))
                .map(|list| list.display_name)
                .unwrap_or_else(|| id.to_string()),
        };
    }
}

mod app;
mod components;
mod event;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use app::{App, Store};
use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use reminder_assistant::{
    config, feedback, logging, MemoryService, ReminderService, ReminderStore, Settings,
    SubmissionController, SubmissionOutcome,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "reminder-assistant",
    version,
    about = "Create reminders from Japanese deadline phrases"
)]
struct Cli {
    /// Reminders backend
    #[arg(long, value_enum, default_value_t = Backend::platform_default())]
    backend: Backend,

    /// Config file (default: <config dir>/reminder-assistant/config.toml)
    #[arg(long, env = "REMINDER_ASSISTANT_CONFIG")]
    config: Option<PathBuf>,

    /// Log file (default: <data dir>/reminder-assistant/reminder-assistant.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the date and time a deadline phrase resolves to
    Resolve {
        text: String,
        /// Reference time instead of the current time (RFC 3339)
        #[arg(long)]
        now: Option<DateTime<FixedOffset>>,
    },
    /// Show the reminder lists and which one is the default
    Lists,
    /// Create one reminder without opening the form
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        deadline: String,
        #[arg(long)]
        notes: Option<String>,
        /// Destination list id (default: configured list, then the default list)
        #[arg(long)]
        list: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    Eventkit,
    Memory,
}

impl Backend {
    fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Backend::Eventkit
        } else {
            Backend::Memory
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(config::default_path);
    let settings = match &config_path {
        Some(path) => Settings::load(path).wrap_err("loading settings")?,
        None => Settings::default(),
    };
    if let Some(log_path) = cli.log_file.clone().or_else(logging::default_path) {
        logging::init(&log_path, &settings.log_level)
            .wrap_err_with(|| format!("opening log file {}", log_path.display()))?;
    }
    info!(backend = ?cli.backend, "starting");

    match cli.command {
        Some(Command::Resolve { text, now }) => {
            let resolver = settings.resolver()?;
            let now = now.unwrap_or_else(|| Local::now().fixed_offset());
            let at = resolver.resolve(&text, &now)?;
            println!("{}", at.to_rfc3339());
            Ok(())
        }
        Some(Command::Lists) => {
            let store = open_store(cli.backend, &settings).await?;
            let default = store.default_list().ok();
            for list in store.list_all()? {
                let mark = if default.as_ref().is_some_and(|d| d.id == list.id) {
                    "*"
                } else {
                    " "
                };
                println!("{mark} {}\t{}", list.id, list.display_name);
            }
            Ok(())
        }
        Some(Command::Add {
            title,
            deadline,
            notes,
            list,
        }) => {
            let store = open_store(cli.backend, &settings).await?;
            let mut controller = SubmissionController::new(settings.resolver()?);
            let draft = controller.draft_mut();
            draft.title = title;
            draft.deadline = deadline;
            draft.notes = notes.unwrap_or_default();

            let destination = list.as_deref().or(settings.destination());
            let outcome = controller.submit(&store, destination, &Local::now()).await;
            let shown = feedback::for_outcome(&outcome);
            if outcome.is_success() {
                println!("{} {}\n{}", shown.icon.glyph(), shown.title, shown.message);
                Ok(())
            } else {
                match &outcome {
                    SubmissionOutcome::Failure {
                        detail: Some(detail),
                        ..
                    } => bail!("{}: {}\n({detail})", shown.title, shown.message),
                    _ => bail!("{}: {}", shown.title, shown.message),
                }
            }
        }
        None => {
            theme::init(&settings);
            let store = open_store(cli.backend, &settings).await?;
            let mut app = App::new(store, settings, config_path).await?;

            let mut terminal = tui::init()?;
            let result = run(&mut terminal, &mut app).await;
            tui::restore()?;
            result
        }
    }
}

fn service(backend: Backend) -> Result<Box<dyn ReminderService>> {
    match backend {
        Backend::Memory => Ok(Box::new(MemoryService::sample())),
        #[cfg(target_os = "macos")]
        Backend::Eventkit => Ok(Box::new(
            reminder_assistant::reminders::EventKitService::new(),
        )),
        #[cfg(not(target_os = "macos"))]
        Backend::Eventkit => Err(color_eyre::eyre::eyre!(
            "the eventkit backend is only available on macOS"
        )),
    }
}

async fn open_store(backend: Backend, settings: &Settings) -> Result<Store> {
    let store = ReminderStore::new(service(backend)?, settings.zone()?);
    if backend == Backend::Eventkit {
        eprintln!("Connecting to Reminders...");
    }
    store
        .request_access()
        .await
        .wrap_err("requesting reminders access")?;
    Ok(store)
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| render(frame, app))?;

        let Some(key) = event::next_key(Duration::from_millis(100))? else {
            continue;
        };
        if event::is_ctrl(&key, 'c') {
            app.running = false;
            continue;
        }

        // Alert takes priority
        if app.alert.is_some() {
            handle_alert_input(app, key.code);
            continue;
        }
        app.status_message = None;

        if app.settings_panel.is_some() {
            handle_settings_input(app, key.code);
            continue;
        }

        if app.focus.is_some() {
            handle_form_input(app, key.code, key.modifiers).await;
        } else {
            handle_normal_input(app, key.code, key.modifiers).await;
        }
    }

    Ok(())
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

    components::ReminderForm::render(
        frame,
        layout[0],
        app.draft(),
        app.focus,
        app.deadline_preview(),
        &app.destination_label,
    );

    if let Some(ref panel) = app.settings_panel {
        components::SettingsView::render(frame, area, panel);
    }

    if let Some(ref alert) = app.alert {
        components::FloatingAlert::render(frame, area, alert);
    }

    components::StatusBar::render(frame, layout[1], app);
}

async fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) => app.running = false,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) | (KeyCode::Enter, _) => app.submit().await,
        (KeyCode::Char('i'), _) | (KeyCode::Tab, _) => app.focus_next(),
        (KeyCode::BackTab, _) => app.focus_prev(),
        (KeyCode::Char('s'), _) => app.open_settings(),
        _ => {}
    }
}

async fn handle_form_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => app.submit().await,
        (KeyCode::Esc, _) => app.clear_focus(),
        (KeyCode::Tab, _) => app.focus_next(),
        (KeyCode::BackTab, _) => app.focus_prev(),
        (KeyCode::Backspace, _) => app.backspace(),
        (KeyCode::Enter, _) => {
            if app.on_return() {
                app.submit().await;
            }
        }
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => app.input_char(c),
        _ => {}
    }
}

fn handle_alert_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.follow_up(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char(' ') => app.dismiss_alert(),
        _ => {}
    }
}

fn handle_settings_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_settings(),
        _ => {
            let Some(panel) = app.settings_panel_mut() else {
                return;
            };
            match code {
                KeyCode::Down | KeyCode::Char('j') => panel.next(),
                KeyCode::Up | KeyCode::Char('k') => panel.prev(),
                KeyCode::Enter | KeyCode::Char(' ') => panel.select(),
                _ => {}
            }
        }
    }
}

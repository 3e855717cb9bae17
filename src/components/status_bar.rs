use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use reminder_assistant::AccessState;

use crate::app::{App, Focus};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let w = area.width as usize;

        let access = match app.access {
            AccessState::FullAccess => "access:full",
            AccessState::PartialAccess => "access:partial",
            AccessState::Denied => "access:denied",
            AccessState::NotDetermined => "access:unknown",
        };
        let editing = match app.focus {
            Some(Focus::Title) => " [名前]",
            Some(Focus::Deadline) => " [期限]",
            Some(Focus::Notes) => " [注釈]",
            None => "",
        };
        let left = format!(" {} {}{} ", app.backend_name(), access, editing);

        let right = if let Some(ref msg) = app.status_message {
            format!(" {} ", msg)
        } else if app.focus.is_some() {
            if w >= 70 {
                " Tab:Next Enter:Next/Create C-s:Create Esc:Done ".to_string()
            } else {
                " Tab:Next C-s:Create Esc:Done ".to_string()
            }
        } else if w >= 70 {
            " i:Edit Enter:Create s:Settings q:Quit ".to_string()
        } else {
            " i:Edit s:Settings q:Quit ".to_string()
        };

        let line = spread(left, right, w);

        frame.render_widget(Paragraph::new(line).style(theme::STATUS_STYLE), area);
    }
}

/// `left` and `right` at the two ends of a `width`-cell bar.
fn spread(left: String, right: String, width: usize) -> Line<'static> {
    let left = Span::styled(left, theme::STATUS_STYLE);
    let right = Span::styled(right, theme::STATUS_STYLE);
    let padding = " ".repeat(width.saturating_sub(left.width() + right.width()));
    Line::from(vec![left, Span::styled(padding, theme::STATUS_STYLE), right])
}

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use reminder_assistant::{ReminderList, Settings};

use crate::theme;

/// Reminder lists as read when the panel opened.
#[derive(Debug, Clone)]
pub enum ListSource {
    Loaded {
        default_name: String,
        lists: Vec<ReminderList>,
    },
    Unavailable,
}

/// Editable copy of the settings while the panel is open.
///
/// Rows are the "default list" entry, one entry per list, then the
/// auto-focus toggle.
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    pub source: ListSource,
    pub cursor: usize,
    pub destination: String,
    pub auto_focus: bool,
}

impl SettingsPanel {
    pub fn new(source: ListSource, settings: &Settings) -> Self {
        let mut panel = Self {
            source,
            cursor: 0,
            destination: settings.destination_list_id.clone(),
            auto_focus: settings.auto_focus,
        };
        panel.cursor = panel.selected_row().unwrap_or(0);
        panel
    }

    fn lists(&self) -> &[ReminderList] {
        match &self.source {
            ListSource::Loaded { lists, .. } => lists,
            ListSource::Unavailable => &[],
        }
    }

    fn list_rows(&self) -> usize {
        match self.source {
            ListSource::Loaded { .. } => self.lists().len() + 1,
            ListSource::Unavailable => 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.list_rows() + 1
    }

    fn toggle_row(&self) -> usize {
        self.list_rows()
    }

    /// Row of the currently chosen destination.
    fn selected_row(&self) -> Option<usize> {
        if matches!(self.source, ListSource::Unavailable) {
            return None;
        }
        if self.destination.is_empty() {
            return Some(0);
        }
        self.lists()
            .iter()
            .position(|list| list.id == self.destination)
            .map(|i| i + 1)
    }

    pub fn next(&mut self) {
        self.cursor = (self.cursor + 1) % self.row_count();
    }

    pub fn prev(&mut self) {
        self.cursor = (self.cursor + self.row_count() - 1) % self.row_count();
    }

    /// Choose the list under the cursor, or flip the toggle.
    pub fn select(&mut self) {
        if self.cursor == self.toggle_row() {
            self.auto_focus = !self.auto_focus;
        } else if self.cursor == 0 {
            self.destination.clear();
        } else if let Some(list) = self.lists().get(self.cursor - 1) {
            self.destination = list.id.clone();
        }
    }

    /// Write the panel's choices back. Returns whether anything changed.
    pub fn apply(&self, settings: &mut Settings) -> bool {
        let changed = settings.destination_list_id != self.destination
            || settings.auto_focus != self.auto_focus;
        settings.destination_list_id = self.destination.clone();
        settings.auto_focus = self.auto_focus;
        changed
    }
}

pub struct SettingsView;

impl SettingsView {
    pub fn render(frame: &mut Frame, area: Rect, panel: &SettingsPanel) {
        let theme = theme::current();
        let popup_w = area.width.min(56).max(30);
        let popup_h = area.height.min(panel.row_count() as u16 + 10).max(10);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Reminder Assistant Settings ")
            .title_style(theme.label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // section header
            Constraint::Min(1),    // list picker
            Constraint::Length(2), // footer
            Constraint::Length(1), // section header
            Constraint::Length(1), // toggle
            Constraint::Length(1), // help
        ])
        .split(inner);

        let section = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        frame.render_widget(Paragraph::new(Span::styled("リマインダー", section)), rows[0]);

        match &panel.source {
            ListSource::Loaded { default_name, lists } => {
                let chosen = panel.selected_row();
                let names = std::iter::once("デフォルトリスト")
                    .chain(lists.iter().map(|list| list.display_name.as_str()));
                let items: Vec<ListItem> = names
                    .enumerate()
                    .map(|(i, name)| {
                        let mark = if chosen == Some(i) { "●" } else { "○" };
                        let style = if i == panel.cursor {
                            theme.selected
                        } else {
                            Style::default()
                        };
                        ListItem::new(Line::from(Span::styled(format!(" {mark} {name}"), style)))
                    })
                    .collect();
                frame.render_widget(List::new(items), rows[1]);

                let footer = Line::from(vec![
                    Span::styled("現在のデフォルトリストは", theme::DIM_STYLE),
                    Span::styled(
                        default_name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("に設定されています。", theme::DIM_STYLE),
                ]);
                frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), rows[2]);
            }
            ListSource::Unavailable => {
                frame.render_widget(Paragraph::new("予期せぬエラーが発生しました。"), rows[1]);
            }
        }

        frame.render_widget(Paragraph::new(Span::styled("キーボード", section)), rows[3]);

        let check = if panel.auto_focus { "[x]" } else { "[ ]" };
        let toggle_style = if panel.cursor == panel.toggle_row() {
            theme.selected
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {check} 自動表示"), toggle_style)),
            rows[4],
        );

        let help = Line::from(vec![
            Span::styled("j/k", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Move ", theme::DIM_STYLE),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Select ", theme::DIM_STYLE),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Close", theme::DIM_STYLE),
        ]);
        frame.render_widget(Paragraph::new(help), rows[5]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> ListSource {
        ListSource::Loaded {
            default_name: "リストC".to_string(),
            lists: vec![
                ReminderList::new("list-a", "リストA"),
                ReminderList::new("list-b", "リストB"),
            ],
        }
    }

    #[test]
    fn cursor_starts_on_the_chosen_list() {
        let settings = Settings {
            destination_list_id: "list-b".to_string(),
            ..Settings::default()
        };
        let panel = SettingsPanel::new(loaded(), &settings);
        assert_eq!(panel.cursor, 2);
    }

    #[test]
    fn selecting_rows_updates_destination_and_toggle() {
        let mut settings = Settings::default();
        let mut panel = SettingsPanel::new(loaded(), &settings);
        panel.next();
        panel.select();
        assert_eq!(panel.destination, "list-a");

        panel.next();
        panel.next();
        panel.select();
        assert!(panel.auto_focus);

        assert!(panel.apply(&mut settings));
        assert_eq!(settings.destination_list_id, "list-a");
        assert!(settings.auto_focus);
        assert!(!panel.apply(&mut settings));
    }

    #[test]
    fn unavailable_lists_leave_only_the_toggle() {
        let mut panel = SettingsPanel::new(ListSource::Unavailable, &Settings::default());
        assert_eq!(panel.row_count(), 1);
        panel.next();
        assert_eq!(panel.cursor, 0);
        panel.select();
        assert!(panel.auto_focus);
    }
}

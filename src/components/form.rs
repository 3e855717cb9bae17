use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use reminder_assistant::feedback::Tone;
use reminder_assistant::submission::Draft;

use crate::app::Focus;
use crate::theme;

const NOTES_LINES: u16 = 5;

pub struct ReminderForm;

impl ReminderForm {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        draft: &Draft,
        focus: Option<Focus>,
        preview: Option<Result<String, String>>,
        destination: &str,
    ) {
        let theme = theme::current();
        let form_w = area.width.min(60);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let form_area = Rect::new(x, area.y, form_w, area.height);

        let rows = Layout::vertical([
            Constraint::Length(1),              // spacer
            Constraint::Length(1),              // header
            Constraint::Length(1),              // spacer
            Constraint::Length(1),              // title label
            Constraint::Length(1),              // title value
            Constraint::Length(1),              // spacer
            Constraint::Length(1),              // deadline label
            Constraint::Length(1),              // deadline value
            Constraint::Length(1),              // deadline preview
            Constraint::Length(1),              // notes label
            Constraint::Length(NOTES_LINES),    // notes value
            Constraint::Length(1),              // spacer
            Constraint::Length(1),              // destination
            Constraint::Length(1),              // spacer
            Constraint::Length(1),              // button
            Constraint::Min(0),
        ])
        .split(form_area);

        frame.render_widget(
            Paragraph::new(Span::styled("Let's Create Reminders.", theme.header))
                .alignment(Alignment::Center),
            rows[1],
        );

        render_label(frame, rows[3], "名前");
        render_value(frame, rows[4], &draft.title, focus == Some(Focus::Title));

        render_label(frame, rows[6], "期限");
        render_value(frame, rows[7], &draft.deadline, focus == Some(Focus::Deadline));
        let hint = match preview {
            Some(Ok(at)) => Span::styled(format!("→ {at}"), theme::DIM_STYLE),
            Some(Err(_)) => Span::styled("→ 読み取れません", theme.tone(Tone::Caution)),
            None => Span::styled("例: 明日の朝9時 / 来週の金曜 / 3日後", theme::DIM_STYLE),
        };
        frame.render_widget(Paragraph::new(hint), rows[8]);

        render_label(frame, rows[9], "注釈");
        let notes_active = focus == Some(Focus::Notes);
        let notes_style = if notes_active { theme.active } else { Style::default() };
        let cursor = if notes_active { "_" } else { "" };
        frame.render_widget(
            Paragraph::new(format!("{}{}", draft.notes, cursor))
                .style(notes_style)
                .wrap(Wrap { trim: false }),
            rows[10],
        );

        let destination = Line::from(vec![
            Span::styled("作成先: ", theme::DIM_STYLE),
            Span::raw(destination.to_string()),
        ]);
        frame.render_widget(Paragraph::new(destination), rows[12]);

        frame.render_widget(
            Paragraph::new(Span::styled("  リマインダー作成  ", theme.button))
                .alignment(Alignment::Center),
            rows[14],
        );
    }
}

fn render_label(frame: &mut Frame, area: Rect, label: &str) {
    frame.render_widget(
        Paragraph::new(Span::styled(label.to_string(), theme::current().label)),
        area,
    );
}

fn render_value(frame: &mut Frame, area: Rect, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };

    let style = if active {
        theme::current().active
    } else {
        Style::default()
    };
    let underline = style.add_modifier(Modifier::UNDERLINED);

    frame.render_widget(Paragraph::new(underlined(value, cursor, area.width, underline)), area);
}

/// Text plus padding out to `width` terminal cells.
fn underlined(value: &str, cursor: &str, width: u16, style: Style) -> Line<'static> {
    let text = Span::styled(format!("{}{}", value, cursor), style);
    let padding = (width as usize).saturating_sub(text.width());
    Line::from(vec![text, Span::styled(" ".repeat(padding), style)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_title_is_padded_by_cells() {
        let line = underlined("買い物", "_", 20, Style::default());
        assert_eq!(line.width(), 20);
    }
}

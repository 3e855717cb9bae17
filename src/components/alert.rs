use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use reminder_assistant::feedback::{Feedback, FollowUp};

use crate::theme;

pub struct FloatingAlert;

impl FloatingAlert {
    pub fn render(frame: &mut Frame, area: Rect, alert: &Feedback) {
        let theme = theme::current();
        let tone = theme.tone(alert.tone);

        let message_lines = alert.message.lines().count() as u16;
        let popup_w = area.width.min(48).max(28);
        let popup_h = area.height.min(message_lines + 7).max(7);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" {} ", alert.icon.glyph()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(tone);

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // message
            Constraint::Length(1), // help
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(alert.title.as_str(), tone)).alignment(Alignment::Center),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(alert.message.as_str())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false }),
            rows[2],
        );

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut help = Vec::new();
        match alert.follow_up {
            Some(FollowUp::PrivacySettings) => {
                help.push(Span::styled("Enter", bold));
                help.push(Span::styled(":Open Settings ", theme::DIM_STYLE));
            }
            Some(FollowUp::AppSettings) => {
                help.push(Span::styled("Enter", bold));
                help.push(Span::styled(":Choose List ", theme::DIM_STYLE));
            }
            None => {}
        }
        help.push(Span::styled("Esc", bold));
        help.push(Span::styled(":Close", theme::DIM_STYLE));
        frame.render_widget(
            Paragraph::new(Line::from(help)).alignment(Alignment::Center),
            rows[3],
        );
    }
}

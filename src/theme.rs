use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use reminder_assistant::feedback::Tone;
use reminder_assistant::Settings;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme derived from settings. Later calls are ignored.
pub fn init(settings: &Settings) {
    let _ = THEME.set(Theme::from_settings(settings));
}

/// Get the active theme (defaults if `init` was never called).
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const STATUS_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

const DEFAULT_ACCENT: Color = Color::Rgb(64, 123, 255);

#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub header: Style,
    pub label: Style,
    pub active: Style,
    pub button: Style,
    pub selected: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::with_accent(DEFAULT_ACCENT)
    }
}

impl Theme {
    fn with_accent(accent: Color) -> Self {
        Self {
            accent,
            header: Style::default().fg(accent).add_modifier(Modifier::BOLD | Modifier::ITALIC),
            label: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            active: Style::default().fg(Color::Cyan),
            button: Style::default()
                .fg(Color::White)
                .bg(accent)
                .add_modifier(Modifier::BOLD),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        settings
            .accent
            .as_deref()
            .and_then(parse_color)
            .map(Self::with_accent)
            .unwrap_or_default()
    }

    pub fn tone(&self, tone: Tone) -> Style {
        let color = match tone {
            Tone::Positive => self.accent,
            Tone::Caution => Color::Yellow,
            Tone::Negative => Color::Red,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(&s[1..3], 16).ok()?;
        let g = u8::from_str_radix(&s[3..5], 16).ok()?;
        let b = u8::from_str_radix(&s[5..7], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(parse_color("#407bff"), Some(Color::Rgb(64, 123, 255)));
        assert_eq!(parse_color(" Cyan "), Some(Color::Cyan));
        assert_eq!(parse_color("#40"), None);
    }

    #[test]
    fn bad_accent_falls_back_to_default() {
        let settings = Settings {
            accent: Some("not-a-color".to_string()),
            ..Settings::default()
        };
        assert_eq!(Theme::from_settings(&settings).accent, DEFAULT_ACCENT);
    }
}

//! The two color themes.
//!
//! Exactly two themes exist. An unrecognized or absent persisted value
//! falls back to light.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse a persisted theme name. Anything but `dark` is light.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn text(self) -> Style {
        match self {
            Theme::Light => Style::new().fg(Color::Black).bg(Color::White),
            Theme::Dark => Style::new().fg(Color::Gray).bg(Color::Black),
        }
    }

    pub fn gutter(self) -> Style {
        match self {
            Theme::Light => Style::new().fg(Color::Gray).bg(Color::White),
            Theme::Dark => Style::new().fg(Color::DarkGray).bg(Color::Black),
        }
    }

    /// Gutter label of the line the cursor is on.
    pub fn gutter_current(self) -> Style {
        match self {
            Theme::Light => Style::new().fg(Color::Black).bg(Color::White),
            Theme::Dark => Style::new().fg(Color::White).bg(Color::Black),
        }
    }

    pub fn tab(self) -> Style {
        match self {
            Theme::Light => Style::new().fg(Color::DarkGray).bg(Color::Gray),
            Theme::Dark => Style::new().fg(Color::Gray).bg(Color::DarkGray),
        }
    }

    pub fn tab_active(self) -> Style {
        match self {
            Theme::Light => Style::new()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            Theme::Dark => Style::new()
                .fg(Color::White)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn status(self) -> Style {
        match self {
            Theme::Light => Style::new().fg(Color::White).bg(Color::DarkGray),
            Theme::Dark => Style::new().fg(Color::Black).bg(Color::Gray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_names_default_to_light() {
        assert_eq!(Theme::from_name("dark"), Theme::Dark);
        assert_eq!(Theme::from_name("light"), Theme::Light);
        assert_eq!(Theme::from_name("solarized"), Theme::Light);
        assert_eq!(Theme::from_name(""), Theme::Light);
    }

    #[test]
    fn toggle_flips_between_the_two_themes() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn names_round_trip() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::from_name(theme.name()), theme);
        }
    }
}

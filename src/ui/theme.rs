//! Dark and light palettes, picked from the user's theme setting.

use ratatui::style::{Color, Modifier, Style};

use crate::model::Theme;

#[derive(Clone)]
pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
}

#[derive(Clone)]
pub struct AccentColors {
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
}

pub trait UiTheme {
    fn name(&self) -> &'static str;
    fn colors(&self) -> ThemeColors;
    fn accents(&self) -> AccentColors;

    /// Border colour for the focused panel; pulses slowly with the tick.
    fn border_color(&self, tick: u64) -> Color {
        let colors = self.colors();
        if (tick / 20) % 2 == 0 {
            colors.primary
        } else {
            colors.secondary
        }
    }

    fn selected_style(&self) -> Style {
        let colors = self.colors();
        Style::default()
            .fg(colors.selected_fg)
            .bg(colors.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    fn title_style(&self) -> Style {
        Style::default().fg(self.colors().primary).add_modifier(Modifier::BOLD)
    }

    fn muted_style(&self) -> Style {
        Style::default().fg(self.colors().muted)
    }
}

pub struct DarkTheme;

impl UiTheme for DarkTheme {
    fn name(&self) -> &'static str {
        "Dark"
    }

    fn colors(&self) -> ThemeColors {
        ThemeColors {
            primary: Color::Cyan,
            secondary: Color::Magenta,
            background: Color::Black,
            text: Color::White,
            muted: Color::DarkGray,
            selected_bg: Color::Cyan,
            selected_fg: Color::Black,
        }
    }

    fn accents(&self) -> AccentColors {
        AccentColors {
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::LightBlue,
        }
    }
}

pub struct LightTheme;

impl UiTheme for LightTheme {
    fn name(&self) -> &'static str {
        "Light"
    }

    fn colors(&self) -> ThemeColors {
        ThemeColors {
            primary: Color::Blue,
            secondary: Color::Magenta,
            background: Color::White,
            text: Color::Black,
            muted: Color::Gray,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
        }
    }

    fn accents(&self) -> AccentColors {
        AccentColors {
            success: Color::Green,
            warning: Color::Rgb(180, 120, 0),
            error: Color::Red,
            info: Color::Blue,
        }
    }
}

pub fn theme_for(theme: Theme) -> &'static dyn UiTheme {
    match theme {
        Theme::Dark => &DarkTheme,
        Theme::Light => &LightTheme,
    }
}

/// Squad colours are stored by name; unknown names fall back to the primary colour.
pub fn named_color(name: &str, fallback: Color) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "cyan" => Color::Cyan,
        "magenta" | "pink" | "purple" => Color::Magenta,
        "green" | "emerald" => Color::Green,
        "yellow" | "amber" => Color::Yellow,
        "red" | "rose" => Color::Red,
        "blue" => Color::Blue,
        _ => fallback,
    }
}

pub fn priority_color(priority: &str, accents: &AccentColors) -> Color {
    match crate::services::tasks::priority_weight(priority) {
        3 => accents.error,
        2 => accents.warning,
        1 => accents.info,
        _ => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_theme_has_its_palette() {
        assert_eq!(theme_for(Theme::Dark).name(), "Dark");
        assert_eq!(theme_for(Theme::Light).colors().background, Color::White);
    }

    #[test]
    fn priority_colour_follows_the_exact_weight() {
        let accents = theme_for(Theme::Dark).accents();
        assert_eq!(priority_color("urgent", &accents), accents.error);
        assert_eq!(priority_color("URGENT", &accents), Color::Gray);
    }

    #[test]
    fn unknown_squad_colour_uses_fallback() {
        assert_eq!(named_color("Cyan", Color::Reset), Color::Cyan);
        assert_eq!(named_color("chartreuse", Color::Reset), Color::Reset);
    }
}

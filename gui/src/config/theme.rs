// Page colors around the chart. The chart surface itself is styled by
// engine::chart::style::ChartStyle.
use shared::models::Theme;

#[derive(Debug, Clone, PartialEq)]
pub struct ThemePalette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub panel: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub accent_text: &'static str,
    pub error: &'static str,
}

impl ThemePalette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#f5f5f5",
            foreground: "#212121",
            panel: "#ffffff",
            border: "#dddddd",
            accent: "#1976d2",
            accent_text: "#ffffff",
            error: "#d32f2f",
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#121212",
            foreground: "#e0e0e0",
            panel: "#1e1e1e",
            border: "#333333",
            accent: "#90caf9",
            accent_text: "#121212",
            error: "#ef5350",
        }
    }

    /// Inline style for the outermost page container.
    pub fn page_style(&self) -> String {
        format!(
            "min-height: 100vh; margin: 0; padding: 16px; box-sizing: border-box; \
             background-color: {}; color: {}; font-family: sans-serif;",
            self.background, self.foreground
        )
    }

    /// Inline style for the text laid over the chart while it has no candles.
    pub fn overlay_style(&self, is_error: bool) -> String {
        let color = if is_error { self.error } else { self.foreground };
        format!(
            "position: absolute; top: 50%; width: 100%; text-align: center; \
             pointer-events: none; color: {};",
            color
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_follows_theme() {
        assert_eq!(ThemePalette::for_theme(Theme::Light), ThemePalette::light());
        assert_eq!(ThemePalette::for_theme(Theme::Dark).background, "#121212");
        assert!(ThemePalette::dark().page_style().contains("#e0e0e0"));
    }

    #[test]
    fn test_error_overlay_uses_theme_error_color() {
        let (light, dark) = (ThemePalette::light(), ThemePalette::dark());
        assert!(light.overlay_style(true).contains("color: #d32f2f;"));
        assert!(dark.overlay_style(true).contains("color: #ef5350;"));
        assert!(dark.overlay_style(false).contains("color: #e0e0e0;"));
    }
}

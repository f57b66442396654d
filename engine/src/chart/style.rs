// Theme-dependent visual parameters of a chart session.
use serde::Serialize;
use shared::models::Theme;

pub const UP_COLOR: &str = "#26a69a";
pub const DOWN_COLOR: &str = "#ef5350";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub background: String,
    pub title_color: String,
    pub tick_color: String,
    pub grid_color: String,
    pub border_color: String,
    // Candle colours do not follow the theme.
    pub up_color: String,
    pub down_color: String,
    pub tooltip_background: String,
    pub tooltip_text: String,
    pub crosshair_color: String,
    pub title_font_size: f64,
    pub tick_font_size: f64,
    pub border_width: f64,
}

impl ChartStyle {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            title_color: "#1976d2".to_string(),
            tick_color: "#555555".to_string(),
            grid_color: "#eeeeee".to_string(),
            border_color: "#333333".to_string(),
            up_color: UP_COLOR.to_string(),
            down_color: DOWN_COLOR.to_string(),
            tooltip_background: "rgba(0, 0, 0, 0.8)".to_string(),
            tooltip_text: "#ffffff".to_string(),
            crosshair_color: "#999999".to_string(),
            title_font_size: 22.0,
            tick_font_size: 12.0,
            border_width: 1.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#1e1e1e".to_string(),
            title_color: "#e0e0e0".to_string(),
            tick_color: "#e0e0e0".to_string(),
            grid_color: "#333333".to_string(),
            border_color: "#999999".to_string(),
            up_color: UP_COLOR.to_string(),
            down_color: DOWN_COLOR.to_string(),
            tooltip_background: "rgba(245, 245, 245, 0.9)".to_string(),
            tooltip_text: "#1e1e1e".to_string(),
            crosshair_color: "#666666".to_string(),
            title_font_size: 22.0,
            tick_font_size: 12.0,
            border_width: 1.0,
        }
    }

    pub fn candle_color(&self, bullish: bool) -> &str {
        if bullish {
            &self.up_color
        } else {
            &self.down_color
        }
    }
}

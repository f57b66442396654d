//! Renderer-agnostic description of one drawn chart frame.
//!
//! Coordinates are pixels from the top-left corner of the render surface.
//! A surface only has to draw these primitives; all layout decisions are
//! made by the session that produced the frame.

use super::style::ChartStyle;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x && x <= self.right()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.contains_x(x) && y >= self.y && y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub anchor: TextAnchor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleGlyph {
    pub x: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub body: Rect,
    pub bullish: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipBox {
    pub frame: Rect,
    pub crosshair_x: f64,
    pub title: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub style: ChartStyle,
    pub width: f64,
    pub height: f64,
    pub plot: Rect,
    pub title: TextLabel,
    pub grid: Vec<Line>,
    pub x_labels: Vec<TextLabel>,
    pub y_labels: Vec<TextLabel>,
    pub candles: Vec<CandleGlyph>,
    pub tooltip: Option<TooltipBox>,
}

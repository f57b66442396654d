// A live chart session: one candle series drawn with one theme at one
// granularity, plus the interaction state (zoom window, drag, hover).
use super::axis::{price_ticks, time_ticks, TickUnit};
use super::scene::{CandleGlyph, Frame, Line, Rect, TextAnchor, TextLabel, TooltipBox};
use super::style::ChartStyle;
use super::viewport::Viewport;
use shared::models::{Candle, CandleSeries, Granularity, SeriesId, Theme};
use shared::utils::{format_price, format_tooltip_time};
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

const PADDING: f64 = 10.0;
const TITLE_HEIGHT: f64 = 40.0;
const Y_AXIS_WIDTH: f64 = 64.0;
const X_AXIS_HEIGHT: f64 = 24.0;
const MIN_LABEL_SPACING: f64 = 80.0;
const PRICE_TICK_TARGET: usize = 6;
const PRICE_PADDING: f64 = 0.05;
const BODY_WIDTH_RATIO: f64 = 0.7;
const MAX_BODY_WIDTH: f64 = 16.0;
const WHEEL_SPEED: f64 = 0.1;
// One wheel notch in pixel delta mode.
const WHEEL_NOTCH: f64 = 100.0;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The inputs a session was built from. Two sessions with equal keys draw
/// the same chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionKey {
    pub series: SeriesId,
    pub granularity: Granularity,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub index: usize,
    pub candle: Candle,
    pub title: String,
    pub label: String,
}

#[derive(Debug)]
pub struct ChartSession {
    id: SessionId,
    key: SessionKey,
    series: CandleSeries,
    style: ChartStyle,
    unit: TickUnit,
    title: String,
    symbol: String,
    viewport: Viewport,
    width: f64,
    height: f64,
    drag_x: Option<f64>,
    hover_x: Option<f64>,
}

impl ChartSession {
    pub(crate) fn new(
        series: CandleSeries,
        granularity: Granularity,
        theme: Theme,
        symbol: &str,
        size: (f64, f64),
    ) -> Self {
        let unit = TickUnit::for_granularity(granularity);
        let (first, last) = series
            .candles()
            .iter()
            .map(Candle::time_ms)
            .fold(None, |acc: Option<(i64, i64)>, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
            .unwrap_or((0, 0));
        Self {
            id: SessionId::next(),
            key: SessionKey { series: series.id(), granularity, theme },
            style: ChartStyle::for_theme(theme),
            unit,
            title: format!("{} Candlestick Chart ({})", symbol, granularity.label()),
            symbol: symbol.to_string(),
            viewport: Viewport::new(first, last, unit.millis()),
            width: size.0.max(1.0),
            height: size.1.max(1.0),
            drag_x: None,
            hover_x: None,
            series,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn key(&self) -> SessionKey {
        self.key
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn tick_unit(&self) -> TickUnit {
        self.unit
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    pub fn plot_area(&self) -> Rect {
        Rect {
            x: PADDING + Y_AXIS_WIDTH,
            y: PADDING + TITLE_HEIGHT,
            width: (self.width - 2.0 * PADDING - Y_AXIS_WIDTH).max(1.0),
            height: (self.height - 2.0 * PADDING - TITLE_HEIGHT - X_AXIS_HEIGHT).max(1.0),
        }
    }

    // Window fraction under a surface x coordinate.
    fn fraction_at(&self, x: f64) -> f64 {
        let plot = self.plot_area();
        (x - plot.x) / plot.width
    }

    fn x_of(&self, time_ms: f64) -> f64 {
        let plot = self.plot_area();
        plot.x + self.viewport.fraction_of(time_ms) * plot.width
    }

    /// Zooms on a wheel event. Negative `delta_y` (scrolling up) zooms in.
    pub fn wheel(&mut self, delta_y: f64, x: f64) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() || !self.plot_area().contains_x(x) {
            return false;
        }
        let notches = (delta_y.abs() / WHEEL_NOTCH).max(1.0);
        let step = (1.0 + WHEEL_SPEED).powf(notches);
        let factor = if delta_y < 0.0 { 1.0 / step } else { step };
        self.viewport.zoom(factor, self.fraction_at(x));
        true
    }

    /// Zooms on a pinch gesture; `scale` > 1 spreads the fingers apart.
    pub fn pinch(&mut self, scale: f64, x: f64) -> bool {
        if !scale.is_finite() || scale <= 0.0 || !self.plot_area().contains_x(x) {
            return false;
        }
        self.viewport.zoom(1.0 / scale, self.fraction_at(x));
        true
    }

    pub fn drag_start(&mut self, x: f64, y: f64) {
        if self.plot_area().contains(x, y) {
            self.drag_x = Some(x);
        }
    }

    /// Pans by the pointer movement since the last drag position.
    pub fn drag_move(&mut self, x: f64) -> bool {
        let Some(last) = self.drag_x else {
            return false;
        };
        let dx = x - last;
        self.drag_x = Some(x);
        if dx == 0.0 {
            return false;
        }
        self.viewport.pan(-dx / self.plot_area().width);
        true
    }

    pub fn drag_end(&mut self) {
        self.drag_x = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_x.is_some()
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset();
    }

    /// Moves the hover position and returns the tooltip it selects.
    pub fn hover(&mut self, x: f64) -> Option<Tooltip> {
        self.hover_x = Some(x);
        self.tooltip_at(x)
    }

    pub fn leave(&mut self) {
        self.hover_x = None;
        self.drag_x = None;
    }

    fn visible_range(&self) -> Range<usize> {
        let candles = self.series.candles();
        let start = candles.partition_point(|c| (c.time_ms() as f64) < self.viewport.start());
        let end = candles.partition_point(|c| (c.time_ms() as f64) <= self.viewport.end());
        start..end.max(start)
    }

    /// Index of the candle whose time is nearest to the pointer's time,
    /// among the visible candles. Hit testing is by time index only; the
    /// pointer's y position does not matter.
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        if !self.plot_area().contains_x(x) {
            return None;
        }
        let visible = self.visible_range();
        if visible.is_empty() {
            return None;
        }
        let candles = &self.series.candles()[visible.clone()];
        let t = self.viewport.time_at(self.fraction_at(x));
        let i = candles.partition_point(|c| (c.time_ms() as f64) < t);
        let nearest = match (i.checked_sub(1), candles.get(i)) {
            (Some(prev), Some(next)) => {
                if t - candles[prev].time_ms() as f64 <= next.time_ms() as f64 - t {
                    prev
                } else {
                    i
                }
            }
            (Some(prev), None) => prev,
            (None, _) => 0,
        };
        Some(visible.start + nearest)
    }

    pub fn tooltip_at(&self, x: f64) -> Option<Tooltip> {
        let index = self.nearest_index(x)?;
        let candle = *self.series.candles().get(index)?;
        Some(Tooltip {
            index,
            candle,
            title: format_tooltip_time(&candle.timestamp),
            label: format!(
                "{}: O: {} H: {} L: {} C: {}",
                self.symbol,
                format_price(candle.open, 2),
                format_price(candle.high, 2),
                format_price(candle.low, 2),
                format_price(candle.close, 2)
            ),
        })
    }

    /// Lays out everything the surface has to draw for the current state.
    pub fn frame(&self) -> Frame {
        let plot = self.plot_area();
        let visible = self.visible_range();
        let (min, max) = self.padded_price_range(visible.clone());
        let y_of = |price: f64| plot.y + (max - price) / (max - min) * plot.height;

        let mut grid = Vec::new();
        let max_time_ticks = (plot.width / MIN_LABEL_SPACING).floor().max(1.0) as usize;
        let x_labels = time_ticks(self.unit, self.viewport.start(), self.viewport.end(), max_time_ticks)
            .into_iter()
            .map(|tick| {
                let x = self.x_of(tick.value);
                grid.push(Line { x1: x, y1: plot.y, x2: x, y2: plot.bottom() });
                TextLabel { x, y: plot.bottom() + X_AXIS_HEIGHT - 6.0, text: tick.label, anchor: TextAnchor::Middle }
            })
            .collect();
        let y_labels = price_ticks(min, max, PRICE_TICK_TARGET)
            .into_iter()
            .map(|tick| {
                let y = y_of(tick.value);
                grid.push(Line { x1: plot.x, y1: y, x2: plot.right(), y2: y });
                TextLabel { x: plot.x - 6.0, y: y + 4.0, text: tick.label, anchor: TextAnchor::End }
            })
            .collect();

        let spacing = plot.width * self.unit.millis() as f64 / self.viewport.span();
        let body_width = (spacing * BODY_WIDTH_RATIO).clamp(1.0, MAX_BODY_WIDTH);
        let candles = self
            .pixel_buckets(visible)
            .into_iter()
            .map(|(x, c)| {
                let (top, bottom) = (y_of(c.open.max(c.close)), y_of(c.open.min(c.close)));
                CandleGlyph {
                    x,
                    wick_top: y_of(c.high),
                    wick_bottom: y_of(c.low),
                    body: Rect { x: x - body_width / 2.0, y: top, width: body_width, height: (bottom - top).max(1.0) },
                    bullish: c.is_bullish(),
                }
            })
            .collect();

        Frame {
            style: self.style.clone(),
            width: self.width,
            height: self.height,
            plot,
            title: TextLabel {
                x: self.width / 2.0,
                y: PADDING + self.style.title_font_size,
                text: self.title.clone(),
                anchor: TextAnchor::Middle,
            },
            grid,
            x_labels,
            y_labels,
            candles,
            tooltip: self.hover_x.and_then(|x| self.tooltip_box(x)),
        }
    }

    fn padded_price_range(&self, visible: Range<usize>) -> (f64, f64) {
        let (lo, hi) = self
            .series
            .price_range(visible)
            .or_else(|| self.series.price_range(0..self.series.len()))
            .unwrap_or((0.0, 1.0));
        let pad = if hi > lo { (hi - lo) * PRICE_PADDING } else { (lo.abs() * 0.01).max(1.0) };
        (lo - pad, hi + pad)
    }

    // Candles sharing a pixel column are merged so a dense window draws at
    // most one glyph per column.
    fn pixel_buckets(&self, visible: Range<usize>) -> Vec<(f64, Candle)> {
        let mut buckets: Vec<(i64, f64, Candle)> = Vec::new();
        for candle in &self.series.candles()[visible] {
            let x = self.x_of(candle.time_ms() as f64);
            let column = x.floor() as i64;
            match buckets.last_mut() {
                Some((col, _, merged)) if *col == column => {
                    merged.high = merged.high.max(candle.high);
                    merged.low = merged.low.min(candle.low);
                    merged.close = candle.close;
                }
                _ => buckets.push((column, x, *candle)),
            }
        }
        buckets.into_iter().map(|(_, x, c)| (x, c)).collect()
    }

    fn tooltip_box(&self, x: f64) -> Option<TooltipBox> {
        let tooltip = self.tooltip_at(x)?;
        let plot = self.plot_area();
        let crosshair_x = self.x_of(tooltip.candle.time_ms() as f64);
        let chars = tooltip.title.len().max(tooltip.label.len()) as f64;
        let (width, height) = (chars * 7.0 + 16.0, 44.0);
        let left = if crosshair_x + 12.0 + width > plot.right() { crosshair_x - 12.0 - width } else { crosshair_x + 12.0 };
        Some(TooltipBox {
            frame: Rect { x: left.max(0.0), y: plot.y + 8.0, width, height },
            crosshair_x,
            title: tooltip.title,
            label: tooltip.label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn minute_series(closes: &[f64]) -> CandleSeries {
        let start = NaiveDate::from_ymd_opt(2025, 7, 18).unwrap().and_hms_opt(9, 15, 0).unwrap();
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: start + chrono::Duration::minutes(i as i64),
                open: close - 1.0,
                high: close + 2.0,
                low: close - 3.0,
                close,
            })
            .collect();
        CandleSeries::new(Granularity::Minute1, candles)
    }

    fn session(closes: &[f64]) -> ChartSession {
        ChartSession::new(minute_series(closes), Granularity::Minute1, Theme::Light, "NIFTY", (1000.0, 500.0))
    }

    #[test]
    fn test_title_and_unit_follow_granularity() {
        let s = ChartSession::new(minute_series(&[100.0]), Granularity::Second1, Theme::Dark, "NIFTY", (800.0, 400.0));
        assert_eq!(s.title(), "NIFTY Candlestick Chart (1 Second)");
        assert_eq!(s.tick_unit(), TickUnit::Second);
        assert_eq!(s.style(), &ChartStyle::dark());
        assert_eq!(session(&[100.0]).title(), "NIFTY Candlestick Chart (1 Minute)");
    }

    #[test]
    fn test_frame_draws_every_candle_when_sparse() {
        let s = session(&[100.0, 98.0, 103.0]);
        let frame = s.frame();
        assert_eq!(frame.candles.len(), 3);
        assert!(frame.candles[0].bullish);
        assert!(frame.candles.windows(2).all(|w| w[0].x < w[1].x));
        for glyph in &frame.candles {
            assert!(frame.plot.contains(glyph.x, glyph.wick_top));
            assert!(glyph.wick_top <= glyph.body.y && glyph.body.bottom() <= glyph.wick_bottom + 1.0);
        }
        assert!(!frame.x_labels.is_empty());
        assert!(!frame.y_labels.is_empty());
        assert!(frame.tooltip.is_none());
    }

    #[test]
    fn test_dense_window_merges_columns() {
        let closes: Vec<f64> = (0..5000).map(|i| 100.0 + (i % 7) as f64).collect();
        let s = session(&closes);
        let frame = s.frame();
        assert!(frame.candles.len() <= frame.plot.width.ceil() as usize + 1);
        let highest = frame.candles.iter().map(|c| c.wick_top).fold(f64::INFINITY, f64::min);
        // The highest high (106 + 2) survives merging and sits inside the padded range.
        assert!(highest > frame.plot.y);
    }

    #[test]
    fn test_wheel_zooms_in_and_out() {
        let mut s = session(&[100.0; 60]);
        let plot = s.plot_area();
        let full = s.viewport().span();
        assert!(s.wheel(-100.0, plot.x + plot.width / 2.0));
        assert!(s.viewport().span() < full);
        assert!(s.wheel(500.0, plot.x + plot.width / 2.0));
        assert!((s.viewport().span() - full).abs() < 1e-2);
        assert!(!s.wheel(-100.0, 1.0), "wheel outside the plot is ignored");
    }

    #[test]
    fn test_drag_pans_time_axis_only() {
        let mut s = session(&[100.0; 60]);
        let plot = s.plot_area();
        s.wheel(-1000.0, plot.x + plot.width / 2.0);
        let before = s.viewport().start();
        s.drag_start(plot.x + 100.0, plot.y + 10.0);
        assert!(s.is_dragging());
        assert!(s.drag_move(plot.x + 50.0));
        assert!(s.viewport().start() > before);
        s.drag_end();
        assert!(!s.drag_move(plot.x));
        s.reset_zoom();
        assert!(!s.viewport().is_zoomed());
    }

    #[test]
    fn test_pinch_zoom() {
        let mut s = session(&[100.0; 60]);
        let plot = s.plot_area();
        let full = s.viewport().span();
        assert!(s.pinch(2.0, plot.x + 10.0));
        assert!((s.viewport().span() - full / 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_hover_picks_nearest_time_index() {
        let mut s = session(&[100.0, 101.0, 102.0, 103.0]);
        let glyphs = s.frame().candles;
        let midway = (glyphs[1].x + glyphs[2].x) / 2.0;
        assert_eq!(s.hover(glyphs[1].x).unwrap().index, 1);
        assert_eq!(s.hover(midway - 1.0).unwrap().index, 1);
        assert_eq!(s.hover(midway + 1.0).unwrap().index, 2);
        let tooltip = s.hover(glyphs[3].x + 3.0).unwrap();
        assert_eq!(tooltip.index, 3);
        assert_eq!(tooltip.title, "Jul 18, 2025 09:18:00");
        assert_eq!(tooltip.label, "NIFTY: O: 102.00 H: 105.00 L: 100.00 C: 103.00");
        assert!(s.frame().tooltip.is_some());
        s.leave();
        assert!(s.frame().tooltip.is_none());
    }

    #[test]
    fn test_hover_outside_plot_has_no_tooltip() {
        let mut s = session(&[100.0, 101.0]);
        assert!(s.hover(0.0).is_none());
        assert!(s.hover(s.plot_area().right() + 5.0).is_none());
    }

    #[test]
    fn test_resize_moves_layout() {
        let mut s = session(&[100.0, 101.0]);
        let before = s.plot_area();
        s.resize(600.0, 300.0);
        assert_eq!(s.size(), (600.0, 300.0));
        assert!(s.plot_area().width < before.width);
        assert_eq!(s.frame().width, 600.0);
    }
}

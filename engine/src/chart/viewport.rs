// Visible time window. Pan and zoom move along the time axis only; the
// price axis is refitted from whatever candles the window shows.

/// Smallest window, in candle intervals, that zooming may reach.
pub const MIN_VISIBLE_CANDLES: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    data_start: f64,
    data_end: f64,
    start: f64,
    end: f64,
    min_span: f64,
}

impl Viewport {
    /// Window over `[first_ms, last_ms]` padded by half an interval on each
    /// side so the outer candles are not cut in half.
    pub fn new(first_ms: i64, last_ms: i64, interval_ms: i64) -> Self {
        let (lo, hi) = (first_ms.min(last_ms) as f64, first_ms.max(last_ms) as f64);
        let half = interval_ms.max(1) as f64 / 2.0;
        let (data_start, data_end) = (lo - half, hi + half);
        let min_span = (interval_ms.max(1) as f64 * MIN_VISIBLE_CANDLES).min(data_end - data_start);
        Self { data_start, data_end, start: data_start, end: data_end, min_span }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_zoomed(&self) -> bool {
        self.span() < self.data_end - self.data_start
    }

    /// Maps a time to its position in the window, 0.0 at the left edge.
    pub fn fraction_of(&self, time_ms: f64) -> f64 {
        (time_ms - self.start) / self.span()
    }

    pub fn time_at(&self, fraction: f64) -> f64 {
        self.start + fraction * self.span()
    }

    /// Scales the window by `factor` (< 1 zooms in) keeping the time under
    /// `anchor` (a window fraction) in place.
    pub fn zoom(&mut self, factor: f64, anchor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchor = if anchor.is_finite() { anchor.clamp(0.0, 1.0) } else { 0.5 };
        let pivot = self.time_at(anchor);
        let full = self.data_end - self.data_start;
        let span = (self.span() * factor).clamp(self.min_span, full);
        self.start = pivot - anchor * span;
        self.end = self.start + span;
        self.clamp();
    }

    /// Shifts the window by a fraction of its width; positive moves later.
    pub fn pan(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        let shift = fraction * self.span();
        self.start += shift;
        self.end += shift;
        self.clamp();
    }

    pub fn reset(&mut self) {
        self.start = self.data_start;
        self.end = self.data_end;
    }

    fn clamp(&mut self) {
        let span = self.span();
        if self.start < self.data_start {
            self.start = self.data_start;
            self.end = self.data_start + span;
        }
        if self.end > self.data_end {
            self.end = self.data_end;
            self.start = (self.data_end - span).max(self.data_start);
        }
    }
}

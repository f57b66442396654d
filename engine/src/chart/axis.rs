// Tick generation for the time and price axes.
use chrono::DateTime;
use shared::models::Granularity;
use shared::utils::{decimals_for_step, format_price};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickUnit {
    Second,
    Minute,
}

impl TickUnit {
    pub fn for_granularity(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Second1 => TickUnit::Second,
            Granularity::Minute1 => TickUnit::Minute,
        }
    }

    pub fn millis(&self) -> i64 {
        match self {
            TickUnit::Second => 1_000,
            TickUnit::Minute => 60_000,
        }
    }

    // Tick spacings tried in order, as multiples of the unit.
    fn steps(&self) -> &'static [i64] {
        match self {
            TickUnit::Second => &[1, 2, 5, 10, 15, 30, 60, 120, 300, 600, 900, 1800, 3600],
            TickUnit::Minute => &[1, 2, 5, 10, 15, 30, 60, 120, 240, 360, 720, 1440],
        }
    }

    fn label_format(&self) -> &'static str {
        match self {
            TickUnit::Second => "%H:%M:%S",
            TickUnit::Minute => "%H:%M",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Time ticks inside `[start_ms, end_ms]`, at most `max_ticks` of them.
pub fn time_ticks(unit: TickUnit, start_ms: f64, end_ms: f64, max_ticks: usize) -> Vec<Tick> {
    if !(end_ms > start_ms) || max_ticks == 0 {
        return Vec::new();
    }
    let span = end_ms - start_ms;
    let steps = unit.steps();
    let step_units = steps
        .iter()
        .copied()
        .find(|s| span / (*s * unit.millis()) as f64 <= max_ticks as f64)
        .unwrap_or(steps[steps.len() - 1]);
    let step_ms = step_units * unit.millis();

    let mut ticks = Vec::new();
    let mut t = (start_ms / step_ms as f64).ceil() as i64 * step_ms;
    while (t as f64) <= end_ms && ticks.len() <= max_ticks {
        if let Some(dt) = DateTime::from_timestamp_millis(t) {
            ticks.push(Tick { value: t as f64, label: dt.naive_utc().format(unit.label_format()).to_string() });
        }
        t += step_ms;
    }
    ticks
}

// Rounds a raw step up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Evenly spaced price ticks covering `[min, max]`, roughly `target` of them.
pub fn price_ticks(min: f64, max: f64, target: usize) -> Vec<Tick> {
    if !(min.is_finite() && max.is_finite()) || max <= min || target == 0 {
        return Vec::new();
    }
    let step = nice_step((max - min) / target as f64);
    let decimals = decimals_for_step(step);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last)
        .map(|i| {
            let value = i as f64 * step;
            Tick { value, label: format_price(value, decimals) }
        })
        .collect()
}

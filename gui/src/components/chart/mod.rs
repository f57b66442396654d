pub mod candlestick;
pub mod surface;

pub use candlestick::CandleChart;

// GUI components module
pub mod chart;
pub mod toolbar;

pub use chart::CandleChart;
pub use toolbar::Toolbar;

// Engine library root: the feed loader and the chart session core.
// Nothing here depends on a particular UI toolkit; the GUI crate supplies a
// `RenderSurface` and the granularity/theme inputs.

pub mod chart;
pub mod config;
pub mod data;
pub mod error;

pub use error::EngineError;

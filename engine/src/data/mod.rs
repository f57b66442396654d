// Feed loading: transport, CSV parsing and the latest-request-wins load state.
pub mod csv_parser;
pub mod feed;
pub mod loader;

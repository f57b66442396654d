// Domain models shared by the loader/chart engine and the GUI shell.
pub mod models;
pub mod utils;

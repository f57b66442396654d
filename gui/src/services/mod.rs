pub mod series_loader;

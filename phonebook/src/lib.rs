pub mod app;
pub mod config;
pub mod console;
pub mod sync;

pub mod cli;
pub mod config;
pub mod core;
pub mod exit;
pub mod logs;
pub mod model;
pub mod ui;

pub mod app;
pub mod capability;
pub mod config;
pub mod input;
pub mod logging;
pub mod render;
pub mod terminal;
pub mod warp;

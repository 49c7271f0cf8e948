pub mod app;
pub mod braille;
pub mod classify;
pub mod config;
pub mod data;
pub mod location;
pub mod map;
pub mod markers;
pub mod selection;
pub mod ui;

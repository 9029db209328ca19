//! Runtime for a skinnable terminal front-end.
//!
//! A [`window::Window`] owns a stack of [`screen::Screen`]s, composites them
//! every frame, routes input to the top one and runs the idle, screensaver
//! and sleep lifecycle. Background threads talk to it through the
//! [`channel::UiHandle`] mailbox.

pub mod channel;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod help;
pub mod idle;
pub mod keybindings;
pub mod pacer;
pub mod runner;
pub mod screen;
pub mod screensaver;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

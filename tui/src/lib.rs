//! Reisebot TUI - Terminal chat widget for the Reisebot travel assistant
//!
//! This crate is a thin surface over `widget-core`: the controller owns the
//! conversation and feedback state, this crate turns key presses into
//! controller calls and draws the controller's view.
//!
//! # Architecture
//!
//! - **App**: Event loop, key bindings, layout
//! - **Display**: View projection to styled lines
//! - **Requests**: Background chat and feedback calls
//! - **Widgets**: Bottom-anchored conversation with word wrap

pub mod app;
pub mod display;
pub mod requests;
pub mod theme;
pub mod widgets;

pub use app::App;

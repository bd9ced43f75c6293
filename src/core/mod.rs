//! Core library components.
//!
//! Domain types, the streaming pipeline, the picker bridge and the session
//! state machine. Nothing in here prints to the terminal.

pub mod config;
pub mod constants;
pub mod display;
pub mod domain;
pub mod picker;
pub mod pipeline;
pub mod remote;
pub mod selector;
pub mod session;
pub mod table;

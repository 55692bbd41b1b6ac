//! alactic is a tabbed plain-text editor for the terminal.
//!
//! The crate is split along the seams of its data flow: [`model`] holds the
//! editing session (tabs, contents, undo history), [`storage`] the durable
//! record store behind it, [`app`] the event loop and key handling, and
//! [`view`] the ratatui rendering of whatever the session currently says.

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod transfer;
pub mod view;

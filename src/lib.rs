//! proctop reads Linux procfs directly and renders a live process table.
//!
//! The crate splits into a sampling layer ([`system`]) that parses kernel
//! pseudo-files into typed metrics, and a display layer ([`ui`], [`app`])
//! that consumes the per-tick [`system::SystemSnapshot`]. The sampling
//! layer never touches the terminal and the display layer never touches
//! the filesystem, which keeps the arithmetic testable against fixture
//! trees.

pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod system;
#[cfg(feature = "perf-tracing")]
pub mod trace;
pub mod ui;

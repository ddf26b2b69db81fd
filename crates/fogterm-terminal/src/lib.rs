//! Terminal backend for the fogterm UI toolkit.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)] // "item in documentation missing backticks"
//!
//! This crate connects a [`fogterm_core::ControlTree`] to a real terminal
//! using `crossterm` directly:
//!
//! - [`TerminalWriter`]: a [`fogterm_core::Surface`] that skips redundant
//!   cursor moves and color changes
//! - [`Terminal`]: raw mode / alternate screen handling, with the
//!   in-memory [`TestableTerminal`] for tests
//! - [`InputSource`]: background thread polling for keys and resizes
//! - [`Application`]: layout, paint and key dispatch on one thread
//!
//! # Example
//!
//! ```
//! use fogterm_core::{Control, ControlTree, Key, KeyInfo};
//! use fogterm_terminal::{AppConfig, Application, TestableTerminal};
//!
//! let mut tree = ControlTree::new();
//! let root = tree.insert(Control::panel());
//! let mut app = Application::new(tree, root, TestableTerminal::new(20, 5), AppConfig::default())?;
//! app.start()?;
//! assert!(!app.dispatch_key(&KeyInfo::new(Key::Tab))?);
//! app.stop()?;
//! # Ok::<(), fogterm_terminal::TuiError>(())
//! ```

mod app;
mod color;
mod config;
mod error;
mod input;
mod input_source;
mod terminal;
mod writer;

pub use app::Application;
pub use color::ColorMode;
pub use config::AppConfig;
pub use error::TuiError;
pub use input::{convert_key, KeyBinding};
pub use input_source::{CrosstermEvents, EventSource, InputEvent, InputSource, ScriptedEvents};
pub use terminal::{CrosstermTerminal, Terminal, TestableTerminal};
pub use writer::{TerminalWriter, WriterStats};

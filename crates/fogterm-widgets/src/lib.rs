//! Leaf widgets for fogterm.
//!
//! Each widget plugs into a leaf control via [`fogterm_core::Control::leaf`]:
//! - [`Label`]: static single-line text with alignment
//! - [`Button`]: focusable, pressed with Space or Enter
//! - [`ProgressBar`]: value from 0 to 100
//!
//! Widgets are mutated through [`fogterm_core::ControlTree::update_widget`]
//! so the tree can request the right kind of repaint.

mod button;
mod label;
mod progress_bar;
mod text;

pub use button::Button;
pub use label::Label;
pub use progress_bar::ProgressBar;
pub use text::{fit, single_line, truncate, Alignment};

//! Terminal abstraction.
//!
//! [`CrosstermTerminal`] drives the real terminal through a
//! [`TerminalWriter`]; [`TestableTerminal`] paints into a
//! [`RecordingSurface`] so application behavior can be checked cell by cell
//! without a TTY.

use crate::color::ColorMode;
use crate::error::TuiError;
use crate::writer::TerminalWriter;
use crossterm::{
    cursor, execute,
    style::ResetColor,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fogterm_core::{Color, Rect, RecordingSurface, Surface};
use std::io::{self, BufWriter, Stdout};

/// Terminal abstraction for testability.
pub trait Terminal {
    /// Enter raw mode and the alternate screen.
    fn enter(&mut self) -> Result<(), TuiError>;
    /// Leave the alternate screen and raw mode.
    fn leave(&mut self) -> Result<(), TuiError>;
    /// Current size in cells, `None` if it cannot be determined.
    fn size(&self) -> Option<(u16, u16)>;
    /// Record a new extent after a resize.
    fn set_extent(&mut self, width: u16, height: u16);
    /// Blank the whole screen in `back`.
    fn clear(&mut self, back: Color) -> Result<(), TuiError>;
    /// Paint target.
    fn surface(&mut self) -> &mut dyn Surface;
}

/// Real terminal on stdout.
#[derive(Debug)]
pub struct CrosstermTerminal {
    writer: TerminalWriter<BufWriter<Stdout>>,
    entered: bool,
}

impl CrosstermTerminal {
    /// Create a terminal writing to stdout with the given color mode.
    #[must_use]
    pub fn new(color_mode: ColorMode) -> Self {
        Self {
            writer: TerminalWriter::with_color_mode(
                BufWriter::with_capacity(8192, io::stdout()),
                color_mode,
            ),
            entered: false,
        }
    }

    /// The diffing writer behind this terminal.
    pub const fn writer(&self) -> &TerminalWriter<BufWriter<Stdout>> {
        &self.writer
    }
}

impl Terminal for CrosstermTerminal {
    fn enter(&mut self) -> Result<(), TuiError> {
        if self.entered {
            return Ok(());
        }
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.writer.reset();
        self.entered = true;
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TuiError> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        Surface::flush(&mut self.writer)?;
        let _ = execute!(io::stdout(), ResetColor, cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        Ok(())
    }

    fn size(&self) -> Option<(u16, u16)> {
        crossterm::terminal::size()
            .ok()
            .filter(|&(width, height)| width > 0 && height > 0)
    }

    fn set_extent(&mut self, width: u16, height: u16) {
        self.writer.set_extent(Some(Rect::from_extent(width, height)));
    }

    fn clear(&mut self, back: Color) -> Result<(), TuiError> {
        self.writer.clear_screen(back)?;
        Ok(())
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.writer
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// In-memory terminal for tests.
#[derive(Debug)]
pub struct TestableTerminal {
    surface: RecordingSurface,
    size: Option<(u16, u16)>,
    entered: bool,
    enter_count: usize,
    clear_count: usize,
}

impl TestableTerminal {
    /// Terminal reporting `width` x `height`.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            surface: RecordingSurface::new(width, height),
            size: Some((width, height)),
            entered: false,
            enter_count: 0,
            clear_count: 0,
        }
    }

    /// Terminal whose size query fails. Paints land on a `width` x `height`
    /// surface.
    #[must_use]
    pub fn without_size(width: u16, height: u16) -> Self {
        Self {
            size: None,
            ..Self::new(width, height)
        }
    }

    /// Change the reported size (as a resize would).
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = Some((width, height));
    }

    /// Everything painted so far.
    #[must_use]
    pub const fn recording(&self) -> &RecordingSurface {
        &self.surface
    }

    /// Mutable access, e.g. to clear the write log between steps.
    pub fn recording_mut(&mut self) -> &mut RecordingSurface {
        &mut self.surface
    }

    /// Whether the terminal is between `enter` and `leave`.
    #[must_use]
    pub const fn is_entered(&self) -> bool {
        self.entered
    }

    /// Number of `enter` calls that took effect.
    #[must_use]
    pub const fn enter_count(&self) -> usize {
        self.enter_count
    }

    /// Number of screen clears.
    #[must_use]
    pub const fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl Terminal for TestableTerminal {
    fn enter(&mut self) -> Result<(), TuiError> {
        if !self.entered {
            self.entered = true;
            self.enter_count += 1;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TuiError> {
        self.entered = false;
        Ok(())
    }

    fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    fn set_extent(&mut self, width: u16, height: u16) {
        if self.surface.bounds() != Rect::from_extent(width, height) {
            self.surface = RecordingSurface::new(width, height);
        }
    }

    fn clear(&mut self, back: Color) -> Result<(), TuiError> {
        let bounds = self.surface.bounds();
        self.surface = RecordingSurface::new(bounds.width, bounds.height);
        self.surface.fill(bounds, None, Color::DEFAULT_FORE, back)?;
        self.surface.clear_log();
        self.clear_count += 1;
        Ok(())
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }
}

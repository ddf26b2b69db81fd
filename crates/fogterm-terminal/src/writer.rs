//! Differential terminal writer.
//!
//! Minimizes escape sequences by:
//! - Skipping cursor moves when the cursor is already in place
//! - Skipping color changes when the color is already active
//! - Clipping text before it reaches the terminal

use crate::color::ColorMode;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use fogterm_core::{clip_text, text_width, Color, Rect, Surface};
use std::io::{self, Write};
use tracing::trace;

/// Counters for the escape sequences a writer emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Text fragments printed.
    pub writes: usize,
    /// Cursor position commands.
    pub cursor_moves: usize,
    /// Foreground and background color commands.
    pub color_changes: usize,
}

/// [`Surface`] that writes straight to a terminal stream.
///
/// Remembers the last cursor position and colors it emitted; state that is
/// unknown (after creation, [`TerminalWriter::reset`] or a line wrap) is
/// always re-emitted.
#[derive(Debug)]
pub struct TerminalWriter<W: Write> {
    writer: W,
    color_mode: ColorMode,
    extent: Option<Rect>,
    cursor: Option<(u16, u16)>,
    fore: Option<Color>,
    back: Option<Color>,
    stats: WriterStats,
}

impl<W: Write> TerminalWriter<W> {
    /// Create a writer with an auto-detected color mode.
    pub fn new(writer: W) -> Self {
        Self::with_color_mode(writer, ColorMode::detect())
    }

    /// Create a writer with a specific color mode.
    pub const fn with_color_mode(writer: W, color_mode: ColorMode) -> Self {
        Self {
            writer,
            color_mode,
            extent: None,
            cursor: None,
            fore: None,
            back: None,
            stats: WriterStats {
                writes: 0,
                cursor_moves: 0,
                color_changes: 0,
            },
        }
    }

    /// Get the color mode.
    #[must_use]
    pub const fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Set the color mode. Cached colors are dropped.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        self.fore = None;
        self.back = None;
    }

    /// Terminal area every write is additionally clipped to.
    #[must_use]
    pub const fn extent(&self) -> Option<Rect> {
        self.extent
    }

    /// Set the terminal area. `None` disables the extra clipping.
    pub fn set_extent(&mut self, extent: Option<Rect>) {
        self.extent = extent;
    }

    /// Last cursor position the writer knows about.
    #[must_use]
    pub const fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Counters since creation or the last [`TerminalWriter::reset`].
    #[must_use]
    pub const fn stats(&self) -> WriterStats {
        self.stats
    }

    /// Forget cached cursor and colors and zero the counters.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.fore = None;
        self.back = None;
        self.stats = WriterStats::default();
    }

    /// Clear the whole screen to `back` and forget the cached state.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the stream fails.
    pub fn clear_screen(&mut self, back: Color) -> io::Result<()> {
        queue!(
            self.writer,
            ResetColor,
            SetBackgroundColor(self.color_mode.to_crossterm(back)),
            Clear(ClearType::All)
        )?;
        self.cursor = None;
        self.fore = None;
        self.back = Some(back);
        Ok(())
    }

    /// Borrow the underlying stream.
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn clip<'a>(
        &self,
        left: u16,
        top: u16,
        text: &'a str,
        clip: Option<Rect>,
    ) -> Option<(u16, &'a str)> {
        let (left, text) = match clip {
            Some(clip) => clip_text(left, top, text, &clip)?,
            None => (left, text),
        };
        match self.extent {
            Some(extent) => clip_text(left, top, text, &extent),
            None => (!text.is_empty()).then_some((left, text)),
        }
    }
}

impl<W: Write> Surface for TerminalWriter<W> {
    fn write(
        &mut self,
        left: u16,
        top: u16,
        text: &str,
        clip: Option<Rect>,
        fore: Color,
        back: Color,
    ) -> io::Result<()> {
        let Some((left, visible)) = self.clip(left, top, text, clip) else {
            return Ok(());
        };

        if self.cursor != Some((left, top)) {
            queue!(self.writer, MoveTo(left, top))?;
            self.stats.cursor_moves += 1;
        }
        if self.fore != Some(fore) {
            queue!(self.writer, SetForegroundColor(self.color_mode.to_crossterm(fore)))?;
            self.fore = Some(fore);
            self.stats.color_changes += 1;
        }
        if self.back != Some(back) {
            queue!(self.writer, SetBackgroundColor(self.color_mode.to_crossterm(back)))?;
            self.back = Some(back);
            self.stats.color_changes += 1;
        }
        queue!(self.writer, Print(visible))?;
        self.stats.writes += 1;

        let advanced = usize::from(left) + text_width(visible);
        self.cursor = match self.extent {
            // the terminal wraps or parks the cursor at the last column
            Some(extent) if advanced >= usize::from(extent.right()) => None,
            _ => u16::try_from(advanced).ok().map(|column| (column, top)),
        };
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        trace!(
            writes = self.stats.writes,
            cursor_moves = self.stats.cursor_moves,
            color_changes = self.stats.color_changes,
            "terminal writer flush"
        );
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogterm_core::{BoxStyle, CharacterSet};
    use proptest::prelude::*;

    fn writer() -> TerminalWriter<Vec<u8>> {
        TerminalWriter::with_color_mode(Vec::new(), ColorMode::TrueColor)
    }

    fn output(writer: &TerminalWriter<Vec<u8>>) -> String {
        String::from_utf8_lossy(writer.get_ref()).into_owned()
    }

    #[test]
    fn test_writer_creation() {
        let w = writer();
        assert_eq!(w.cursor(), None);
        assert_eq!(w.stats(), WriterStats::default());
        assert_eq!(w.color_mode(), ColorMode::TrueColor);
    }

    #[test]
    fn test_first_write_emits_full_state() {
        let mut w = writer();
        w.write(2, 1, "abc", None, Color::WHITE, Color::BLACK).unwrap();
        let stats = w.stats();
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.cursor_moves, 1);
        assert_eq!(stats.color_changes, 2);
        assert_eq!(w.cursor(), Some((5, 1)));
        assert!(output(&w).contains("abc"));
    }

    #[test]
    fn test_rewrite_same_spot_only_moves_cursor() {
        let mut w = writer();
        w.write(0, 0, "ab", None, Color::WHITE, Color::BLACK).unwrap();
        let before = w.stats();
        w.write(0, 0, "ab", None, Color::WHITE, Color::BLACK).unwrap();
        let after = w.stats();
        assert_eq!(after.color_changes, before.color_changes);
        // Position after the first write is (2, 0), so returning to (0, 0)
        // is the only command.
        assert_eq!(after.cursor_moves, before.cursor_moves + 1);
    }

    #[test]
    fn test_contiguous_writes_skip_cursor_move() {
        let mut w = writer();
        w.write(0, 0, "ab", None, Color::WHITE, Color::BLACK).unwrap();
        w.write(2, 0, "cd", None, Color::WHITE, Color::BLACK).unwrap();
        let stats = w.stats();
        assert_eq!(stats.writes, 2);
        assert_eq!(stats.cursor_moves, 1);
        assert_eq!(stats.color_changes, 2);
    }

    #[test]
    fn test_only_changed_color_is_emitted() {
        let mut w = writer();
        w.write(0, 0, "a", None, Color::WHITE, Color::BLACK).unwrap();
        w.write(1, 0, "b", None, Color::RED, Color::BLACK).unwrap();
        assert_eq!(w.stats().color_changes, 3);
    }

    #[test]
    fn test_clip_drops_text_past_right_edge() {
        let mut w = writer();
        let clip = Rect::new(0, 0, 5, 1);
        w.write(5, 0, "xyz", Some(clip), Color::WHITE, Color::BLACK).unwrap();
        assert_eq!(w.stats().writes, 0);
        assert!(w.get_ref().is_empty());
    }

    #[test]
    fn test_clip_truncates_and_advances_by_visible_width() {
        let mut w = writer();
        let clip = Rect::new(0, 0, 6, 1);
        w.write(3, 0, "abcdef", Some(clip), Color::WHITE, Color::BLACK).unwrap();
        assert_eq!(w.cursor(), Some((6, 0)));
        let out = output(&w);
        assert!(out.contains("abc"));
        assert!(!out.contains("abcd"));
    }

    #[test]
    fn test_extent_wraps_cursor_to_unknown() {
        let mut w = writer();
        w.set_extent(Some(Rect::from_extent(4, 2)));
        w.write(0, 0, "abcdef", None, Color::WHITE, Color::BLACK).unwrap();
        assert_eq!(w.cursor(), None);
        w.write(4, 0, "x", None, Color::WHITE, Color::BLACK).unwrap();
        assert_eq!(w.stats().writes, 1);
    }

    #[test]
    fn test_reset_forgets_state() {
        let mut w = writer();
        w.write(0, 0, "a", None, Color::WHITE, Color::BLACK).unwrap();
        w.reset();
        assert_eq!(w.cursor(), None);
        assert_eq!(w.stats(), WriterStats::default());
        w.write(1, 0, "b", None, Color::WHITE, Color::BLACK).unwrap();
        assert_eq!(w.stats().cursor_moves, 1);
        assert_eq!(w.stats().color_changes, 2);
    }

    #[test]
    fn test_clear_screen_keeps_background() {
        let mut w = writer();
        w.clear_screen(Color::DARK_BLUE).unwrap();
        w.write(0, 0, "a", None, Color::WHITE, Color::DARK_BLUE).unwrap();
        assert_eq!(w.stats().color_changes, 1);
    }

    #[test]
    fn test_set_color_mode_drops_cached_colors() {
        let mut w = writer();
        w.write(0, 0, "a", None, Color::WHITE, Color::BLACK).unwrap();
        w.set_color_mode(ColorMode::Color16);
        w.write(1, 0, "b", None, Color::WHITE, Color::BLACK).unwrap();
        assert_eq!(w.stats().color_changes, 4);
        assert_eq!(w.stats().cursor_moves, 1);
    }

    #[test]
    fn test_draw_box_merges_rows() {
        let mut w = writer();
        let charset = CharacterSet::single_line();
        let style = BoxStyle::filled(Color::WHITE, Color::BLACK);
        w.draw_box(Rect::new(0, 0, 4, 3), &charset, None, style).unwrap();
        assert_eq!(w.stats().writes, 3);
        assert_eq!(w.stats().color_changes, 2);
        assert!(output(&w).contains("┌──┐"));
    }

    #[test]
    fn test_flush_reaches_stream() {
        let mut w = writer();
        w.write(0, 0, "z", None, Color::WHITE, Color::BLACK).unwrap();
        w.flush().unwrap();
        assert!(output(&w).ends_with('z'));
    }

    proptest! {
        #[test]
        fn prop_overrun_is_truncated_to_remaining_width(
            clip_width in 1u16..40,
            offset in 0u16..40,
            len in 1usize..60,
        ) {
            let mut w = writer();
            let clip = Rect::new(0, 0, clip_width, 1);
            let text = "x".repeat(len);
            w.write(offset, 0, &text, Some(clip), Color::WHITE, Color::BLACK).unwrap();
            if offset >= clip_width {
                prop_assert_eq!(w.stats().writes, 0);
            } else {
                let expected = len.min(usize::from(clip_width - offset));
                prop_assert_eq!(w.cursor(), Some((offset + expected as u16, 0)));
            }
        }

        #[test]
        fn prop_same_state_never_repeats_color(count in 1usize..20) {
            let mut w = writer();
            for i in 0..count {
                w.write(i as u16, 0, "a", None, Color::GRAY, Color::BLACK).unwrap();
            }
            prop_assert_eq!(w.stats().color_changes, 2);
            prop_assert_eq!(w.stats().cursor_moves, 1);
        }
    }
}

//! Drawing surface abstraction.
//!
//! Drawers never talk to the terminal directly; they write positioned,
//! colored text into a [`Surface`]. The terminal backend implements it with
//! a state-diffing writer, tests use [`RecordingSurface`].

use crate::charset::CharacterSet;
use crate::color::Color;
use crate::geometry::Rect;
use std::io;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Colors used by [`Surface::draw_box`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxStyle {
    /// Edge foreground
    pub fore: Color,
    /// Edge background
    pub back: Color,
    /// Fill colors (`fore`, `back`); `None` leaves the inside untouched
    pub fill: Option<(Color, Color)>,
}

impl BoxStyle {
    /// Edges only.
    #[must_use]
    pub const fn outline(fore: Color, back: Color) -> Self {
        Self {
            fore,
            back,
            fill: None,
        }
    }

    /// Edges and inside share the same colors.
    #[must_use]
    pub const fn filled(fore: Color, back: Color) -> Self {
        Self {
            fore,
            back,
            fill: Some((fore, back)),
        }
    }
}

/// Target of all paint operations.
pub trait Surface {
    /// Write `text` starting at (`left`, `top`), clipped to `clip` if given.
    fn write(
        &mut self,
        left: u16,
        top: u16,
        text: &str,
        clip: Option<Rect>,
        fore: Color,
        back: Color,
    ) -> io::Result<()>;

    /// Draw a box outline (and optional fill) by composing [`Surface::write`].
    ///
    /// When the fill colors equal the edge colors each inner row is written
    /// as one contiguous string instead of three fragments.
    fn draw_box(
        &mut self,
        rect: Rect,
        charset: &CharacterSet,
        clip: Option<Rect>,
        style: BoxStyle,
    ) -> io::Result<()> {
        if rect.is_empty() {
            return Ok(());
        }

        let width = usize::from(rect.width);
        if rect.width < 2 || rect.height < 2 {
            if let Some((fore, back)) = style.fill {
                let line = charset.empty.to_string().repeat(width);
                for row in rect.top..rect.bottom() {
                    self.write(rect.left, row, &line, clip, fore, back)?;
                }
            }
            return Ok(());
        }

        let inner = width - 2;
        let horizontal = charset.horizontal.to_string().repeat(inner);
        let top_line = format!("{}{horizontal}{}", charset.top_left, charset.top_right);
        let bottom_line = format!("{}{horizontal}{}", charset.bottom_left, charset.bottom_right);
        let vertical = charset.vertical.to_string();
        let right_edge = rect.right() - 1;

        self.write(rect.left, rect.top, &top_line, clip, style.fore, style.back)?;

        let blank = charset.empty.to_string().repeat(inner);
        let merged = format!("{vertical}{blank}{vertical}");
        for row in rect.top + 1..rect.bottom() - 1 {
            match style.fill {
                Some((fore, back)) if fore == style.fore && back == style.back => {
                    self.write(rect.left, row, &merged, clip, fore, back)?;
                }
                Some((fore, back)) => {
                    self.write(rect.left, row, &vertical, clip, style.fore, style.back)?;
                    self.write(rect.left + 1, row, &blank, clip, fore, back)?;
                    self.write(right_edge, row, &vertical, clip, style.fore, style.back)?;
                }
                None => {
                    self.write(rect.left, row, &vertical, clip, style.fore, style.back)?;
                    self.write(right_edge, row, &vertical, clip, style.fore, style.back)?;
                }
            }
        }

        self.write(
            rect.left,
            rect.bottom() - 1,
            &bottom_line,
            clip,
            style.fore,
            style.back,
        )
    }

    /// Paint every cell of `rect` with blanks in `back`.
    fn fill(&mut self, rect: Rect, clip: Option<Rect>, fore: Color, back: Color) -> io::Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let line = " ".repeat(usize::from(rect.width));
        for row in rect.top..rect.bottom() {
            self.write(rect.left, row, &line, clip, fore, back)?;
        }
        Ok(())
    }

    /// Push buffered output to its destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Display width of `text` in cells.
#[must_use]
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Clip a single-row write against `clip`.
///
/// Returns the column the visible part starts at and the visible slice, or
/// `None` when nothing of the text lies inside the rectangle. Characters
/// straddling an edge are dropped, never split.
#[must_use]
pub fn clip_text<'a>(left: u16, top: u16, text: &'a str, clip: &Rect) -> Option<(u16, &'a str)> {
    if top < clip.top || top >= clip.bottom() || left >= clip.right() {
        return None;
    }

    let mut column = u32::from(left);
    let mut start: Option<(u16, usize)> = None;
    let mut end = text.len();

    for (index, ch) in text.char_indices() {
        let width = ch.width().unwrap_or(0) as u32;
        if start.is_none() {
            if column >= u32::from(clip.left) {
                start = Some((column as u16, index));
            } else {
                column += width;
                continue;
            }
        }
        if column + width > u32::from(clip.right()) {
            end = index;
            break;
        }
        column += width;
    }

    let (start_column, start_index) = start?;
    let visible = &text[start_index..end];
    if visible.is_empty() {
        None
    } else {
        Some((start_column, visible))
    }
}

/// One call recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOp {
    /// Column after clipping
    pub left: u16,
    /// Row
    pub top: u16,
    /// Visible text after clipping
    pub text: String,
    /// Foreground
    pub fore: Color,
    /// Background
    pub back: Color,
}

/// A single recorded cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedCell {
    /// Glyph (`'\0'` marks the continuation of a wide glyph)
    pub symbol: char,
    /// Foreground
    pub fore: Color,
    /// Background
    pub back: Color,
}

impl Default for RecordedCell {
    fn default() -> Self {
        Self {
            symbol: ' ',
            fore: Color::DEFAULT_FORE,
            back: Color::DEFAULT_BACK,
        }
    }
}

/// In-memory surface that records every write into a cell grid.
///
/// Writes are clipped against the caller's rectangle and then against the
/// grid itself, like a real terminal would do.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u16,
    height: u16,
    cells: Vec<RecordedCell>,
    writes: Vec<WriteOp>,
    flushes: usize,
}

impl RecordingSurface {
    /// Create a blank grid.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![RecordedCell::default(); usize::from(width) * usize::from(height)],
            writes: Vec::new(),
            flushes: 0,
        }
    }

    /// Grid extent as a rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::from_extent(self.width, self.height)
    }

    /// Cell at (`column`, `row`).
    #[must_use]
    pub fn cell(&self, column: u16, row: u16) -> Option<RecordedCell> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.cells
            .get(usize::from(row) * usize::from(self.width) + usize::from(column))
            .copied()
    }

    /// Text of one row, continuation cells skipped.
    #[must_use]
    pub fn row_text(&self, row: u16) -> String {
        (0..self.width)
            .filter_map(|column| self.cell(column, row))
            .map(|cell| cell.symbol)
            .filter(|&c| c != '\0')
            .collect()
    }

    /// All recorded writes in order.
    #[must_use]
    pub fn writes(&self) -> &[WriteOp] {
        &self.writes
    }

    /// Number of recorded writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Number of flushes.
    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Forget the write log, keep the cells.
    pub fn clear_log(&mut self) {
        self.writes.clear();
    }
}

impl Surface for RecordingSurface {
    fn write(
        &mut self,
        left: u16,
        top: u16,
        text: &str,
        clip: Option<Rect>,
        fore: Color,
        back: Color,
    ) -> io::Result<()> {
        let (left, text) = match clip {
            Some(clip) => match clip_text(left, top, text, &clip) {
                Some(visible) => visible,
                None => return Ok(()),
            },
            None => (left, text),
        };

        self.writes.push(WriteOp {
            left,
            top,
            text: text.to_string(),
            fore,
            back,
        });

        let Some((left, text)) = clip_text(left, top, text, &self.bounds()) else {
            return Ok(());
        };
        let row_start = usize::from(top) * usize::from(self.width);
        let mut column = usize::from(left);
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            self.cells[row_start + column] = RecordedCell {
                symbol: ch,
                fore,
                back,
            };
            for offset in 1..width {
                self.cells[row_start + column + offset] = RecordedCell {
                    symbol: '\0',
                    fore,
                    back,
                };
            }
            column += width;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

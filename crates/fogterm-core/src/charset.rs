//! Box-drawing character sets.

/// Characters used to draw boxes and box connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSet {
    /// ┌
    pub top_left: char,
    /// ┐
    pub top_right: char,
    /// └
    pub bottom_left: char,
    /// ┘
    pub bottom_right: char,
    /// │
    pub vertical: char,
    /// ─
    pub horizontal: char,
    /// ┴
    pub horizontal_up: char,
    /// ┬
    pub horizontal_down: char,
    /// ├
    pub vertical_right: char,
    /// ┤
    pub vertical_left: char,
    /// ┼
    pub cross: char,
    /// Fill character for the inside of a box
    pub empty: char,
}

impl CharacterSet {
    /// Every glyph is a space. Drawing a filled box with it paints a
    /// solid rectangle in the background color.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            top_left: ' ',
            top_right: ' ',
            bottom_left: ' ',
            bottom_right: ' ',
            vertical: ' ',
            horizontal: ' ',
            horizontal_up: ' ',
            horizontal_down: ' ',
            vertical_right: ' ',
            vertical_left: ' ',
            cross: ' ',
            empty: ' ',
        }
    }

    /// Plain ASCII set for terminals without line-drawing glyphs.
    #[must_use]
    pub const fn simple() -> Self {
        Self {
            top_left: '.',
            top_right: '.',
            bottom_left: '`',
            bottom_right: '\'',
            vertical: '|',
            horizontal: '-',
            horizontal_up: '+',
            horizontal_down: '+',
            vertical_right: '+',
            vertical_left: '+',
            cross: '+',
            empty: ' ',
        }
    }

    /// Single-line box-drawing set.
    #[must_use]
    pub const fn single_line() -> Self {
        Self {
            top_left: '\u{250C}',
            top_right: '\u{2510}',
            bottom_left: '\u{2514}',
            bottom_right: '\u{2518}',
            vertical: '\u{2502}',
            horizontal: '\u{2500}',
            horizontal_up: '\u{2534}',
            horizontal_down: '\u{252C}',
            vertical_right: '\u{251C}',
            vertical_left: '\u{2524}',
            cross: '\u{253C}',
            empty: ' ',
        }
    }

    /// Double-line box-drawing set.
    #[must_use]
    pub const fn double_line() -> Self {
        Self {
            top_left: '\u{2554}',
            top_right: '\u{2557}',
            bottom_left: '\u{255A}',
            bottom_right: '\u{255D}',
            vertical: '\u{2551}',
            horizontal: '\u{2550}',
            horizontal_up: '\u{2569}',
            horizontal_down: '\u{2566}',
            vertical_right: '\u{2560}',
            vertical_left: '\u{2563}',
            cross: '\u{256C}',
            empty: ' ',
        }
    }
}

impl Default for CharacterSet {
    fn default() -> Self {
        Self::single_line()
    }
}

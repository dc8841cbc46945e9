//! Buffer: A grid of cells representing the terminal screen.
//!
//! Cells are stored in row-major order in one contiguous `Vec`, so the cell
//! at `(x, y)` lives at `y * width + x`. Widgets draw into a back buffer
//! that the renderer diffs against the previous frame.
//!
//! A wide grapheme occupies two cells: the lead cell holds the character
//! and the cell to its right is a continuation placeholder. Readers such as
//! [`Buffer::row_text`] skip continuations.

use super::cell::{Cell, Modifiers, Rgb};
use crate::layout::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Style applied when drawing text.
///
/// Widgets usually keep their styles as `const` items and hand them to
/// [`Buffer::put_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Rgb,
    /// Background color.
    pub bg: Rgb,
    /// Style modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// Default colors, no modifiers.
    pub const PLAIN: Self = Self::new(Rgb::DEFAULT_FG, Rgb::DEFAULT_BG);

    /// Style with the given colors.
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            modifiers: Modifiers::empty(),
        }
    }

    /// Replace the modifiers, keeping the colors.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// A cell drawing `ch` in this style.
    fn cell(self, ch: char) -> Cell {
        Cell::new(ch)
            .with_fg(self.fg)
            .with_bg(self.bg)
            .with_modifiers(self.modifiers)
    }
}

/// A grid of cells representing the terminal screen.
///
/// Coordinates are `u16` columns and rows from the top-left corner. Writes
/// outside the grid are ignored rather than reported as errors, which lets
/// widgets draw without clipping every call themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Buffer {
    /// Create a blank buffer.
    ///
    /// Every cell starts as [`Cell::EMPTY`]. Zero dimensions are allowed
    /// and hold no cells; the renderer sees one before the first resize.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full area of the buffer, anchored at the origin.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Total number of cells, `width * height`.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the buffer has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The underlying cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Linear index of `(x, y)` into [`cells`](Self::cells).
    ///
    /// Returns `None` when either coordinate is past the edge.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Cell at `(x, y)`, or `None` out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set the cell at `(x, y)`.
    ///
    /// Returns `false` and leaves the buffer untouched if out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Reset every cell to [`Cell::EMPTY`]. Dimensions are kept.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change the dimensions.
    ///
    /// Content is discarded, not reflowed: every cell is blank afterwards.
    /// The renderer redraws the whole frame after a resize anyway.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Fill a rectangle with copies of `cell`.
    ///
    /// The rectangle is clipped to the buffer first, so a rect that hangs
    /// off the edge fills only its visible part and a rect entirely outside
    /// does nothing.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let rect = rect.intersection(&self.area());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Draw `text` on row `y` from column `x`, never past `max_x` (exclusive).
    ///
    /// `max_x` is also clamped to the buffer width. Text is walked by
    /// grapheme cluster and each cluster is drawn as its first `char`:
    ///
    /// - A cluster is one or two columns wide. Zero-width clusters still
    ///   take one column.
    /// - A two-column cluster writes a continuation cell to its right.
    /// - Control characters, including `\n` and `\t`, are drawn as spaces.
    /// - Drawing stops at the first cluster that does not fit entirely, so a
    ///   wide cluster straddling `max_x` is dropped and the last column is
    ///   left as it was.
    ///
    /// Returns the column after the last drawn cluster, which is where the
    /// next call should continue. A row `y` outside the buffer draws
    /// nothing but still advances the returned column.
    ///
    /// ```
    /// use paddock::buffer::{Buffer, Style};
    ///
    /// let mut buffer = Buffer::new(8, 1);
    /// let end = buffer.put_str(1, 0, 8, "日x", Style::PLAIN);
    /// assert_eq!(end, 4);
    /// assert_eq!(buffer.row_text(0), " 日x    ");
    /// ```
    pub fn put_str(&mut self, x: u16, y: u16, max_x: u16, text: &str, style: Style) -> u16 {
        let max_x = max_x.min(self.width);
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let Some(ch) = grapheme.chars().next() else {
                continue;
            };
            let ch = if ch.is_control() { ' ' } else { ch };
            let width = u16::try_from(grapheme.width()).unwrap_or(1).clamp(1, 2);
            if col + width > max_x {
                break;
            }
            let cell = style.cell(ch);
            self.set(col, y, cell);
            if width == 2 {
                self.set(col + 1, y, Cell::continuation_of(&cell));
            }
            col += width;
        }
        col
    }

    /// Read back row `y` as a string.
    ///
    /// Continuation cells are skipped, so a wide character appears once and
    /// the string has fewer `char`s than the row has columns. Rows past the
    /// bottom read as an empty string. Styles are not included.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .filter(|c| !c.is_continuation())
            .map(Cell::ch)
            .collect()
    }

    /// Make this buffer a copy of `other`.
    ///
    /// Same-sized buffers copy cell storage in place without allocating.
    /// Otherwise the dimensions are taken from `other` as well.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }
}

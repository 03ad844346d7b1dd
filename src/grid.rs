//! Square grid layout and rendering.
//!
//! [`layout`] arranges `item_count` equally sized square cells into a fixed
//! number of columns, row-major, inside a container of known width. Cells are
//! `floor(width / columns)` wide, so they are always equal integer sizes and
//! never overflow the container. A narrow margin may stay unused on the right.
//!
//! [`SquareGrid`] is the component the countdown screen instantiates once per
//! unit (hours, minutes, seconds). It lays out its squares with [`layout`] and
//! paints each one as a shaded colored block. Squares removed by the latest
//! tick can be kept for one frame as dim outlines, so a square fades out
//! instead of vanishing.
//!
//! # Examples
//!
//! ```rust
//! use square_countdown::grid::{layout, ContainerWidth};
//!
//! let grid = layout(10, 23, ContainerWidth::Bounded(301)).unwrap();
//! assert_eq!(grid.cell_size, 30);
//! assert_eq!(grid.rows, 3);
//! assert_eq!(grid.container_height, 90);
//! assert_eq!((grid.positions[22].x, grid.positions[22].y), (60, 60));
//! ```

use crate::error::{Error, Result};
use lipgloss_extras::prelude::*;

/// Width available to a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerWidth {
    /// A known, finite width.
    Bounded(usize),
    /// No width is known yet, e.g. before the terminal reported its size.
    #[default]
    Unbounded,
}

impl From<usize> for ContainerWidth {
    fn from(width: usize) -> Self {
        ContainerWidth::Bounded(width)
    }
}

impl From<Option<usize>> for ContainerWidth {
    fn from(width: Option<usize>) -> Self {
        width.map_or(ContainerWidth::Unbounded, ContainerWidth::Bounded)
    }
}

/// Where one item lands in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    /// Item index, `0..item_count`.
    pub index: usize,
    /// `index % columns`.
    pub column: usize,
    /// `index / columns`.
    pub row: usize,
    /// Left offset, `column * cell_size`.
    pub x: usize,
    /// Top offset, `row * cell_size`.
    pub y: usize,
}

/// Result of laying out a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// Column count the layout was computed for.
    pub columns: usize,
    /// Side length of every cell.
    pub cell_size: usize,
    /// `ceil(item_count / columns)`.
    pub rows: usize,
    /// `rows * cell_size`.
    pub container_height: usize,
    /// One entry per item in ascending index order.
    pub positions: Vec<CellPosition>,
}

/// Lays out `item_count` square cells in `columns` columns.
///
/// Every item is forced to `cell_size x cell_size` regardless of its own size.
/// Placement is row-major: item `i` goes to column `i % columns`, row
/// `i / columns`. The function is pure, so equal inputs give equal outputs.
///
/// # Errors
///
/// - [`Error::ZeroColumns`] if `columns` is zero.
/// - [`Error::UnboundedContainer`] if the width is [`ContainerWidth::Unbounded`].
pub fn layout(
    columns: usize,
    item_count: usize,
    container_width: ContainerWidth,
) -> Result<GridLayout> {
    if columns == 0 {
        return Err(Error::ZeroColumns);
    }
    let width = match container_width {
        ContainerWidth::Bounded(width) => width,
        ContainerWidth::Unbounded => return Err(Error::UnboundedContainer),
    };

    let cell_size = width / columns;
    let rows = item_count.div_ceil(columns);
    let positions = (0..item_count)
        .map(|index| {
            let column = index % columns;
            let row = index / columns;
            CellPosition {
                index,
                column,
                row,
                x: column * cell_size,
                y: row * cell_size,
            }
        })
        .collect();

    Ok(GridLayout {
        columns,
        cell_size,
        rows,
        container_height: rows.saturating_mul(cell_size),
        positions,
    })
}

/// Terminal character cells are roughly twice as tall as they are wide.
const CHAR_ASPECT: usize = 2;

/// Fill glyphs from the top of a square to its bottom, full color fading out.
const SHADES: [char; 4] = ['█', '▓', '▒', '░'];

/// Fill glyph of a fading square.
const FADED: char = '░';

/// A grid of colored squares, one per counted unit.
///
/// Widths and cell sizes are measured in terminal columns. A square is drawn
/// `cell_size` columns wide and `cell_size / 2` lines tall (at least one line)
/// so it looks square on screen, with its last column left blank as a
/// separator.
#[derive(Debug, Clone)]
pub struct SquareGrid {
    /// Squares per row.
    pub columns: usize,
    /// Number of squares to show.
    pub count: usize,
    /// Squares drawn dim after the first `count`, the ones that just went away.
    pub fading: usize,
    /// Available width.
    pub width: ContainerWidth,
    /// Square color, anything `lipgloss::Color::from` accepts.
    pub color: String,
}

impl SquareGrid {
    /// Creates an empty grid with `columns` squares per row in `color`.
    pub fn new(columns: usize, color: impl Into<String>) -> Self {
        Self {
            columns,
            count: 0,
            fading: 0,
            width: ContainerWidth::Unbounded,
            color: color.into(),
        }
    }

    /// Sets a bounded available width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = ContainerWidth::Bounded(width);
        self
    }

    /// Sets the number of squares.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the number of squares.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    /// Sets the number of dim squares drawn after the live ones.
    pub fn with_fading(mut self, fading: usize) -> Self {
        self.fading = fading;
        self
    }

    /// Sets the number of dim squares drawn after the live ones.
    pub fn set_fading(&mut self, fading: usize) {
        self.fading = fading;
    }

    /// Sets the available width.
    pub fn set_width(&mut self, width: ContainerWidth) {
        self.width = width;
    }

    /// Lays out the live and fading squares.
    pub fn layout(&self) -> Result<GridLayout> {
        layout(self.columns, self.count.saturating_add(self.fading), self.width)
    }

    /// Number of text lines one square occupies.
    pub fn lines_per_cell(cell_size: usize) -> usize {
        (cell_size / CHAR_ASPECT).max(1)
    }

    /// Widest cell that still fits in `lines` text lines.
    pub fn max_cell_size(lines: usize) -> usize {
        lines.max(1) * CHAR_ASPECT + CHAR_ASPECT - 1
    }

    /// Renders the grid; one string with `rows * lines_per_cell` lines.
    ///
    /// An empty grid, or one whose cells are zero wide, renders as an empty string.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`layout`].
    pub fn view(&self) -> Result<String> {
        let grid = self.layout()?;
        if grid.positions.is_empty() || grid.cell_size == 0 {
            return Ok(String::new());
        }

        let style = Style::new().foreground(Color::from(self.color.as_str()));
        let faded_style = style.clone().faint(true);
        let lines_per_cell = Self::lines_per_cell(grid.cell_size);
        let (fill_width, separator) = if grid.cell_size > 1 {
            (grid.cell_size - 1, " ")
        } else {
            (1, "")
        };

        let mut lines = Vec::with_capacity(grid.rows * lines_per_cell);
        for row in grid.positions.chunks(grid.columns) {
            for line in 0..lines_per_cell {
                let shade = SHADES[line * SHADES.len() / lines_per_cell];
                let square = style.render(&shade.to_string().repeat(fill_width));
                let faded = faded_style.render(&FADED.to_string().repeat(fill_width));

                let mut text = String::new();
                let mut cursor = 0;
                for cell in row {
                    text.push_str(&" ".repeat(cell.x - cursor));
                    text.push_str(if cell.index < self.count { &square } else { &faded });
                    text.push_str(separator);
                    cursor = cell.x + grid.cell_size;
                }
                lines.push(text);
            }
        }
        Ok(lines.join("\n"))
    }
}

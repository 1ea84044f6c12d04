//! Fixed-size square coordinate space and occupancy queries.

use joyful_snake_core::{CellCoord, Heading};

/// Square grid of `side * side` cells addressed from the upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    side: u32,
}

impl Grid {
    /// Creates a grid with the provided side length.
    #[must_use]
    pub const fn new(side: u32) -> Self {
        Self { side }
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.side as u64 * self.side as u64
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.side && cell.row() < self.side
    }

    /// Reports whether any body segment sits on `cell`.
    #[must_use]
    pub fn is_occupied<'a, B>(&self, body: B, cell: CellCoord) -> bool
    where
        B: IntoIterator<Item = &'a CellCoord>,
    {
        body.into_iter().any(|segment| *segment == cell)
    }

    /// Cell one unit away along `heading`, or `None` when it leaves the grid.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, heading: Heading) -> Option<CellCoord> {
        cell.offset(heading).filter(|next| self.in_bounds(*next))
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let side = self.side;
        (0..side).flat_map(move |row| (0..side).map(move |column| CellCoord::new(column, row)))
    }
}

//! Logical world grid of material identifiers.
#![forbid(unsafe_code)]

use std::fmt;

/// Material identifier. Dense, zero-based, assigned in registration order.
pub type TileType = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} grid",
                x, y, width, height
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Dense `width x height` grid. Anything outside the extent reads as the
/// default material, so the grid behaves as if surrounded by it forever.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    default_material: TileType,
    cells: Vec<TileType>,
}

impl Grid {
    pub fn new(width: usize, height: usize, default_material: TileType) -> Self {
        Self {
            width,
            height,
            default_material,
            cells: vec![default_material; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn default_material(&self) -> TileType {
        self.default_material
    }

    #[inline]
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Returns the cell value, or the default material outside the extent.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> TileType {
        if !self.is_in_bounds(x, y) {
            return self.default_material;
        }
        self.cells[self.idx(x as usize, y as usize)]
    }

    /// Overwrites one cell. The value is not checked against any registry.
    pub fn set(&mut self, x: i32, y: i32, value: TileType) -> Result<(), GridError> {
        if !self.is_in_bounds(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let i = self.idx(x as usize, y as usize);
        self.cells[i] = value;
        Ok(())
    }

    /// Writes the default material back into one cell.
    pub fn erase(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        self.set(x, y, self.default_material)
    }

    /// Fills every cell with `value` and makes it the new default material,
    /// so samples past the edge agree with the refilled interior.
    pub fn reset(&mut self, value: TileType) {
        self.default_material = value;
        self.cells.fill(value);
    }

    /// Iterates `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, TileType)> + '_ {
        self.cells.iter().enumerate().map(move |(i, &v)| {
            ((i % self.width) as i32, (i / self.width) as i32, v)
        })
    }

    /// Largest value stored in any cell or used as the default.
    pub fn max_value(&self) -> TileType {
        self.cells
            .iter()
            .copied()
            .max()
            .unwrap_or(self.default_material)
            .max(self.default_material)
    }
}

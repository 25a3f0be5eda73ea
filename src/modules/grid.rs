use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::modules::error::GridError;

/// Quantity a sheep tries to graze per tick.
pub const GRAZE_AMOUNT: f64 = 10.0;

/// Row-major field of non-negative resource quantities, indexed `[y][x]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl ResourceGrid {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).ok_or(GridError::Empty)?;
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            for (column, value) in row.into_iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(GridError::InvalidQuantity {
                        row: row_idx,
                        column,
                        value,
                    });
                }
                cells.push(value);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse comma-separated rows, one row per non-blank line.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (row, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let values = line
                .split(',')
                .enumerate()
                .map(|(column, raw)| {
                    let raw = raw.trim();
                    raw.parse::<f64>().map_err(|_| GridError::Unparsable {
                        row,
                        column,
                        value: raw.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(values);
        }
        Self::from_rows(rows)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Quantity at a cell; cells beyond the loaded field hold nothing.
    pub fn read(&self, x: i32, y: i32) -> f64 {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or(0.0)
    }

    /// Remove up to `amount` from a cell and return what was actually taken.
    pub fn consume(&mut self, x: i32, y: i32, amount: f64) -> f64 {
        let Some(idx) = self.index(x, y) else {
            return 0.0;
        };
        let taken = self.cells[idx].min(amount.max(0.0));
        self.cells[idx] -= taken;
        taken
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    pub fn min_value(&self) -> f64 {
        self.cells.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Rows as nested vectors, the shape a heatmap renderer expects.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.cells.chunks(self.width).map(<[f64]>::to_vec).collect()
    }
}

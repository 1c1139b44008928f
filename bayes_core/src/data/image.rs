//! Shading alphabet and labeled image types.
//!
//! A pixel carries a [`Shading`]: an ordinal code into a small configured
//! alphabet such as {white, black} or {white, gray, black}. The mapping from
//! stream characters to codes is an explicit [`SymbolTable`] value handed to
//! the parser, so alternate alphabets need no recompilation.

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::error::{BayesError, BayesResult};

/// A discrete pixel-intensity category, stored as an ordinal code into the
/// configured alphabet. Code 0 is conventionally the unshaded (white) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shading(pub u8);

impl Shading {
    /// The ordinal code of this shading, usable as a dense array index.
    pub fn code(self) -> usize {
        self.0 as usize
    }
}

/// Maps stream characters to shading codes and fixes the alphabet size.
///
/// Codes must densely cover `0..shading_count` so that per-shading grids can
/// be indexed directly by code.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
    mapping: BTreeMap<char, Shading>,
    shading_count: usize,
}

impl SymbolTable {
    /// Build a table from `(character, code)` pairs.
    ///
    /// Fails if the table is empty or the codes leave gaps below the maximum.
    pub fn new(mappings: &[(char, u8)]) -> BayesResult<Self> {
        if mappings.is_empty() {
            return Err(BayesError::invalid_parameter(
                "symbol table",
                "[]",
                "at least one character mapping",
            ));
        }

        let mut mapping = BTreeMap::new();
        let mut seen = [false; 256];
        let mut max_code = 0u8;

        for &(symbol, code) in mappings {
            mapping.insert(symbol, Shading(code));
            seen[code as usize] = true;
            max_code = max_code.max(code);
        }

        for code in 0..=max_code {
            if !seen[code as usize] {
                return Err(BayesError::invalid_parameter(
                    "symbol table",
                    code.to_string(),
                    "shading codes densely covering 0..count",
                ));
            }
        }

        Ok(Self {
            mapping,
            shading_count: max_code as usize + 1,
        })
    }

    /// The default two-way alphabet: space is white, `+` and `#` are black.
    pub fn binary() -> Self {
        Self::new(&[(' ', 0), ('+', 1), ('#', 1)])
            .expect("built-in binary table is dense")
    }

    /// A three-way white/gray/black alphabet: space, `+`, and `#`.
    pub fn ternary() -> Self {
        Self::new(&[(' ', 0), ('+', 1), ('#', 2)])
            .expect("built-in ternary table is dense")
    }

    /// Number of distinct shading values in the alphabet.
    pub fn shading_count(&self) -> usize {
        self.shading_count
    }

    /// Encode one stream character, failing on characters outside the table.
    pub fn encode(&self, symbol: char, context: &str) -> BayesResult<Shading> {
        self.mapping
            .get(&symbol)
            .copied()
            .ok_or_else(|| BayesError::unknown_symbol(symbol.to_string(), context))
    }
}

/// A rectangular grid of shading values; height and width are both > 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    pixels: Array2<Shading>,
}

impl PixelGrid {
    /// Build a grid from row vectors, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<Shading>>) -> BayesResult<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(BayesError::dimension_mismatch(1, 0, "image height"));
        }

        let width = rows[0].len();
        if width == 0 {
            return Err(BayesError::dimension_mismatch(1, 0, "pixel row width"));
        }

        let mut flat = Vec::with_capacity(height * width);
        for row in &rows {
            if row.len() != width {
                return Err(BayesError::dimension_mismatch(
                    width,
                    row.len(),
                    "pixel row width",
                ));
            }
            flat.extend_from_slice(row);
        }

        let pixels = Array2::from_shape_vec((height, width), flat)
            .expect("row lengths were checked above");
        Ok(Self { pixels })
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// `(height, width)` of the grid.
    pub fn dimensions(&self) -> (usize, usize) {
        self.pixels.dim()
    }

    /// The shading at `(row, column)`.
    pub fn shading_at(&self, row: usize, column: usize) -> Shading {
        self.pixels[[row, column]]
    }

    /// Iterate `((row, column), shading)` in row-major order.
    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), Shading)> + '_ {
        self.pixels.indexed_iter().map(|(idx, &s)| (idx, s))
    }
}

/// A pixel grid plus its single-character class label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledImage {
    pub grid: PixelGrid,
    pub label: char,
}

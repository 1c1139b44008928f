//! Image corpus parsing.
//!
//! A corpus stream is a repeating sequence of one label line followed by H
//! pixel lines of width W. Neither H nor W is declared anywhere: the first
//! record fixes both ("first-image probe"), and every later record must match
//! them exactly. Parsing is a pure pass; any failure aborts with no partial
//! corpus retained.

use std::collections::HashMap;
use std::io::BufRead;

use crate::data::image::{LabeledImage, PixelGrid, Shading, SymbolTable};
use crate::error::{BayesError, BayesResult};

/// Labeled images grouped by class, with uniform dimensions across the whole
/// corpus. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct ImageCorpus {
    groups: HashMap<char, Vec<LabeledImage>>,
    labels: Vec<char>,
    size: usize,
    height: usize,
    width: usize,
    shading_count: usize,
}

impl ImageCorpus {
    /// Parse a corpus from a line-oriented reader using the given alphabet.
    ///
    /// The first record establishes the image height H and width W; every
    /// subsequent record is one label line plus exactly H rows of exactly W
    /// characters.
    pub fn parse<R: BufRead>(reader: R, symbols: &SymbolTable) -> BayesResult<Self> {
        let mut lines = reader.lines();

        let first_label_line = next_line(&mut lines)?
            .ok_or_else(|| BayesError::format("corpus stream is empty"))?;
        let first_label = label_of(&first_label_line)?;

        let first_row_line = next_line(&mut lines)?
            .ok_or_else(|| BayesError::format("stream ended before the first pixel row"))?;
        let width = first_row_line.chars().count();
        if width == 0 {
            return Err(BayesError::dimension_mismatch(1, 0, "pixel row width"));
        }

        // First-image probe: rows belong to the image as long as they keep the
        // width of the first row; the first line that breaks it is the next
        // record's label.
        let mut rows = vec![encode_row(&first_row_line, symbols, 0)?];
        let mut pending: Option<String> = None;
        while let Some(line) = next_line(&mut lines)? {
            if line.chars().count() == width {
                rows.push(encode_row(&line, symbols, rows.len())?);
            } else {
                pending = Some(line);
                break;
            }
        }
        let height = rows.len();

        let mut corpus = Self {
            groups: HashMap::new(),
            labels: Vec::new(),
            size: 0,
            height,
            width,
            shading_count: symbols.shading_count(),
        };
        corpus.push_image(first_label, rows)?;

        // Remaining records have a known shape: label line, then H rows of W.
        loop {
            let label_line = match pending.take() {
                Some(line) => line,
                None => match next_line(&mut lines)? {
                    Some(line) => line,
                    None => break,
                },
            };
            let label = label_of(&label_line)?;

            let mut rows = Vec::with_capacity(height);
            for row_index in 0..height {
                let line = next_line(&mut lines)?.ok_or_else(|| {
                    BayesError::dimension_mismatch(height, row_index, "image height")
                })?;
                let line_width = line.chars().count();
                if line_width != width {
                    return Err(BayesError::dimension_mismatch(
                        width,
                        line_width,
                        "pixel row width",
                    ));
                }
                rows.push(encode_row(&line, symbols, row_index)?);
            }

            corpus.push_image(label, rows)?;
        }

        Ok(corpus)
    }

    fn push_image(&mut self, label: char, rows: Vec<Vec<Shading>>) -> BayesResult<()> {
        let grid = PixelGrid::from_rows(rows)?;
        let group = self.groups.entry(label).or_insert_with(|| {
            self.labels.push(label);
            Vec::new()
        });
        group.push(LabeledImage { grid, label });
        self.size += 1;
        Ok(())
    }

    /// All images belonging to one class, in stream order.
    pub fn group(&self, label: char) -> Option<&[LabeledImage]> {
        self.groups.get(&label).map(|images| images.as_slice())
    }

    /// Distinct labels in the order they were first observed in the stream.
    pub fn labels(&self) -> &[char] {
        &self.labels
    }

    /// Total number of images across all groups.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// `(height, width)` shared by every image in the corpus.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Size of the shading alphabet the corpus was parsed with.
    pub fn shading_count(&self) -> usize {
        self.shading_count
    }

    /// Iterate every image in corpus order: groups in first-seen label order,
    /// images in stream order within each group.
    pub fn iter(&self) -> impl Iterator<Item = &LabeledImage> {
        self.labels
            .iter()
            .filter_map(move |label| self.groups.get(label))
            .flatten()
    }
}

fn next_line(lines: &mut std::io::Lines<impl BufRead>) -> BayesResult<Option<String>> {
    match lines.next() {
        Some(Ok(line)) => Ok(Some(line)),
        Some(Err(err)) => Err(BayesError::format(format!("stream read failed: {}", err))),
        None => Ok(None),
    }
}

fn label_of(label_line: &str) -> BayesResult<char> {
    label_line
        .chars()
        .next()
        .ok_or_else(|| BayesError::format("image record is missing a label"))
}

fn encode_row(line: &str, symbols: &SymbolTable, row_index: usize) -> BayesResult<Vec<Shading>> {
    let context = format!("pixel row {}", row_index);
    line.chars()
        .map(|symbol| symbols.encode(symbol, &context))
        .collect()
}

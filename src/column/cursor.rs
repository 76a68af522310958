// In: src/column/cursor.rs

//! One logical row position over a physically chunked column.
//!
//! A column read back from the container is an ordered sequence of chunks,
//! each a contiguous run of fixed length. `ChunkCursor` only knows those
//! lengths, so the same traversal serves every value type.

use arrow::array::ArrayRef;

#[derive(Debug, Clone)]
pub struct ChunkCursor {
    lengths: Vec<usize>,
    chunk_index: usize,
    /// `None` is the pre-first sentinel: the next `advance` lands on row 0.
    position: Option<usize>,
    exhausted: bool,
}

impl ChunkCursor {
    pub fn new(lengths: impl IntoIterator<Item = usize>) -> Self {
        Self {
            lengths: lengths.into_iter().collect(),
            chunk_index: 0,
            position: None,
            exhausted: false,
        }
    }

    /// A cursor over the lengths of Arrow chunks.
    pub fn over_arrays(chunks: &[ArrayRef]) -> Self {
        Self::new(chunks.iter().map(|chunk| chunk.len()))
    }

    /// Moves one logical row forward. Returns `false` once the sequence is
    /// exhausted, and keeps returning `false` until `reset`.
    ///
    /// Zero-length chunks are skipped in a loop, so any run of empty chunks
    /// (leading, trailing or consecutive) is transparent.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let mut position = self.position.map_or(0, |p| p + 1);
        loop {
            match self.lengths.get(self.chunk_index) {
                Some(&len) if position < len => {
                    self.position = Some(position);
                    return true;
                }
                Some(_) => {
                    self.chunk_index += 1;
                    position = 0;
                }
                None => {
                    self.position = None;
                    self.exhausted = true;
                    return false;
                }
            }
        }
    }

    /// Returns to `(0, sentinel)` so the next `advance` lands on row 0.
    pub fn reset(&mut self) {
        self.chunk_index = 0;
        self.position = None;
        self.exhausted = false;
    }

    /// `(chunk_index, position_within_chunk)` of the current row, if the
    /// cursor is on one.
    pub fn current(&self) -> Option<(usize, usize)> {
        self.position.map(|p| (self.chunk_index, p))
    }

    /// Total rows across all chunks.
    pub fn total_len(&self) -> usize {
        self.lengths.iter().sum()
    }
}

//! Stream relocator
//!
//! Walks a payload one little-endian word at a time and rewrites every word
//! that falls inside a translation entry. Memory use is one word plus the
//! table, so payload size is unbounded.

use log::debug;
use std::io::{ErrorKind, Read, Write};

use crate::domain::{RelocateError, WordWidth};
use crate::layout::TranslationTable;

/// Counters reported after a relocation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelocationStats {
    /// Full words read
    pub words: u64,
    /// Words rewritten with a shift
    pub relocated: u64,
    /// Bytes of a final partial word copied through unchanged
    pub trailing_bytes: usize,
}

/// Copy `input` to `output`, relocating every full word found in `table`
///
/// A final chunk shorter than the word width is written through untouched.
/// The output is flushed before returning.
///
/// # Errors
/// Returns [`RelocateError::Io`] on any read or write failure
pub fn relocate<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    table: &TranslationTable,
    width: WordWidth,
) -> Result<RelocationStats, RelocateError> {
    let mut buf = [0u8; 8];
    let word = &mut buf[..width.bytes()];
    let mut stats = RelocationStats::default();

    loop {
        let filled = fill_word(&mut input, word)?;
        if filled == 0 {
            break;
        }
        if filled < word.len() {
            output.write_all(&word[..filled])?;
            stats.trailing_bytes = filled;
            break;
        }

        stats.words += 1;
        let value = width.decode(word);
        if let Some(entry) = table.lookup(value) {
            width.encode(entry.apply(value), word);
            stats.relocated += 1;
        }
        output.write_all(word)?;
    }

    output.flush()?;
    debug!(
        "relocated {} of {} words ({} trailing bytes)",
        stats.relocated, stats.words, stats.trailing_bytes
    );
    Ok(stats)
}

/// Read until `word` is full or the input ends; returns bytes read
fn fill_word<R: Read>(input: &mut R, word: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < word.len() {
        match input.read(&mut word[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

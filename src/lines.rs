//! Splitting decoded text into lines

use crate::error::Result;

/// Groups scalar values into `\n`-terminated lines.
///
/// The terminator is stripped. Text after the last `\n` becomes a final line;
/// a source ending exactly at `\n` yields no trailing empty line. `\r` is
/// ordinary text. The first error ends the sequence.
pub struct LineReader<I> {
    chars: I,
    line_number: usize,
    done: bool,
}

impl<I> LineReader<I>
where
    I: Iterator<Item = Result<char>>,
{
    pub fn new(chars: I) -> Self {
        Self { chars, line_number: 0, done: false }
    }

    /// 1-based number of the last line returned (0 before the first)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn get_ref(&self) -> &I {
        &self.chars
    }

    pub fn get_mut(&mut self) -> &mut I {
        &mut self.chars
    }

    pub fn into_inner(self) -> I {
        self.chars
    }
}

impl<I> Iterator for LineReader<I>
where
    I: Iterator<Item = Result<char>>,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut line = String::new();
        loop {
            match self.chars.next() {
                Some(Ok('\n')) => break,
                Some(Ok(ch)) => line.push(ch),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if line.is_empty() {
                        return None;
                    }
                    break;
                }
            }
        }
        self.line_number += 1;
        Some(Ok(line))
    }
}

impl<I> std::iter::FusedIterator for LineReader<I> where I: Iterator<Item = Result<char>> {}

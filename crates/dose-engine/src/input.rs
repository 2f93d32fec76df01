//! Line-oriented input decoding.
//!
//! The stream consists of an optional three-line header (first dose duration,
//! second dose duration, gap; one integer per line) followed by request lines
//! of the form `first_window_start, first_window_end, gap_after_first,
//! second_window_width`. A line holding only [`SENTINEL`] ends the stream.
//! Blank lines are ignored everywhere.

use std::io::{BufRead, Lines};

use crate::config::{IndexBase, RunConfig};
use crate::error::{AllocError, Result};
use crate::request::{Request, RequestId};

/// Line that terminates the request stream.
pub const SENTINEL: &str = "x";

/// Decode one request line.
///
/// `line` is the 1-based line number, used in error messages. With
/// `IndexBase::One` both first-window bounds are shifted down by one.
///
/// # Errors
/// Returns `AllocError::Format` if the line is not exactly four non-negative
/// integers, and `AllocError::InvalidRequest` if the decoded window is empty
/// or a one-based bound is 0.
pub fn parse_request(line: usize, id: RequestId, text: &str, base: IndexBase) -> Result<Request> {
    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() != 4 {
        return Err(AllocError::Format {
            line,
            message: format!(
                "a request needs four comma-separated integers, found {} field(s)",
                fields.len()
            ),
        });
    }

    let mut values = [0usize; 4];
    for (slot, field) in values.iter_mut().zip(&fields) {
        *slot = parse_field(line, field)?;
    }
    let [window_start, window_end, gap_after_first, second_window_width] = values;

    let shift = |bound: usize| -> Result<usize> {
        bound
            .checked_sub(base.offset())
            .ok_or_else(|| AllocError::InvalidRequest {
                id,
                message: "one-based window bounds start at 1".to_string(),
            })
    };

    Request::new(
        id,
        shift(window_start)?,
        shift(window_end)?,
        gap_after_first,
        second_window_width,
    )
}

/// Decode a whole request list from text, assigning ids 1, 2, 3, ...
///
/// Stops at the sentinel line or at the end of the text. No header is read.
pub fn parse_requests(text: &str, base: IndexBase) -> Result<Vec<Request>> {
    RequestStream::new(text.as_bytes(), base).collect()
}

fn parse_field(line: usize, field: &str) -> Result<usize> {
    let trimmed = field.trim();
    trimmed.parse::<usize>().map_err(|_| AllocError::Format {
        line,
        message: format!("'{}' is not a non-negative integer", trimmed),
    })
}

/// Incremental reader over a header and request stream.
///
/// Iterating yields one request per non-blank line until the sentinel or end
/// of input. The iterator is fused after the first error.
pub struct RequestStream<R> {
    lines: Lines<R>,
    line: usize,
    next_id: usize,
    base: IndexBase,
    done: bool,
}

impl<R: BufRead> RequestStream<R> {
    pub fn new(reader: R, base: IndexBase) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            next_id: 1,
            base,
            done: false,
        }
    }

    /// Read the three-line run configuration header.
    ///
    /// # Errors
    /// Returns `AllocError::Format` if a header line is missing or not a single
    /// non-negative integer, and `AllocError::InvalidConfig` if a duration is 0.
    pub fn read_config(&mut self) -> Result<RunConfig> {
        let first_dose = self.read_header_value("first dose duration")?;
        let second_dose = self.read_header_value("second dose duration")?;
        let gap = self.read_header_value("gap")?;
        RunConfig::new(first_dose, second_dose, gap)
    }

    fn read_header_value(&mut self, what: &str) -> Result<usize> {
        match self.next_nonblank()? {
            Some(text) => parse_field(self.line, &text).map_err(|_| AllocError::Format {
                line: self.line,
                message: format!("expected the {} as a single integer, found '{}'", what, text.trim()),
            }),
            None => Err(AllocError::Format {
                line: self.line + 1,
                message: format!("input ended before the {}", what),
            }),
        }
    }

    fn next_nonblank(&mut self) -> Result<Option<String>> {
        for text in self.lines.by_ref() {
            let text = text?;
            self.line += 1;
            if !text.trim().is_empty() {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    fn next_request(&mut self) -> Result<Option<Request>> {
        let Some(text) = self.next_nonblank()? else {
            return Ok(None);
        };
        if text.trim() == SENTINEL {
            return Ok(None);
        }

        let id = RequestId(self.next_id);
        self.next_id += 1;
        parse_request(self.line, id, &text, self.base).map(Some)
    }
}

impl<R: BufRead> Iterator for RequestStream<R> {
    type Item = Result<Request>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_request() {
            Ok(Some(request)) => Some(Ok(request)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

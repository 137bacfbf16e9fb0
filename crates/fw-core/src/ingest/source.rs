//! Pull-based frame sources.
//!
//! [`FrameSource`] is the transport seam: the pipeline pulls frames one
//! at a time and never learns how they arrived. A broker client would
//! implement this trait; the repo ships a JSONL reader (files, stdin)
//! and the synthetic generator in [`super::simulate`].

use std::io::BufRead;

use tracing::warn;

use fw_common::{Error, Frame, Result};

use super::parse_frame;

/// One logical stream of frames, delivered in arrival order.
pub trait FrameSource {
    /// Next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Reads newline-delimited JSON frames from any `BufRead`.
///
/// Malformed lines are logged and skipped; only I/O failures end the
/// stream with an error.
pub struct JsonlSource<R: BufRead> {
    reader: R,
    line_no: u64,
    skipped: u64,
}

impl<R: BufRead> JsonlSource<R> {
    pub fn new(reader: R) -> Self {
        JsonlSource {
            reader,
            line_no: 0,
            skipped: 0,
        }
    }

    /// Lines dropped as malformed so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: BufRead> FrameSource for JsonlSource<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.reader.read_line(&mut line).map_err(Error::Io)?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match parse_frame(trimmed, self.line_no) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    self.skipped += 1;
                    warn!(error = %e, "skipping malformed line");
                }
            }
        }
    }
}

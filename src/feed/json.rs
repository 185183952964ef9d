//! Line-delimited JSON emission sink.

use std::io::{self, Write};

use log::error;
use serde::Serialize;

use crate::dispatch::Sink;

/// Sink that writes each decoded message as one JSON document per line.
///
/// Write and serialization failures are logged and swallowed: a slow or
/// broken consumer must never stop the feed loop.
#[derive(Debug)]
pub struct JsonLineSink<W> {
    writer: W,
}

impl<W: Write> JsonLineSink<W> {
    /// Wrap a writer.
    #[must_use]
    pub fn new(writer: W) -> Self { Self { writer } }

    /// Consume the sink, returning its writer.
    #[must_use]
    pub fn into_inner(self) -> W { self.writer }
}

impl JsonLineSink<io::Stdout> {
    /// Sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self { Self::new(io::stdout()) }
}

impl<M: Serialize, W: Write> Sink<M> for JsonLineSink<W> {
    fn emit(&mut self, message: &M) {
        if let Err(err) = write_line(&mut self.writer, message) {
            error!("failed to emit record: {err}");
        }
    }
}

fn write_line<M: Serialize>(writer: &mut impl Write, message: &M) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, message)?;
    writer.write_all(b"\n")
}

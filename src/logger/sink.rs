use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Destination for rendered records. Each call receives one complete line, newline included.
pub trait Sink: Send {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()>;
}

/// Writes to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(line)?;
        stdout.flush()
    }
}

/// Adapts any writer.
#[derive(Debug)]
pub struct WriterSink<W>(pub W);

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.0.write_all(line)?;
        self.0.flush()
    }
}

/// Keeps every write in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each write as a separate string.
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .iter()
            .map(|write| String::from_utf8_lossy(write).into_owned())
            .collect()
    }

    pub fn contents(&self) -> String {
        self.writes().concat()
    }

    pub fn len(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.lock().is_empty()
    }

    pub fn clear(&self) {
        self.writes.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.writes.lock().push(line.to_vec());
        Ok(())
    }
}

use std::fs::File;
use std::io::{self, prelude::*};

/// Read a file into a mutable buffer, keeping count of the lines handed out
/// so parse errors can point at the offending line.
pub struct BufReader {
    reader: io::BufReader<File>,
    line: usize,
}

impl BufReader {
    /// Opens the file from the path into a reader
    pub fn open(path: impl AsRef<std::path::Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = io::BufReader::new(file);

        Ok(Self { reader, line: 0 })
    }

    /// The 1-based number of the last line read.
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Reads a line from the buffer reader to mutable string
    pub fn read_line<'buf>(
        &mut self,
        buffer: &'buf mut String,
    ) -> Option<io::Result<(&'buf mut String, usize)>> {
        buffer.clear();

        let read = self
            .reader
            .read_line(buffer)
            .map(|u| if u == 0 { None } else { Some((buffer, u)) })
            .transpose();
        if read.is_some() {
            self.line += 1;
        }
        read
    }
}

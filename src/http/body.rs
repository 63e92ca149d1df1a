//! Request body delivery

use crate::error::{Result, RestError};
use std::io::{self, Read, Seek, SeekFrom, Write};
use tempfile::SpooledTempFile;

/// Bodies up to this size stay in memory before spilling to a temp file.
pub const SPOOL_THRESHOLD: usize = 2 * 1024 * 1024;

/// A request body written to a spooled temp buffer and read back by the
/// transport with a declared length.
///
/// The buffer lives exactly as long as this value; dropping it releases the
/// memory or deletes the backing file.
#[derive(Debug)]
pub struct StreamedBody {
    buffer: SpooledTempFile,
    size: u64,
}

impl StreamedBody {
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let mut buffer = SpooledTempFile::new(SPOOL_THRESHOLD);
        Self::fill(&mut buffer, payload).map_err(RestError::BufferWrite)?;

        Ok(Self {
            buffer,
            size: payload.len() as u64,
        })
    }

    fn fill(buffer: &mut SpooledTempFile, payload: &[u8]) -> io::Result<()> {
        buffer.write_all(payload)?;
        buffer.flush()?;
        buffer.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Number of bytes the transport will read.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the buffer has spilled from memory to a file.
    pub fn is_rolled(&self) -> bool {
        self.buffer.is_rolled()
    }
}

impl Read for StreamedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buffer.read(buf)
    }
}

/// How the request body reaches the transport.
#[derive(Debug)]
pub enum RequestBody {
    None,
    /// Sent directly as in-memory fields.
    Fields(Vec<u8>),
    /// Read from a scoped buffer with an explicit length.
    Streamed(StreamedBody),
}

impl RequestBody {
    /// Declared body length in bytes.
    pub fn len(&self) -> u64 {
        match self {
            RequestBody::None => 0,
            RequestBody::Fields(bytes) => bytes.len() as u64,
            RequestBody::Streamed(body) => body.size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_streamed(&self) -> bool {
        matches!(self, RequestBody::Streamed(_))
    }
}

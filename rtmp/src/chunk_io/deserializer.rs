use crate::chunk_io::chunk_header::read_chunk_header_after;
use crate::chunk_io::{ChunkHeader, CompleteMessage, DecodeError, SessionState};
use byteorder::ReadBytesExt;
use std::io::{self, Read};

/// Reads RTMP chunks off of a byte source until one message has been fully reassembled.
///
/// Due to the nature of the RTMP chunk protocol every byte the peer sends must go through the
/// same `SessionState`, as later chunk headers are compressed against earlier ones.  Missing
/// bytes will cause decode errors or garbage messages.
pub struct ChunkDeserializer {
    chunk_buffer: Vec<u8>,
}

enum ParseStage {
    AwaitingHeader,
    AwaitingBody(ChunkHeader),
    Complete(CompleteMessage),
}

impl ChunkDeserializer {
    pub fn new() -> ChunkDeserializer {
        ChunkDeserializer {
            chunk_buffer: Vec::with_capacity(4096),
        }
    }

    /// Reads chunks until a message completes on any chunk stream.
    ///
    /// Returns `Ok(None)` if the source was already exhausted before the first byte of this
    /// call.  Running out of bytes anywhere else fails with `DecodeError::Truncated`.  Every
    /// byte consumed is counted in the session state, even when an error is returned.
    ///
    /// The receive chunk size is read from the session state before every chunk, so a
    /// `SetChunkSize` applied between two calls governs the very next chunk.
    pub fn read_message<R: Read>(
        &mut self,
        reader: &mut R,
        state: &mut SessionState,
    ) -> Result<Option<CompleteMessage>, DecodeError> {
        let mut reader = CountingReader {
            inner: reader,
            count: 0,
        };

        let result = self.read_chunks(&mut reader, state);
        state.add_bytes_received(reader.count);
        result
    }

    fn read_chunks<R: Read>(
        &mut self,
        reader: &mut R,
        state: &mut SessionState,
    ) -> Result<Option<CompleteMessage>, DecodeError> {
        let mut stage = ParseStage::AwaitingHeader;
        let mut is_first_chunk = true;

        loop {
            stage = match stage {
                ParseStage::AwaitingHeader => {
                    let first_byte = if is_first_chunk {
                        match read_first_byte(reader)? {
                            Some(byte) => byte,
                            None => return Ok(None),
                        }
                    } else {
                        reader.read_u8()?
                    };

                    is_first_chunk = false;
                    ParseStage::AwaitingBody(read_chunk_header_after(first_byte, reader, state)?)
                }

                ParseStage::AwaitingBody(header) => {
                    let length = state.next_chunk_length(&header);
                    self.chunk_buffer.resize(length, 0);
                    reader.read_exact(&mut self.chunk_buffer)?;

                    match state.feed(&header, &self.chunk_buffer) {
                        Some(message) => ParseStage::Complete(message),
                        None => ParseStage::AwaitingHeader,
                    }
                }

                ParseStage::Complete(message) => return Ok(Some(message)),
            };
        }
    }
}

impl Default for ChunkDeserializer {
    fn default() -> Self {
        ChunkDeserializer::new()
    }
}

/// Reads one byte, or `None` when the source is exhausted
fn read_first_byte<R: Read>(reader: &mut R) -> Result<Option<u8>, DecodeError> {
    let mut byte = [0_u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(ref error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        }
    }
}

struct CountingReader<'a, R> {
    inner: &'a mut R,
    count: u64,
}

impl<'a, R: Read> Read for CountingReader<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.count += read as u64;
        Ok(read)
    }
}

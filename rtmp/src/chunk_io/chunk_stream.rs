use crate::chunk_io::ChunkHeader;
use bytes::{Bytes, BytesMut};
use std::cmp::min;

const INITIAL_RESERVATION_CHUNKS: usize = 4;

/// A message whose body has been fully received, along with the header of its first chunk
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteMessage {
    pub header: ChunkHeader,
    pub data: Bytes,
}

/// Reassembly state for a single chunk stream.  Only reachable through `SessionState`.
#[derive(Debug, Default)]
pub(crate) struct ChunkStreamState {
    previous_header: Option<ChunkHeader>,
    message_header: Option<ChunkHeader>,
    partial: BytesMut,
}

impl ChunkStreamState {
    pub fn previous_header(&self) -> Option<&ChunkHeader> {
        self.previous_header.as_ref()
    }

    pub fn set_previous_header(&mut self, header: ChunkHeader) {
        self.previous_header = Some(header);
    }

    pub fn has_partial_message(&self) -> bool {
        self.message_header.is_some()
    }

    /// Number of body bytes the next chunk on this stream carries
    pub fn next_chunk_length(&self, header: &ChunkHeader, max_chunk_size: u32) -> usize {
        let remaining = (header.message_length as usize).saturating_sub(self.partial.len());
        min(remaining, max_chunk_size as usize)
    }

    /// Drops any bytes collected for the message in progress.  Returns how many were dropped.
    pub fn discard_partial(&mut self) -> usize {
        let dropped = self.partial.len();
        self.partial.clear();
        self.message_header = None;
        dropped
    }

    /// Adds a chunk body to the message in progress, returning the message once all of its
    /// declared bytes have arrived.
    pub fn feed(&mut self, header: &ChunkHeader, body: &[u8]) -> Option<CompleteMessage> {
        let message_length = header.message_length as usize;

        if self.message_header.is_none() {
            if body.len() >= message_length {
                return Some(CompleteMessage {
                    header: header.clone(),
                    data: Bytes::copy_from_slice(body),
                });
            }

            // Reservation is bounded by the bytes received, never by the declared length alone
            self.message_header = Some(header.clone());
            self.partial
                .reserve(min(message_length, body.len() * INITIAL_RESERVATION_CHUNKS));
        }

        self.partial.extend_from_slice(body);
        if self.partial.len() < message_length {
            return None;
        }

        let data = self.partial.split().freeze();
        let header = self.message_header.take().unwrap_or_else(|| header.clone());
        Some(CompleteMessage { header, data })
    }
}

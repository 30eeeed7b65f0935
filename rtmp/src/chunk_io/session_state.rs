use crate::chunk_io::chunk_stream::ChunkStreamState;
use crate::chunk_io::{ChunkHeader, ChunkHeaderFormat, CompleteMessage, DecodeError, EncodeError};
use crate::messages::{PeerBandwidthLimitType, RtmpMessage};
use crate::session::SessionConfig;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The largest chunk size either side may use.  The top bit of the SetChunkSize body is reserved.
pub const MAX_CHUNK_SIZE: u32 = 0x7FFF_FFFF;

/// Per connection protocol state: negotiated sizes, acknowledgement counters and the
/// reassembly state of every chunk stream seen on the connection.
///
/// Chunk stream states are kept in an arena indexed by chunk stream id.  Entries are created
/// the first time a chunk stream id is referenced and live as long as the connection.
#[derive(Debug)]
pub struct SessionState {
    receive_chunk_size: u32,
    send_chunk_size: u32,
    window_ack_size: u32,
    peer_bandwidth: u32,
    peer_bandwidth_limit_type: Option<PeerBandwidthLimitType>,
    peer_acknowledged_bytes: Option<u32>,
    bytes_received: u64,
    bytes_received_at_last_ack: u64,
    streams: Vec<ChunkStreamState>,
    stream_index: HashMap<u32, usize>,
}

impl SessionState {
    /// Fails if either chunk size in the config is zero or larger than 2147483647
    pub fn new(config: &SessionConfig) -> Result<SessionState, EncodeError> {
        for size in &[config.receive_chunk_size, config.send_chunk_size] {
            if *size == 0 || *size > MAX_CHUNK_SIZE {
                return Err(EncodeError::InvalidChunkSize { size: *size });
            }
        }

        Ok(SessionState {
            receive_chunk_size: config.receive_chunk_size,
            send_chunk_size: config.send_chunk_size,
            window_ack_size: config.window_ack_size,
            peer_bandwidth: config.peer_bandwidth,
            peer_bandwidth_limit_type: None,
            peer_acknowledged_bytes: None,
            bytes_received: 0,
            bytes_received_at_last_ack: 0,
            streams: Vec::new(),
            stream_index: HashMap::new(),
        })
    }

    pub fn receive_chunk_size(&self) -> u32 {
        self.receive_chunk_size
    }

    pub fn send_chunk_size(&self) -> u32 {
        self.send_chunk_size
    }

    pub fn window_ack_size(&self) -> u32 {
        self.window_ack_size
    }

    pub fn peer_bandwidth(&self) -> u32 {
        self.peer_bandwidth
    }

    /// The limit type of the last SetPeerBandwidth message, if one was received
    pub fn peer_bandwidth_limit_type(&self) -> Option<&PeerBandwidthLimitType> {
        self.peer_bandwidth_limit_type.as_ref()
    }

    /// The sequence number of the last Acknowledgement the peer sent
    pub fn peer_acknowledged_bytes(&self) -> Option<u32> {
        self.peer_acknowledged_bytes
    }

    /// Total number of bytes read from the peer, including chunk headers
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub fn set_receive_chunk_size(&mut self, size: u32) -> Result<(), DecodeError> {
        if size == 0 || size > MAX_CHUNK_SIZE {
            return Err(DecodeError::InvalidChunkSize { size });
        }

        debug!(old = self.receive_chunk_size, new = size, "Receive chunk size changed");
        self.receive_chunk_size = size;
        Ok(())
    }

    pub fn set_send_chunk_size(&mut self, size: u32) -> Result<(), EncodeError> {
        if size == 0 || size > MAX_CHUNK_SIZE {
            return Err(EncodeError::InvalidChunkSize { size });
        }

        debug!(old = self.send_chunk_size, new = size, "Send chunk size changed");
        self.send_chunk_size = size;
        Ok(())
    }

    pub fn previous_header(&self, csid: u32) -> Option<&ChunkHeader> {
        self.stream_index
            .get(&csid)
            .and_then(|index| self.streams[*index].previous_header())
    }

    pub fn has_partial_message(&self, csid: u32) -> bool {
        self.stream_index
            .get(&csid)
            .map_or(false, |index| self.streams[*index].has_partial_message())
    }

    /// Stores the header as the one later compressed headers on its chunk stream inherit from.
    /// Any header other than format 3 starts a new message, so an unfinished message on the
    /// same chunk stream is dropped.
    pub fn record_header(&mut self, header: ChunkHeader) {
        let csid = header.chunk_stream_id;
        let stream = self.stream_mut(csid);

        if header.format != ChunkHeaderFormat::Empty && stream.has_partial_message() {
            let dropped = stream.discard_partial();
            warn!(
                csid,
                dropped_bytes = dropped,
                "New message started before the previous one on the chunk stream completed"
            );
        }

        stream.set_previous_header(header);
    }

    /// Number of body bytes that follow the header just read
    pub fn next_chunk_length(&self, header: &ChunkHeader) -> usize {
        match self.stream_index.get(&header.chunk_stream_id) {
            Some(index) => {
                self.streams[*index].next_chunk_length(header, self.receive_chunk_size)
            }
            None => std::cmp::min(header.message_length, self.receive_chunk_size) as usize,
        }
    }

    pub fn feed(&mut self, header: &ChunkHeader, body: &[u8]) -> Option<CompleteMessage> {
        self.stream_mut(header.chunk_stream_id).feed(header, body)
    }

    /// Discards the partially received message on the chunk stream, keeping its previous header
    pub fn abort_message(&mut self, csid: u32) {
        if let Some(index) = self.stream_index.get(&csid) {
            let dropped = self.streams[*index].discard_partial();
            debug!(csid, dropped_bytes = dropped, "Aborted partial message");
        }
    }

    /// Applies the side effects of a fully decoded protocol control message
    pub fn apply_control_message(&mut self, message: &RtmpMessage) -> Result<(), DecodeError> {
        match message {
            RtmpMessage::SetChunkSize { size } => self.set_receive_chunk_size(*size)?,
            RtmpMessage::Abort { stream_id } => self.abort_message(*stream_id),
            RtmpMessage::Acknowledgement { sequence_number } => {
                self.peer_acknowledged_bytes = Some(*sequence_number);
            }

            RtmpMessage::WindowAcknowledgement { size } => {
                debug!(size, "Window acknowledgement size changed");
                self.window_ack_size = *size;
            }

            RtmpMessage::SetPeerBandwidth { size, limit_type } => {
                debug!(size, limit_type = ?limit_type, "Peer bandwidth changed");
                self.peer_bandwidth = *size;
                self.peer_bandwidth_limit_type = Some(*limit_type);
            }

            _ => (),
        }

        Ok(())
    }

    pub fn add_bytes_received(&mut self, count: u64) {
        self.bytes_received += count;
    }

    /// Returns an Acknowledgement once a full window of bytes arrived since the last one
    pub fn take_acknowledgement(&mut self) -> Option<RtmpMessage> {
        if self.window_ack_size == 0 {
            return None;
        }

        let unacknowledged = self.bytes_received - self.bytes_received_at_last_ack;
        if unacknowledged < self.window_ack_size as u64 {
            return None;
        }

        self.bytes_received_at_last_ack = self.bytes_received;
        let sequence_number = self.bytes_received as u32;
        debug!(sequence_number, "Acknowledgement due");

        Some(RtmpMessage::Acknowledgement { sequence_number })
    }

    fn stream_mut(&mut self, csid: u32) -> &mut ChunkStreamState {
        let streams = &mut self.streams;
        let index = *self.stream_index.entry(csid).or_insert_with(|| {
            streams.push(ChunkStreamState::default());
            streams.len() - 1
        });

        &mut self.streams[index]
    }
}

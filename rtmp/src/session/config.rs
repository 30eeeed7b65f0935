/// Starting values for the negotiated properties of a session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Largest chunk body expected from the peer until it sends a SetChunkSize
    pub receive_chunk_size: u32,

    /// Largest chunk body sent to the peer until `Session::request_chunk_size` is called
    pub send_chunk_size: u32,

    /// Number of inbound bytes after which an acknowledgement is due
    pub window_ack_size: u32,

    pub peer_bandwidth: u32,
}

impl SessionConfig {
    /// Creates a new configuration object with default values
    pub fn new() -> SessionConfig {
        SessionConfig {
            receive_chunk_size: 128,
            send_chunk_size: 128,
            window_ack_size: 2_500_000,
            peer_bandwidth: 2_500_000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::new()
    }
}

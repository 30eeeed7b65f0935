use crate::chunk_io::chunk_header::EXTENDED_TIMESTAMP_ESCAPE;
use crate::chunk_io::{ChunkHeader, ChunkHeaderFormat, EncodeError};
use crate::messages::MessagePayload;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::collections::HashMap;

const MAX_MESSAGE_LENGTH: usize = 0xFF_FFFF;
const MAX_CHUNK_STREAM_ID: u32 = 65599;

/// The chunks making up a single outbound RTMP message.
///
/// Audio and video messages may be flagged as droppable, so the transport can skip them when
/// it falls behind.  The serializer sends a full header for the message after a droppable one
/// on the same chunk stream, so skipping never breaks header compression for the peer.
#[derive(Debug, PartialEq)]
pub struct SerializedMessage {
    pub bytes: Vec<u8>,
    pub can_be_dropped: bool,
}

struct SentHeader {
    header: ChunkHeader,
    can_be_dropped: bool,
}

/// Splits outbound messages into RTMP chunks.
///
/// Chunk headers are compressed against the previous message sent on the same chunk stream, so
/// one serializer must be used for every message sent to the same peer.
pub struct ChunkSerializer {
    previous_headers: HashMap<u32, SentHeader>,
}

impl ChunkSerializer {
    pub fn new() -> ChunkSerializer {
        ChunkSerializer {
            previous_headers: HashMap::new(),
        }
    }

    /// Turns a message payload into the chunks to send over the network, with no chunk body
    /// larger than `max_chunk_size`.
    ///
    /// Setting `force_uncompressed` writes a full header for the first chunk regardless of
    /// what was previously sent.  Some peers expect the first messages after the handshake
    /// to carry full headers.
    pub fn serialize(
        &mut self,
        message: &MessagePayload,
        max_chunk_size: u32,
        force_uncompressed: bool,
        can_be_dropped: bool,
    ) -> Result<SerializedMessage, EncodeError> {
        if message.data.len() > MAX_MESSAGE_LENGTH {
            return Err(EncodeError::MessageTooLong {
                size: message.data.len(),
            });
        }

        if max_chunk_size == 0 {
            return Err(EncodeError::InvalidChunkSize { size: 0 });
        }

        let csid = get_csid_for_message_type(message.type_id);
        let header = self.resolve_header(csid, message, force_uncompressed);

        let mut bytes = Vec::with_capacity(message.data.len() + 18);
        write_header(&mut bytes, &header)?;

        let mut chunks = message.data.chunks(max_chunk_size as usize);
        if let Some(first) = chunks.next() {
            bytes.extend_from_slice(first);
        }

        for chunk in chunks {
            write_basic_header(&mut bytes, ChunkHeaderFormat::Empty, csid)?;
            if header.extended_timestamp {
                bytes.write_u32::<BigEndian>(extended_field_value(&header))?;
            }

            bytes.extend_from_slice(chunk);
        }

        self.previous_headers.insert(
            csid,
            SentHeader {
                header,
                can_be_dropped,
            },
        );

        Ok(SerializedMessage {
            bytes,
            can_be_dropped,
        })
    }

    fn resolve_header(
        &self,
        csid: u32,
        message: &MessagePayload,
        force_uncompressed: bool,
    ) -> ChunkHeader {
        let mut header = ChunkHeader::new(csid);
        header.timestamp = message.timestamp;
        header.message_length = message.data.len() as u32;
        header.message_type_id = message.type_id;
        header.message_stream_id = message.message_stream_id;

        let previous = match self.previous_headers.get(&csid) {
            Some(sent) if !force_uncompressed && !sent.can_be_dropped => &sent.header,
            _ => return full_header(header),
        };

        if header.message_stream_id != previous.message_stream_id
            || header.timestamp < previous.timestamp
        {
            return full_header(header);
        }

        let delta = (header.timestamp - previous.timestamp).value;
        if header.message_type_id != previous.message_type_id
            || header.message_length != previous.message_length
        {
            header.format = ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId;
        } else if delta != previous.timestamp_delta {
            header.format = ChunkHeaderFormat::TimeDeltaOnly;
        } else {
            // Format 3 repeats the previous delta, and the extended field with it
            header.format = ChunkHeaderFormat::Empty;
            header.timestamp_delta = previous.timestamp_delta;
            header.extended_timestamp = previous.extended_timestamp;
            return header;
        }

        header.timestamp_delta = delta;
        header.extended_timestamp = delta >= EXTENDED_TIMESTAMP_ESCAPE;
        header
    }
}

impl Default for ChunkSerializer {
    fn default() -> Self {
        ChunkSerializer::new()
    }
}

fn full_header(mut header: ChunkHeader) -> ChunkHeader {
    header.format = ChunkHeaderFormat::Full;
    header.timestamp_delta = 0;
    header.extended_timestamp = header.timestamp.value >= EXTENDED_TIMESTAMP_ESCAPE;
    header
}

/// The value carried in the 4 byte extended timestamp field for this header
fn extended_field_value(header: &ChunkHeader) -> u32 {
    if header.timestamp_delta == 0 {
        header.timestamp.value
    } else {
        header.timestamp_delta
    }
}

fn write_header(bytes: &mut Vec<u8>, header: &ChunkHeader) -> Result<(), EncodeError> {
    write_basic_header(bytes, header.format, header.chunk_stream_id)?;

    let timestamp_field = if header.extended_timestamp {
        EXTENDED_TIMESTAMP_ESCAPE
    } else {
        extended_field_value(header)
    };

    match header.format {
        ChunkHeaderFormat::Full => {
            bytes.write_u24::<BigEndian>(timestamp_field)?;
            bytes.write_u24::<BigEndian>(header.message_length)?;
            bytes.write_u8(header.message_type_id)?;
            bytes.write_u32::<LittleEndian>(header.message_stream_id)?;
        }

        ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId => {
            bytes.write_u24::<BigEndian>(timestamp_field)?;
            bytes.write_u24::<BigEndian>(header.message_length)?;
            bytes.write_u8(header.message_type_id)?;
        }

        ChunkHeaderFormat::TimeDeltaOnly => bytes.write_u24::<BigEndian>(timestamp_field)?,
        ChunkHeaderFormat::Empty => (),
    }

    if header.extended_timestamp {
        bytes.write_u32::<BigEndian>(extended_field_value(header))?;
    }

    Ok(())
}

fn write_basic_header(
    bytes: &mut Vec<u8>,
    format: ChunkHeaderFormat,
    csid: u32,
) -> Result<(), EncodeError> {
    let format_bits = format.basic_header_bits();
    match csid {
        2..=63 => bytes.write_u8(format_bits | csid as u8)?,
        64..=319 => {
            bytes.write_u8(format_bits)?;
            bytes.write_u8((csid - 64) as u8)?;
        }
        320..=MAX_CHUNK_STREAM_ID => {
            bytes.write_u8(format_bits | 1)?;
            bytes.write_u16::<LittleEndian>((csid - 64) as u16)?;
        }
        _ => return Err(EncodeError::InvalidChunkStreamId { csid }),
    }

    Ok(())
}

fn get_csid_for_message_type(message_type_id: u8) -> u32 {
    // Spreads message kinds across chunk streams so repeated messages of one kind compress well
    match message_type_id {
        1..=6 => 2,
        18 | 19 => 3,
        9 => 4,
        8 => 5,
        _ => 6,
    }
}

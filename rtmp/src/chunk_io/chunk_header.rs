use crate::chunk_io::{DecodeError, SessionState};
use crate::time::RtmpTimestamp;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Read;
use tracing::trace;

/// The value of the 3 byte timestamp field that signals a 4 byte extended timestamp follows
pub const EXTENDED_TIMESTAMP_ESCAPE: u32 = 0xFF_FFFF;

/// How much of the message header a chunk carries.  Everything a chunk leaves out is
/// inherited from the previous header on the same chunk stream.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ChunkHeaderFormat {
    Full,                            // Format 0
    TimeDeltaWithoutMessageStreamId, // Format 1
    TimeDeltaOnly,                   // Format 2
    Empty,                           // Format 3
}

impl ChunkHeaderFormat {
    /// Reads the format from the top two bits of the basic header byte
    pub fn from_basic_header(byte: u8) -> ChunkHeaderFormat {
        match byte >> 6 {
            0 => ChunkHeaderFormat::Full,
            1 => ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId,
            2 => ChunkHeaderFormat::TimeDeltaOnly,
            _ => ChunkHeaderFormat::Empty,
        }
    }

    pub fn basic_header_bits(self) -> u8 {
        match self {
            ChunkHeaderFormat::Full => 0b0000_0000,
            ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId => 0b0100_0000,
            ChunkHeaderFormat::TimeDeltaOnly => 0b1000_0000,
            ChunkHeaderFormat::Empty => 0b1100_0000,
        }
    }
}

/// A fully resolved chunk header, with every field the chunk omitted filled in from the
/// previous header on its chunk stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkHeader {
    pub chunk_stream_id: u32,

    /// The format the chunk was sent with
    pub format: ChunkHeaderFormat,

    /// Absolute timestamp of the message this chunk belongs to
    pub timestamp: RtmpTimestamp,

    /// Delta a following format 3 header repeats.  Always 0 after a full header.
    pub timestamp_delta: u32,

    /// Whether the timestamp (or delta) field used the extended timestamp escape.  Format 3
    /// chunks following such a header carry a 4 byte extended timestamp as well.
    pub extended_timestamp: bool,

    pub message_length: u32,
    pub message_type_id: u8,
    pub message_stream_id: u32,
}

impl ChunkHeader {
    pub fn new(chunk_stream_id: u32) -> ChunkHeader {
        ChunkHeader {
            chunk_stream_id,
            format: ChunkHeaderFormat::Full,
            timestamp: RtmpTimestamp::new(0),
            timestamp_delta: 0,
            extended_timestamp: false,
            message_length: 0,
            message_type_id: 0,
            message_stream_id: 0,
        }
    }
}

/// Reads the basic and message header of the next chunk and resolves it against the
/// previous header on the same chunk stream.  The resolved header is recorded in the
/// session state as the new previous header for its chunk stream.
pub fn read_chunk_header<R: Read>(
    reader: &mut R,
    session: &mut SessionState,
) -> Result<ChunkHeader, DecodeError> {
    let first_byte = reader.read_u8()?;
    read_chunk_header_after(first_byte, reader, session)
}

pub(crate) fn read_chunk_header_after<R: Read>(
    first_byte: u8,
    reader: &mut R,
    session: &mut SessionState,
) -> Result<ChunkHeader, DecodeError> {
    let format = ChunkHeaderFormat::from_basic_header(first_byte);
    let csid = read_csid(first_byte, reader)?;

    let header = match format {
        ChunkHeaderFormat::Full => read_full_header(csid, reader)?,
        _ => {
            let previous = match session.previous_header(csid) {
                Some(header) => header.clone(),
                None => {
                    return Err(DecodeError::ProtocolViolation {
                        csid,
                        reason: "compressed chunk header without a previous header on the chunk stream",
                    })
                }
            };

            match format {
                ChunkHeaderFormat::Empty => {
                    let continues_message = session.has_partial_message(csid);
                    read_empty_header(previous, continues_message, reader)?
                }
                _ => read_delta_header(format, previous, reader)?,
            }
        }
    };

    trace!(
        csid,
        format = ?header.format,
        timestamp = header.timestamp.value,
        length = header.message_length,
        type_id = header.message_type_id,
        "Read chunk header"
    );

    session.record_header(header.clone());
    Ok(header)
}

fn read_csid<R: Read>(first_byte: u8, reader: &mut R) -> Result<u32, DecodeError> {
    const CSID_MASK: u8 = 0b0011_1111;

    let csid = match first_byte & CSID_MASK {
        0 => reader.read_u8()? as u32 + 64,
        1 => reader.read_u16::<LittleEndian>()? as u32 + 64,
        x => x as u32,
    };

    Ok(csid)
}

fn read_full_header<R: Read>(csid: u32, reader: &mut R) -> Result<ChunkHeader, DecodeError> {
    let mut header = ChunkHeader::new(csid);
    let timestamp = reader.read_u24::<BigEndian>()?;
    header.message_length = reader.read_u24::<BigEndian>()?;
    header.message_type_id = reader.read_u8()?;
    header.message_stream_id = reader.read_u32::<LittleEndian>()?;

    header.extended_timestamp = timestamp == EXTENDED_TIMESTAMP_ESCAPE;
    let timestamp = if header.extended_timestamp {
        reader.read_u32::<BigEndian>()?
    } else {
        timestamp
    };

    header.timestamp = RtmpTimestamp::new(timestamp);
    Ok(header)
}

fn read_delta_header<R: Read>(
    format: ChunkHeaderFormat,
    previous: ChunkHeader,
    reader: &mut R,
) -> Result<ChunkHeader, DecodeError> {
    let mut header = previous;
    header.format = format;

    let delta = reader.read_u24::<BigEndian>()?;
    if format == ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId {
        header.message_length = reader.read_u24::<BigEndian>()?;
        header.message_type_id = reader.read_u8()?;
    }

    header.extended_timestamp = delta == EXTENDED_TIMESTAMP_ESCAPE;
    header.timestamp_delta = if header.extended_timestamp {
        reader.read_u32::<BigEndian>()?
    } else {
        delta
    };

    header.timestamp = header.timestamp + header.timestamp_delta;
    Ok(header)
}

fn read_empty_header<R: Read>(
    previous: ChunkHeader,
    continues_message: bool,
    reader: &mut R,
) -> Result<ChunkHeader, DecodeError> {
    let mut header = previous;
    header.format = ChunkHeaderFormat::Empty;

    // The extended timestamp is repeated on every format 3 chunk that follows a header which
    // used it, including the chunks continuing a split message.
    let extended_value = if header.extended_timestamp {
        Some(reader.read_u32::<BigEndian>()?)
    } else {
        None
    };

    // Chunks continuing a message keep the timestamp of its first chunk, otherwise encoders
    // that split a delta message into format 3 chunks would have the delta applied repeatedly.
    if continues_message {
        return Ok(header);
    }

    match extended_value {
        // A zero delta means the chain started from a full header, whose extended field
        // carried the absolute timestamp.
        Some(value) if header.timestamp_delta == 0 => header.timestamp.set(value),
        Some(value) => {
            header.timestamp_delta = value;
            header.timestamp = header.timestamp + value;
        }
        None => header.timestamp = header.timestamp + header.timestamp_delta,
    }

    Ok(header)
}

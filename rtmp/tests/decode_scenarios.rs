use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use pushcast_amf0::Amf0Value;
use pushcast_rtmp::chunk_io::ChunkHeaderFormat;
use pushcast_rtmp::messages::{PeerBandwidthLimitType, RtmpMessage};
use pushcast_rtmp::time::RtmpTimestamp;
use pushcast_rtmp::{DecodeError, Session, SessionConfig};
use std::io::{Cursor, Write};

fn new_session() -> Session {
    Session::new(SessionConfig::new()).unwrap()
}

fn full_header(
    cursor: &mut Cursor<Vec<u8>>,
    csid: u8,
    timestamp: u32,
    length: u32,
    type_id: u8,
    message_stream_id: u32,
) {
    cursor.write_u8(csid).unwrap();
    cursor.write_u24::<BigEndian>(timestamp).unwrap();
    cursor.write_u24::<BigEndian>(length).unwrap();
    cursor.write_u8(type_id).unwrap();
    cursor.write_u32::<LittleEndian>(message_stream_id).unwrap();
}

fn payload(length: usize) -> Vec<u8> {
    (0..length).map(|x| (x % 251) as u8).collect()
}

#[test]
fn on_status_command_without_arguments() {
    let body = pushcast_amf0::serialize(&[
        Amf0Value::Utf8String("onStatus".to_string()),
        Amf0Value::Number(0.0),
    ])
    .unwrap();

    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 3, 0, body.len() as u32, 20, 0);
    cursor.write_all(&body).unwrap();

    let mut session = new_session();
    let packet = session
        .next_packet(&mut Cursor::new(cursor.into_inner()))
        .unwrap();

    assert_eq!(packet.header.chunk_stream_id, 3);
    assert_eq!(
        packet.message,
        RtmpMessage::Amf0Command {
            command_name: "onStatus".to_string(),
            transaction_id: 0.0,
            values: vec![],
        }
    );
}

#[test]
fn set_peer_bandwidth_updates_session_state() {
    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 2, 0, 5, 6, 0);
    cursor.write_u32::<BigEndian>(2500000).unwrap();
    cursor.write_u8(2).unwrap();

    let mut config = SessionConfig::new();
    config.peer_bandwidth = 0;
    let mut session = Session::new(config).unwrap();
    let packet = session
        .next_packet(&mut Cursor::new(cursor.into_inner()))
        .unwrap();

    assert_eq!(
        packet.message,
        RtmpMessage::SetPeerBandwidth {
            size: 2500000,
            limit_type: PeerBandwidthLimitType::Dynamic,
        }
    );
    assert_eq!(session.state().peer_bandwidth(), 2500000);
    assert_eq!(
        session.state().peer_bandwidth_limit_type(),
        Some(&PeerBandwidthLimitType::Dynamic)
    );
}

#[test]
fn compressed_header_on_unseen_chunk_stream_is_protocol_violation() {
    let mut cursor = Cursor::new(Vec::new());
    cursor.write_u8(0b0100_0000 | 7).unwrap();
    cursor.write_u24::<BigEndian>(0).unwrap();
    cursor.write_u24::<BigEndian>(1).unwrap();
    cursor.write_u8(9).unwrap();
    cursor.write_u8(0xff).unwrap();

    let mut session = new_session();
    match session.next_packet(&mut Cursor::new(cursor.into_inner())) {
        Err(error @ DecodeError::ProtocolViolation { .. }) => {
            assert!(error.is_fatal(), "Protocol violations must be fatal");
        }
        x => panic!("Expected protocol violation, received {:?}", x),
    }
}

#[test]
fn message_of_three_chunks_reassembles_byte_for_byte() {
    let chunk_size = 128;
    let data = payload(chunk_size * 3);

    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 4, 50, data.len() as u32, 9, 1);
    cursor.write_all(&data[..chunk_size]).unwrap();
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_all(&data[chunk_size..chunk_size * 2]).unwrap();
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_all(&data[chunk_size * 2..]).unwrap();

    let mut session = new_session();
    let packet = session
        .next_packet(&mut Cursor::new(cursor.into_inner()))
        .unwrap();

    assert_eq!(packet.header.timestamp, RtmpTimestamp::new(50));
    match packet.message {
        RtmpMessage::VideoData { data: received } => assert_eq!(&received[..], &data[..]),
        x => panic!("Expected video data, received {:?}", x),
    }
}

#[test]
fn message_of_exactly_one_chunk_size_needs_one_chunk() {
    let data = payload(128);

    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 4, 0, data.len() as u32, 8, 1);
    cursor.write_all(&data).unwrap();
    // The next byte would be the start of another chunk and must stay unread
    cursor.write_u8(0xc4).unwrap();

    let mut input = Cursor::new(cursor.into_inner());
    let mut session = new_session();
    let packet = session.next_packet(&mut input).unwrap();

    assert_eq!(input.position(), 12 + 128, "Read past the end of the message");
    match packet.message {
        RtmpMessage::AudioData { data: received } => assert_eq!(&received[..], &data[..]),
        x => panic!("Expected audio data, received {:?}", x),
    }
}

#[test]
fn set_chunk_size_applies_from_the_next_chunk() {
    let data = payload(300);

    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 2, 0, 4, 1, 0);
    cursor.write_u32::<BigEndian>(300).unwrap();
    full_header(&mut cursor, 4, 0, data.len() as u32, 9, 1);
    cursor.write_all(&data).unwrap();

    let mut input = Cursor::new(cursor.into_inner());
    let mut session = new_session();

    let first = session.next_packet(&mut input).unwrap();
    assert_eq!(first.message, RtmpMessage::SetChunkSize { size: 300 });
    assert_eq!(session.state().receive_chunk_size(), 300);

    let second = session.next_packet(&mut input).unwrap();
    match second.message {
        RtmpMessage::VideoData { data: received } => assert_eq!(&received[..], &data[..]),
        x => panic!("Expected video data, received {:?}", x),
    }
}

#[test]
fn interleaved_chunk_streams_reassemble_independently() {
    let audio = payload(200);
    let video: Vec<u8> = payload(300).into_iter().map(|x| x ^ 0xff).collect();

    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 4, 100, video.len() as u32, 9, 1);
    cursor.write_all(&video[..128]).unwrap();
    full_header(&mut cursor, 5, 90, audio.len() as u32, 8, 1);
    cursor.write_all(&audio[..128]).unwrap();
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_all(&video[128..256]).unwrap();
    cursor.write_u8(0b1100_0000 | 5).unwrap();
    cursor.write_all(&audio[128..]).unwrap();
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_all(&video[256..]).unwrap();

    let mut input = Cursor::new(cursor.into_inner());
    let mut session = new_session();

    let first = session.next_packet(&mut input).unwrap();
    assert_eq!(first.header.chunk_stream_id, 5);
    assert_eq!(first.header.timestamp, RtmpTimestamp::new(90));
    match first.message {
        RtmpMessage::AudioData { data } => assert_eq!(&data[..], &audio[..]),
        x => panic!("Expected audio data, received {:?}", x),
    }

    let second = session.next_packet(&mut input).unwrap();
    assert_eq!(second.header.chunk_stream_id, 4);
    assert_eq!(second.header.timestamp, RtmpTimestamp::new(100));
    match second.message {
        RtmpMessage::VideoData { data } => assert_eq!(&data[..], &video[..]),
        x => panic!("Expected video data, received {:?}", x),
    }
}

#[test]
fn header_compression_sequence_keeps_message_stream_and_timestamps() {
    let mut cursor = Cursor::new(Vec::new());

    // format 0
    full_header(&mut cursor, 4, 1000, 2, 9, 7);
    cursor.write_all(&[1, 1]).unwrap();

    // format 3 directly after a full header repeats its timestamp
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_all(&[2, 2]).unwrap();

    // format 1
    cursor.write_u8(0b0100_0000 | 4).unwrap();
    cursor.write_u24::<BigEndian>(33).unwrap();
    cursor.write_u24::<BigEndian>(3).unwrap();
    cursor.write_u8(9).unwrap();
    cursor.write_all(&[3, 3, 3]).unwrap();

    // format 2
    cursor.write_u8(0b1000_0000 | 4).unwrap();
    cursor.write_u24::<BigEndian>(34).unwrap();
    cursor.write_all(&[4, 4, 4]).unwrap();

    // format 3 repeats the last delta
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_all(&[5, 5, 5]).unwrap();

    let mut input = Cursor::new(cursor.into_inner());
    let mut session = new_session();

    let expected = [
        (ChunkHeaderFormat::Full, 1000),
        (ChunkHeaderFormat::Empty, 1000),
        (ChunkHeaderFormat::TimeDeltaWithoutMessageStreamId, 1033),
        (ChunkHeaderFormat::TimeDeltaOnly, 1067),
        (ChunkHeaderFormat::Empty, 1101),
    ];

    for (index, (format, timestamp)) in expected.iter().enumerate() {
        let packet = session.next_packet(&mut input).unwrap();
        assert_eq!(packet.header.format, *format, "Incorrect format for packet {}", index);
        assert_eq!(
            packet.header.timestamp,
            RtmpTimestamp::new(*timestamp),
            "Incorrect timestamp for packet {}",
            index
        );
        assert_eq!(packet.header.message_stream_id, 7, "Incorrect message stream id for packet {}", index);
    }
}

#[test]
fn extended_timestamp_is_repeated_on_format_3_chunks() {
    let timestamp = 0x0100_0000;
    let data = payload(200);

    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 4, 0xFF_FFFF, data.len() as u32, 9, 1);
    cursor.write_u32::<BigEndian>(timestamp).unwrap();
    cursor.write_all(&data[..128]).unwrap();

    // Continuation of the same message
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_u32::<BigEndian>(timestamp).unwrap();
    cursor.write_all(&data[128..]).unwrap();

    // A new message with the same header and timestamp
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_u32::<BigEndian>(timestamp).unwrap();
    cursor.write_all(&data[..128]).unwrap();
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_u32::<BigEndian>(timestamp).unwrap();
    cursor.write_all(&data[128..]).unwrap();

    let bytes = cursor.into_inner();
    let total = bytes.len() as u64;
    let mut input = Cursor::new(bytes);
    let mut session = new_session();

    for _ in 0..2 {
        let packet = session.next_packet(&mut input).unwrap();
        assert_eq!(packet.header.timestamp, RtmpTimestamp::new(timestamp));
        match packet.message {
            RtmpMessage::VideoData { data: received } => assert_eq!(&received[..], &data[..]),
            x => panic!("Expected video data, received {:?}", x),
        }
    }

    assert_eq!(input.position(), total, "Stream fell out of alignment");
}

#[test]
fn abort_discards_partial_message() {
    let data = payload(200);

    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 4, 0, data.len() as u32, 9, 1);
    cursor.write_all(&data[..128]).unwrap();
    full_header(&mut cursor, 2, 0, 4, 2, 0);
    cursor.write_u32::<BigEndian>(4).unwrap();

    // A fresh message on the aborted chunk stream
    cursor.write_u8(0b1000_0000 | 4).unwrap();
    cursor.write_u24::<BigEndian>(0).unwrap();
    cursor.write_all(&data[..128]).unwrap();
    cursor.write_u8(0b1100_0000 | 4).unwrap();
    cursor.write_all(&data[128..]).unwrap();

    let mut input = Cursor::new(cursor.into_inner());
    let mut session = new_session();

    let abort = session.next_packet(&mut input).unwrap();
    assert_eq!(abort.message, RtmpMessage::Abort { stream_id: 4 });

    let packet = session.next_packet(&mut input).unwrap();
    match packet.message {
        RtmpMessage::VideoData { data: received } => assert_eq!(&received[..], &data[..]),
        x => panic!("Expected video data, received {:?}", x),
    }
}

#[test]
fn source_ending_inside_a_chunk_is_truncated() {
    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 4, 0, 10, 9, 1);
    cursor.write_all(&[1, 2, 3]).unwrap();

    let mut session = new_session();
    match session.next_packet(&mut Cursor::new(cursor.into_inner())) {
        Err(DecodeError::Truncated) => (),
        x => panic!("Expected truncated error, received {:?}", x),
    }
}

#[test]
fn deeply_nested_data_message_is_decoded() {
    const DEPTH: usize = 10_000;

    let mut body = Vec::new();
    for _ in 0..DEPTH {
        body.write_u8(0x0a).unwrap();
        body.write_u32::<BigEndian>(1).unwrap();
    }
    body.write_u8(0x05).unwrap();

    let mut cursor = Cursor::new(Vec::new());
    full_header(&mut cursor, 5, 0, body.len() as u32, 18, 1);
    cursor.write_all(&body).unwrap();

    let mut config = SessionConfig::new();
    config.receive_chunk_size = 65536;
    let mut session = Session::new(config).unwrap();
    let packet = session
        .next_packet(&mut Cursor::new(cursor.into_inner()))
        .unwrap();

    let values = match &packet.message {
        RtmpMessage::Amf0Data { values } => values,
        _ => panic!("Expected amf0 data message"),
    };
    assert_eq!(values.len(), 1, "Incorrect number of values");

    let mut depth = 0;
    let mut current = &values[0];
    while let Amf0Value::StrictArray(children) = current {
        assert_eq!(children.len(), 1, "Incorrect array length at depth {}", depth);
        current = &children[0];
        depth += 1;
    }

    assert_eq!(depth, DEPTH, "Incorrect nesting depth");
    assert_eq!(current, &Amf0Value::Null);
}

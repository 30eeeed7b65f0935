use pushcast_rtmp::messages::RtmpMessage;
use pushcast_rtmp::{Session, SessionConfig};
use std::env;
use std::fs::File;
use std::io::BufReader;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("RTMP Log reader");
    println!("This reads raw binary logged from a single direction of an RTMP connection,");
    println!("starting with the first chunk after the handshake");
    println!();

    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        println!("No file specified to read.  Pass the path to the file you wish to read");
        return;
    }

    println!("Reading file: {}", args[1]);
    println!();

    let file = match File::open(&args[1]) {
        Ok(file) => file,
        Err(error) => {
            println!("Could not open {}: {}", args[1], error);
            return;
        }
    };

    let mut reader = BufReader::new(file);
    let mut session = match Session::new(SessionConfig::new()) {
        Ok(session) => session,
        Err(error) => {
            println!("Could not create session: {}", error);
            return;
        }
    };

    let mut message_number = 1;
    let mut payload_bytes = 0;
    for result in session.packets(&mut reader) {
        match result {
            Ok(packet) => {
                println!(
                    "Message: {}   Timestamp: {}   Type: {}    Stream_Id: {}   Csid: {}",
                    message_number,
                    packet.header.timestamp.value,
                    packet.header.message_type_id,
                    packet.header.message_stream_id,
                    packet.header.chunk_stream_id,
                );

                print_message(&packet.message);
                payload_bytes += packet.header.message_length as u64;
            }

            Err(error) => println!("Message: {}   Error: {}", message_number, error),
        }

        println!();
        message_number += 1;
    }

    println!(
        "Finished reading log file!  {} messages with {} payload bytes ({} bytes on the wire)",
        message_number - 1,
        payload_bytes,
        session.state().bytes_received()
    );
}

fn print_message(message: &RtmpMessage) {
    match message {
        RtmpMessage::AudioData { data } => {
            println!("AudioData {{ data: {} }}", hex_preview(data))
        }

        RtmpMessage::VideoData { data } => {
            println!("VideoData {{ data: {} }}", hex_preview(data))
        }

        x => println!("{:?}", x),
    }
}

fn hex_preview(data: &[u8]) -> String {
    let mut output = String::new();
    for (index, byte) in data.iter().enumerate() {
        if index > 100 {
            output.push_str(&format!(".. ({})", data.len()));
            break;
        }

        output.push_str(&format!("{:02x}", byte));
    }

    output
}

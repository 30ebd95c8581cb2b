//! Cut a record stream at a random point and show what a reader recovers

use std::io::Cursor;

use anyhow::Result;
use rand::Rng;
use tfrecord_core::{verify::verify_stream, RecordError, RecordReader, RecordWriter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::new("debug"))
        .init();

    println!("Step 1: Writing 10 records...");
    let mut writer = RecordWriter::new(Vec::new());
    for i in 1..=10 {
        writer.write_record(format!("Important reading from sensor {}", i).as_bytes())?;
    }
    let mut stream = writer.into_inner();
    println!("Clean stream: {} bytes\n", stream.len());

    println!("Step 2: Simulating an interrupted append...");
    let cut = rand::thread_rng().gen_range(1..stream.len());
    stream.truncate(cut);
    println!("Stream cut to {} bytes\n", cut);

    println!("Step 3: Reading until the first failure...");
    let mut reader = RecordReader::new(Cursor::new(stream.as_slice()));
    loop {
        match reader.read_record() {
            Ok(payload) => println!("  {}", String::from_utf8_lossy(&payload)),
            Err(RecordError::EndOfStream) => {
                println!("Clean end of stream");
                break;
            }
            Err(e) => {
                println!("Stopped: {}", e);
                break;
            }
        }
    }
    println!(
        "Recovered {} records; valid prefix is {} bytes\n",
        reader.records_read(),
        reader.position()
    );

    println!("Step 4: Verification report");
    let report = verify_stream(&stream);
    println!("Valid records:   {}", report.records);
    println!("Payload bytes:   {}", report.payload_bytes);
    println!("Recovery rate:   {:.2}%", report.recovery_rate());
    if let Some(error) = &report.error {
        println!("Terminated by:   {}", error);
    }

    Ok(())
}

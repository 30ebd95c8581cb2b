//! Write typed examples to a record file and read them back

use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::{Context, Result};
use serde_json::json;
use tfrecord_core::{Example, RecordReader, RecordSerializable, RecordWriter};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::temp_dir().join("write_read_demo.tfrecord");

    let rows = [
        json!({"text": "Ala ma kota", "label": 1, "scores": [0.9, 0.1]}),
        json!({"text": "Kot ma Ale", "label": 0, "scores": [0.2, 0.8]}),
        json!({"text": "", "label": 1, "tags": ["empty", "edge"]}),
    ];

    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = RecordWriter::new(BufWriter::new(file));

    for row in &rows {
        let example = Example::from_json(row)
            .with_context(|| format!("Failed to build example from {}", row))?;
        writer.write(&example)?;
    }
    writer.flush()?;

    info!(
        "Wrote {} records ({} bytes) to {}",
        writer.records_written(),
        writer.bytes_written(),
        path.display()
    );

    let file = File::open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = RecordReader::new(BufReader::new(file));

    for payload in reader.records() {
        let payload = payload.context("Record stream is damaged")?;
        let example = Example::from_payload(&payload)?;
        println!("{:?}", example.features);
    }

    info!("Read {} records", reader.records_read());
    std::fs::remove_file(&path).ok();

    Ok(())
}

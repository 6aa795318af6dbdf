//! Standalone log inspection tool
//!
//! Dumps the leading header words of a DL/DLZ file, the container summary for
//! compressed files, the resolved layout, and the first few decoded rows.
//!
//! Usage:
//!   inspect_dl <log_file.dl|log_file.dlz> [--rows <count>] [--channels <count>]
//!
//! Example:
//!   inspect_dl pass1.dlz --rows 5 --channels 12

use efi_log_decoder::{
    inspect_container, ChannelMap, ContainerKind, DecoderConfig, HeaderFields, LogFile,
};
use std::env;
use std::path::PathBuf;

fn print_hex_dump(data: &[u8], limit: usize) {
    for (line, chunk) in data[..data.len().min(limit)].chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
            .collect();
        println!("{:08x}  {:<48}  {}", line * 16, hex.join(" "), ascii);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <log_file> [--rows <count>] [--channels <count>]", args[0]);
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let mut rows = 5usize;
    let mut channels = 12usize;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--rows" if i + 1 < args.len() => {
                rows = args[i + 1].parse().unwrap_or(rows);
                i += 2;
            }
            "--channels" if i + 1 < args.len() => {
                channels = args[i + 1].parse().unwrap_or(channels);
                i += 2;
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
                i += 1;
            }
        }
    }

    let raw = match std::fs::read(&path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            std::process::exit(1);
        }
    };

    println!("=== {} ({} bytes) ===\n", path.display(), raw.len());

    if ContainerKind::Auto.for_path(&path) == ContainerKind::Compressed {
        match inspect_container(&raw) {
            Ok(summary) => {
                println!("Container:");
                println!("  Magic:        0x{:08X}", summary.magic);
                println!("  Run markers:  {}", summary.marker_count);
                if let Some(text) = &summary.embedded_text {
                    println!("  Tune name:    {}", text);
                }
                println!();
            }
            Err(e) => println!("Container check failed: {}\n", e),
        }
    }

    let config = DecoderConfig::new().with_max_rows(rows).with_channel_limit(channels);
    let log = match LogFile::open(&path, &config) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Failed to identify log: {}", e);
            std::process::exit(1);
        }
    };

    println!("First 64 bytes (expanded):");
    print_hex_dump(log.data(), 64);
    println!();

    if let Ok(header) = HeaderFields::read(log.data()) {
        println!("Header fields (little-endian):");
        for field in header.fields() {
            println!("  {}", field);
        }
        println!();
    }

    println!("Layout: {}\n", log.descriptor());

    let names = ChannelMap::common();
    let table = log.decode(Some(&names));
    println!("{}", table.columns().join(" | "));
    for row in table.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v)))
            .collect();
        println!("{}", cells.join(" | "));
    }
}

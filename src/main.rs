use dbf_reader::{Codepage, DbfReader, ReaderOptions};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-dbf-file> [--encoding <CODEPAGE>] [--limit <N>]", args[0]);
        std::process::exit(1);
    }

    let dbf_path = &args[1];
    let mut options = ReaderOptions::new();
    let mut limit = 10usize;

    // Parse --encoding argument
    if let Some(idx) = args.iter().position(|arg| arg == "--encoding") {
        match args.get(idx + 1).map(|label| (label, Codepage::from_label(label))) {
            Some((_, Some(codepage))) => options = options.with_codepage(codepage),
            Some((label, None)) => {
                eprintln!("ERROR: Unknown encoding '{}'. Expected one of cp437, cp850, cp866, cp1251, cp1252.", label);
                std::process::exit(1);
            }
            None => {
                eprintln!("ERROR: --encoding flag requires an argument.");
                std::process::exit(1);
            }
        }
    }

    // Parse --limit argument
    if let Some(idx) = args.iter().position(|arg| arg == "--limit") {
        match args.get(idx + 1).and_then(|n| n.parse().ok()) {
            Some(n) => limit = n,
            None => {
                eprintln!("ERROR: --limit flag requires a number.");
                std::process::exit(1);
            }
        }
    }

    println!("Reading DBF file: {}", dbf_path);
    println!("{}", "=".repeat(60));

    let mut reader = match DbfReader::from_path(dbf_path, options) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("\nERROR: Failed to open DBF file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", reader);

    println!("\nFields:");
    for (i, field) in reader.fields().iter().enumerate() {
        println!(
            "  {}. {} ({}, length {}, decimals {})",
            i + 1,
            field.name,
            field.field_type,
            field.length,
            field.decimal_count
        );
    }

    println!("\nSample Records (first {}):", limit);
    for (i, result) in reader.records().take(limit).enumerate() {
        match result {
            Ok(record) => {
                let values: Vec<String> = record.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                let marker = if record.deleted { "*" } else { " " };
                println!("  {}{}. {}", marker, i + 1, values.join(", "));
            }
            Err(e) => {
                eprintln!("\nERROR: Failed to read record {}", i + 1);
                eprintln!("  {}", e);
                std::process::exit(1);
            }
        }
    }

    if reader.records_count() as usize > limit {
        println!("  ... and {} more", reader.records_count() as usize - limit);
    }
}

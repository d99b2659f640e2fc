// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # cdrcodec CLI
//!
//! Encode and decode CDR payloads against a JSON shape file.
//!
//! ## Usage
//!
//! ```sh
//! # Decode a hex payload
//! cdrcodec decode --shape temperature.json 0000000000803540...
//!
//! # Decode a binary file
//! cdrcodec decode --shape camera_info.json @message.cdr
//!
//! # Encode a JSON value
//! cdrcodec encode --shape temperature.json --value '{"temperature": 21.5, "variance": 0.25, "id": "kitchen"}'
//!
//! # Show a shape file
//! cdrcodec shape temperature.json
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DecodeCmd, EncodeCmd, ShapeCmd};
use common::Result;

/// cdrcodec - CDR payload toolkit
///
/// Shapes are JSON-serialized shape descriptors; values are plain JSON
/// unless `--tagged` is given.
#[derive(Parser, Clone)]
#[command(name = "cdrcodec")]
#[command(about = "Encode and decode CDR payloads against a shape", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Decode a CDR payload to JSON
    Decode(DecodeCmd),

    /// Encode a JSON value to a CDR payload
    Encode(EncodeCmd),

    /// Show the fields and fixed arrays of a shape file
    Shape(ShapeCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(cmd) => cmd.run(),
        Commands::Encode(cmd) => cmd.run(),
        Commands::Shape(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - CDR payload to JSON.

use std::path::PathBuf;

use clap::Args;

use crate::common::{load_codec, load_shape, read_payload, value_to_json, Result};

/// Decode a CDR payload.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// JSON shape file describing the payload
    #[arg(short, long, value_name = "FILE")]
    shape: PathBuf,

    /// Payload as hex, or @FILE for a binary file
    #[arg(value_name = "HEX|@FILE")]
    input: String,

    /// TOML file with codec options
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Print the tagged value representation instead of plain JSON
    #[arg(long)]
    tagged: bool,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let shape = load_shape(&self.shape)?;
        let codec = load_codec(self.options.as_deref())?;
        let payload = read_payload(&self.input)?;

        let value = codec.decode_value(&shape, &payload)?;
        let json = if self.tagged {
            serde_json::to_value(&value)?
        } else {
            value_to_json(&value)
        };

        if self.pretty {
            println!("{}", serde_json::to_string_pretty(&json)?);
        } else {
            println!("{json}");
        }
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encode command - JSON value to CDR payload.

use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use cdrcodec::CdrValue;

use crate::common::{json_to_value, load_codec, load_shape, read_text_arg, Result};

/// Encode a JSON value.
#[derive(Args, Clone, Debug)]
pub struct EncodeCmd {
    /// JSON shape file describing the payload
    #[arg(short, long, value_name = "FILE")]
    shape: PathBuf,

    /// Value as JSON, or @FILE
    #[arg(short, long, value_name = "JSON|@FILE")]
    value: String,

    /// TOML file with codec options
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Parse the value as the tagged value representation
    #[arg(long)]
    tagged: bool,

    /// Write the binary payload to a file instead of printing hex
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl EncodeCmd {
    pub fn run(self) -> Result<()> {
        let shape = load_shape(&self.shape)?;
        let codec = load_codec(self.options.as_deref())?;
        let text = read_text_arg(&self.value)?;

        let value: CdrValue = if self.tagged {
            serde_json::from_str(&text).context("Invalid tagged value")?
        } else {
            let json: serde_json::Value = serde_json::from_str(&text).context("Invalid JSON value")?;
            json_to_value(&json, &shape)?
        };
        let bytes = codec.encode_value(&value, &shape)?;

        match self.output {
            Some(path) => {
                fs::write(&path, &bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
            }
            None => println!("{}", hex::encode(&bytes)),
        }
        Ok(())
    }
}

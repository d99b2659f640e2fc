// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shape command - show a shape file.

use std::path::PathBuf;

use clap::Args;
use cdrcodec::{RecordShape, Shape};

use crate::common::{describe_element, load_shape, Result};

/// Show a shape file.
#[derive(Args, Clone, Debug)]
pub struct ShapeCmd {
    /// JSON shape file
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

impl ShapeCmd {
    pub fn run(self) -> Result<()> {
        let shape = load_shape(&self.input)?;
        println!("=== {} ===", self.input.display());
        print_shape(&shape, 0);
        Ok(())
    }
}

fn print_shape(shape: &Shape, indent: usize) {
    match shape {
        Shape::Record(record) => print_record(record, indent),
        Shape::Sequence(element) => {
            println!("{:indent$}sequence of", "");
            print_shape(element, indent + 2);
        }
        Shape::FixedArray(element, count) => {
            println!("{:indent$}{count} x {}", "", describe_element(*element));
        }
        Shape::DynamicArray(element) => {
            println!("{:indent$}counted array of {}", "", describe_element(*element));
        }
        leaf => println!("{:indent$}{leaf}", ""),
    }
}

fn print_record(record: &RecordShape, indent: usize) {
    println!("{:indent$}record {} ({} fields)", "", record.name(), record.len());
    for field in record.fields() {
        let fixed = match record.fixed_count(field.ordinal) {
            Some(count) => format!("  [fixed {count}]"),
            None => String::new(),
        };
        println!(
            "{:width$}#{} {}: {}{fixed}",
            "",
            field.ordinal,
            field.name,
            field.shape,
            width = indent + 2
        );
        if field.shape.can_nest() {
            print_shape(&field.shape, indent + 4);
        }
    }
}

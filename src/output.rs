// src/output.rs
//
// Renders a `CountTable` for the CLI. Columns are always written as
// geo_id, geo_name, geometry and then the count columns in table order.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::{io::Write, str::FromStr};

use crate::{process::CountTable, schema::arrow::{GEOMETRY, GEO_ID, GEO_NAME}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Csv,
    Json,
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            other => anyhow::bail!("unknown output format {other:?}; expected csv or json"),
        }
    }
}

pub fn write<W: Write>(table: &CountTable, format: Format, out: W) -> Result<()> {
    match format {
        Format::Csv => write_csv(table, out),
        Format::Json => write_json(table, out),
    }
}

pub fn write_csv<W: Write>(table: &CountTable, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec![GEO_ID, GEO_NAME, GEOMETRY];
    header.extend(table.columns.iter().map(String::as_str));
    wtr.write_record(&header).context("writing csv header")?;

    for row in &table.rows {
        let mut record = vec![
            row.geo_id.clone(),
            row.geo_name.clone().unwrap_or_default(),
            row.geometry.clone().unwrap_or_default(),
        ];
        record.extend(row.counts.iter().map(i64::to_string));
        wtr.write_record(&record)
            .with_context(|| format!("writing row {}", row.geo_id))?;
    }
    wtr.flush()?;
    Ok(())
}

/// One JSON object per row; keys follow column order.
pub fn write_json<W: Write>(table: &CountTable, mut out: W) -> Result<()> {
    let records: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert(GEO_ID.into(), Value::from(row.geo_id.as_str()));
            obj.insert(GEO_NAME.into(), row.geo_name.clone().into());
            obj.insert(GEOMETRY.into(), row.geometry.clone().into());
            for (name, count) in table.columns.iter().zip(&row.counts) {
                obj.insert(name.clone(), Value::from(*count));
            }
            Value::Object(obj)
        })
        .collect();

    serde_json::to_writer_pretty(&mut out, &records).context("writing json")?;
    writeln!(out)?;
    Ok(())
}

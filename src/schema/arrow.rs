// src/schema/arrow.rs

use anyhow::{anyhow, bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema as ArrowSchema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::process::{CountTable, GeoRow};

pub const GEO_ID: &str = "geo_id";
pub const GEO_NAME: &str = "geo_name";
pub const GEOMETRY: &str = "geometry";

/// Identifier columns first, then one Int64 per count column.
pub fn build_arrow_schema(count_columns: &[String]) -> Arc<ArrowSchema> {
    let mut fields = Vec::with_capacity(count_columns.len() + 3);
    fields.push(Field::new(GEO_ID, DataType::Utf8, false));
    fields.push(Field::new(GEO_NAME, DataType::Utf8, true));
    fields.push(Field::new(GEOMETRY, DataType::Utf8, true));
    for name in count_columns {
        fields.push(Field::new(name, DataType::Int64, false));
    }
    Arc::new(ArrowSchema::new(fields))
}

pub fn to_record_batch(table: &CountTable) -> Result<RecordBatch> {
    let schema = build_arrow_schema(&table.columns);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    columns.push(Arc::new(StringArray::from_iter_values(
        table.rows.iter().map(|r| r.geo_id.as_str()),
    )));
    columns.push(Arc::new(StringArray::from_iter(
        table.rows.iter().map(|r| r.geo_name.as_deref()),
    )));
    columns.push(Arc::new(StringArray::from_iter(
        table.rows.iter().map(|r| r.geometry.as_deref()),
    )));
    for idx in 0..table.columns.len() {
        columns.push(Arc::new(Int64Array::from_iter_values(
            table.rows.iter().map(|r| r.counts[idx]),
        )));
    }

    RecordBatch::try_new(schema, columns).context("building count table record batch")
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("missing column {}", name))?;
    col.as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| anyhow!("column {} is {:?}, expected Utf8", name, col.data_type()))
}

/// Count column names of a schema built by [`build_arrow_schema`], in order.
pub fn count_columns(schema: &ArrowSchema) -> Vec<String> {
    schema
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .filter(|n| n != GEO_ID && n != GEO_NAME && n != GEOMETRY)
        .collect()
}

/// Append a batch written by [`to_record_batch`] onto `table`. An empty
/// table takes the batch's column set; otherwise the two must match.
pub fn extend_from_record_batch(table: &mut CountTable, batch: &RecordBatch) -> Result<()> {
    let count_columns = count_columns(batch.schema_ref());
    if table.columns.is_empty() && table.rows.is_empty() {
        table.columns = count_columns;
    } else if table.columns != count_columns {
        bail!("batch columns differ from table columns");
    }

    let ids = string_column(batch, GEO_ID)?;
    let names = string_column(batch, GEO_NAME)?;
    let geometry = string_column(batch, GEOMETRY)?;
    let counts: Vec<&Int64Array> = table
        .columns
        .iter()
        .map(|name| {
            batch
                .column_by_name(name)
                .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
                .ok_or_else(|| anyhow!("column {} is not Int64", name))
        })
        .collect::<Result<_>>()?;

    for row in 0..batch.num_rows() {
        let opt = |arr: &StringArray| (!arr.is_null(row)).then(|| arr.value(row).to_string());
        table.rows.push(GeoRow {
            geo_id: ids.value(row).to_string(),
            geo_name: opt(names),
            geometry: opt(geometry),
            counts: counts.iter().map(|c| c.value(row)).collect(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_keeps_column_order_and_nulls() -> Result<()> {
        let mut t = CountTable::new(vec!["resident_total".into(), "total".into()]);
        t.push(GeoRow {
            geo_id: "42101000100".into(),
            geo_name: None,
            geometry: Some("POINT (0 0)".into()),
            counts: vec![3, 9],
        })?;

        let batch = to_record_batch(&t)?;
        let names: Vec<&str> = batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(
            names,
            vec!["geo_id", "geo_name", "geometry", "resident_total", "total"]
        );

        let mut back = CountTable::default();
        extend_from_record_batch(&mut back, &batch)?;
        assert_eq!(back, t);
        Ok(())
    }
}

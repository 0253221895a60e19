//! Arrow projection of the filtered rows for the table view

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use rd_core::TableRow;

use crate::DataError;

/// Column order of the table batch
pub const TABLE_COLUMNS: [&str; 7] = ["name", "cuisine", "phone", "horaires", "quartier", "lat", "lon"];

pub fn table_schema() -> Schema {
    Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("cuisine", DataType::Utf8, false),
        Field::new("phone", DataType::Utf8, false),
        Field::new("horaires", DataType::Utf8, false),
        Field::new("quartier", DataType::Utf8, false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
    ])
}

/// Build the table batch from projected rows
pub fn table_batch(rows: &[TableRow]) -> Result<RecordBatch, DataError> {
    let columns: Vec<ArrayRef> = vec![
        text_column(rows, |r| &r.name),
        text_column(rows, |r| &r.cuisine),
        text_column(rows, |r| &r.phone),
        text_column(rows, |r| &r.horaires),
        text_column(rows, |r| &r.quartier),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.lat).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.lon).collect::<Vec<_>>())),
    ];

    Ok(RecordBatch::try_new(Arc::new(table_schema()), columns)?)
}

fn text_column(rows: &[TableRow], field: impl Fn(&TableRow) -> &str) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(field).collect::<Vec<_>>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::util::display::array_value_to_string;

    fn row(name: &str, horaires: &str) -> TableRow {
        TableRow {
            row: 0,
            name: name.to_string(),
            cuisine: "Pizza".to_string(),
            phone: String::new(),
            horaires: horaires.to_string(),
            quartier: "Limoilou".to_string(),
            lat: 46.83,
            lon: -71.22,
        }
    }

    #[test]
    fn test_batch_layout() {
        let batch = table_batch(&[row("A", "Mo 11:00\nTu 12:00"), row("B", "")]).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), TABLE_COLUMNS.len());

        let names: Vec<_> = batch.schema().fields().iter().map(|f| f.name().clone()).collect();
        assert_eq!(names, TABLE_COLUMNS);

        assert_eq!(array_value_to_string(batch.column(0), 1).unwrap(), "B");
        assert_eq!(array_value_to_string(batch.column(3), 0).unwrap(), "Mo 11:00\nTu 12:00");
        assert_eq!(array_value_to_string(batch.column(5), 0).unwrap(), "46.83");
    }

    #[test]
    fn test_empty_batch() {
        let batch = table_batch(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 7);
    }
}

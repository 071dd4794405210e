//! Long-format Arrow export: one row per region per date.

use arrow::array::{ArrayRef, Date32Array, StringArray, UInt8Array, UInt32Array};
use arrow::datatypes::{DataType, Date32Type, Field, Schema, SchemaRef};
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use std::path::Path;
use std::sync::Arc;

use super::dataset::Dataset;
use crate::errors::DataResult;

pub fn schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("code", DataType::UInt8, false),
        Field::new("pref", DataType::Utf8, false),
        Field::new("date", DataType::Date32, false),
        Field::new("patients", DataType::UInt32, false),
        Field::new("mortality", DataType::UInt32, false),
    ]))
}

pub fn dataset_to_record_batch(dataset: &Dataset) -> DataResult<RecordBatch> {
    let mut codes = Vec::new();
    let mut names = Vec::new();
    let mut dates = Vec::new();
    let mut patients = Vec::new();
    let mut mortality = Vec::new();

    for series in &dataset.prefs {
        for point in series.points() {
            codes.push(series.code);
            names.push(series.name.as_str());
            dates.push(Date32Type::from_naive_date(point.date));
            patients.push(point.patients);
            mortality.push(point.mortality);
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt8Array::from(codes)),
        Arc::new(StringArray::from(names)),
        Arc::new(Date32Array::from(dates)),
        Arc::new(UInt32Array::from(patients)),
        Arc::new(UInt32Array::from(mortality)),
    ];

    Ok(RecordBatch::try_new(schema(), columns)?)
}

/// Writes the dataset as an Arrow IPC file and returns the row count.
pub fn write_ipc_file<P: AsRef<Path>>(path: P, dataset: &Dataset) -> DataResult<usize> {
    let path = path.as_ref();
    let batch = dataset_to_record_batch(dataset)?;
    let file = std::fs::File::create(path)?;

    let mut writer = FileWriter::try_new(file, &batch.schema())?;
    writer.write(&batch)?;
    writer.finish()?;

    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(batch.num_rows())
}

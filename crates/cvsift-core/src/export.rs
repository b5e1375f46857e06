use std::io;

use thiserror::Error;

use crate::record::{RecordSchema, ResumeRecord};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Serializes a batch's records as CSV: the schema header first, then one
/// row per successful record.
pub struct CsvExporter;

impl CsvExporter {
    pub fn write<W: io::Write>(
        schema: &RecordSchema,
        records: &[ResumeRecord],
        writer: W,
    ) -> ExportResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(schema.header())?;
        for record in records {
            csv.write_record(schema.row(record))?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn to_bytes(schema: &RecordSchema, records: &[ResumeRecord]) -> ExportResult<Vec<u8>> {
        let mut bytes = Vec::new();
        Self::write(schema, records, &mut bytes)?;
        Ok(bytes)
    }
}

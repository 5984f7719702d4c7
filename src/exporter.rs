use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::error::ExportError;
use crate::record::JobRecord;
use crate::stats::ZoneStats;

pub const NO_WAGE: &str = "N/A";

pub const STATISTICS_HEADER: [&str; 3] = ["zone", "job type", "count"];

/// Where projected rows go.
pub trait RowSink {
    fn write_row(&mut self, row: &[String]) -> Result<(), ExportError>;

    fn finish(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Company,
    Description,
    PublishedAt,
    Wage,
    Locations,
}

pub const DEFAULT_JOB_COLUMNS: [Column; 6] = [
    Column::Title,
    Column::Company,
    Column::Description,
    Column::PublishedAt,
    Column::Wage,
    Column::Locations,
];

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Title => "title",
            Column::Company => "company",
            Column::Description => "description",
            Column::PublishedAt => "published_at",
            Column::Wage => "wage",
            Column::Locations => "locations",
        }
    }

    pub fn value(&self, record: &JobRecord) -> String {
        match self {
            Column::Title => record.title_text().to_string(),
            Column::Company => record.company_name().unwrap_or_default().to_string(),
            Column::Description => record.body_text().to_string(),
            Column::PublishedAt => record.published_at.clone().unwrap_or_default(),
            Column::Wage => match record.wage.as_deref() {
                Some(wage) if !wage.is_empty() => wage.to_string(),
                _ => NO_WAGE.to_string(),
            },
            Column::Locations => record.location_names().collect::<Vec<_>>().join(", "),
        }
    }
}

pub fn project(record: &JobRecord, columns: &[Column]) -> Vec<String> {
    columns.iter().map(|c| c.value(record)).collect()
}

/// Header row, then one row per record in input order.
pub fn export_jobs<S: RowSink + ?Sized>(
    sink: &mut S,
    records: &[JobRecord],
    columns: &[Column],
) -> Result<(), ExportError> {
    let header: Vec<String> = columns.iter().map(|c| c.header().to_string()).collect();
    sink.write_row(&header)?;
    for record in records {
        sink.write_row(&project(record, columns))?;
    }
    sink.finish()
}

pub fn export_statistics<S: RowSink + ?Sized>(sink: &mut S, stats: &ZoneStats) -> Result<(), ExportError> {
    let header: Vec<String> = STATISTICS_HEADER.iter().map(|h| h.to_string()).collect();
    sink.write_row(&header)?;
    for (key, count) in stats.sorted_rows() {
        sink.write_row(&[key.zone.clone(), key.job_type.clone(), count.to_string()])?;
    }
    sink.finish()
}

pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvSink<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        info!("Writing CSV to {:?}", path);
        Ok(CsvSink::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        CsvSink {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(inner),
            rows: 0,
        }
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W, ExportError> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_row(&mut self, row: &[String]) -> Result<(), ExportError> {
        self.writer.write_record(row)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.writer.flush()?;
        Ok(())
    }
}

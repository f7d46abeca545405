//! Run records and metrics sinks.
//!
//! After each run the CLI hands a [`RunRecord`] to a sink for external
//! reporting. The CSV sink writes the `exec.csv` layout the project has
//! always used; the JSON-lines sink serializes the same record with serde.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One convolution run, as reported to a metrics sink.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    /// Image identifier (file name, without directories).
    pub image: String,
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Filter preset token.
    pub filter: String,
    /// Execution mode token.
    pub mode: String,
    /// Elapsed wall-clock time of the apply call, in microseconds.
    pub exec_time_micros: u128,
}

impl RunRecord {
    /// Build a record from run parameters and the measured duration.
    pub fn new(
        image: impl Into<String>,
        width: usize,
        height: usize,
        filter: impl Into<String>,
        mode: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            image: image.into(),
            width,
            height,
            filter: filter.into(),
            mode: mode.into(),
            exec_time_micros: elapsed.as_micros(),
        }
    }
}

/// Receives run records for external reporting.
pub trait MetricsSink {
    /// Report one finished run.
    fn report(&mut self, record: &RunRecord) -> io::Result<()>;
}

/// Writes records as CSV rows with a header line.
pub struct CsvSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl CsvSink {
    /// Create or truncate the CSV file and write the header row.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(writer, "img_name,img_w,img_h,filter,mode,exec_time")?;
        Ok(Self { path, writer })
    }

    /// Path the sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetricsSink for CsvSink {
    fn report(&mut self, record: &RunRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "{},{},{},{},{},{}",
            record.image,
            record.width,
            record.height,
            record.filter,
            record.mode,
            record.exec_time_micros,
        )?;
        self.writer.flush()
    }
}

/// Writes each record as one JSON object per line.
pub struct JsonLinesSink {
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    /// Create or truncate the JSON-lines file.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
        })
    }
}

impl MetricsSink for JsonLinesSink {
    fn report(&mut self, record: &RunRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writeln!(self.writer)?;
        self.writer.flush()
    }
}

/// Format a duration as a `seconds'millis'micros` microsecond string,
/// e.g. `0'012'345` for 12.345 milliseconds.
pub fn format_micros(elapsed: Duration) -> String {
    let micros = elapsed.as_micros();
    format!(
        "{}'{:03}'{:03}",
        micros / 1_000_000,
        micros / 1_000 % 1_000,
        micros % 1_000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_micros() {
        assert_eq!(format_micros(Duration::from_micros(0)), "0'000'000");
        assert_eq!(format_micros(Duration::from_micros(12_345)), "0'012'345");
        assert_eq!(
            format_micros(Duration::from_micros(3_004_005)),
            "3'004'005"
        );
    }

    #[test]
    fn test_csv_sink_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exec.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        let record = RunRecord::new(
            "bryce.jpg",
            1920,
            1080,
            "box_blur",
            "constant",
            Duration::from_micros(4242),
        );
        sink.report(&record).unwrap();
        drop(sink);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "img_name,img_w,img_h,filter,mode,exec_time"
        );
        assert_eq!(
            lines.next().unwrap(),
            "bryce.jpg,1920,1080,box_blur,constant,4242"
        );
    }

    #[test]
    fn test_json_sink_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exec.jsonl");

        let mut sink = JsonLinesSink::create(&path).unwrap();
        let record = RunRecord::new(
            "img.png",
            64,
            64,
            "sharpen",
            "shared",
            Duration::from_micros(99),
        );
        sink.report(&record).unwrap();
        drop(sink);

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(parsed["filter"], "sharpen");
        assert_eq!(parsed["exec_time_micros"], 99);
    }
}

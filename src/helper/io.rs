use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::io::{BufReader, Read, Result as IoResult, Write};
use std::path::Path;

use chrono::Local;
use flate2::read::MultiGzDecoder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::helper::background::CrossoverEvent;
use crate::helper::error::XoError;
use crate::helper::marker::{BlockRow, Marker, NcoRow};

/// Appends a timestamped line to the pipeline run log.
pub fn log_line(writer: &mut BufWriter<File>, message: &str) -> IoResult<()> {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(writer, "[{}] {}", now, message)?;
    writer.flush()?;
    Ok(())
}

/// Opens a CSV input, transparently decompressing `.gz` files.
fn open_input(path: &Path) -> Result<Box<dyn Read>, Box<dyn Error>> {
    if !path.exists() {
        return Err(XoError::InputFileNotFound(path.display().to_string()).into());
    }
    let file = File::open(path)?;
    let stream: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(stream)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_reader(open_input(path)?);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads the marker table, sorted by (chromosome name, position) so later
/// stages can assume ordered input.
pub fn read_markers(path: &Path) -> Result<Vec<Marker>, Box<dyn Error>> {
    let mut markers: Vec<Marker> = read_rows(path)?;
    markers.sort_by(|a, b| (&a.chrom_id, a.position).cmp(&(&b.chrom_id, b.position)));
    Ok(markers)
}

/// Reads the marker table in file order, for sampling the head of the
/// raw input.
pub fn read_markers_raw(path: &Path) -> Result<Vec<Marker>, Box<dyn Error>> {
    read_rows(path)
}

/// Reads the crossover table; events are sorted per chromosome where they
/// are consumed.
pub fn read_crossovers(path: &Path) -> Result<Vec<CrossoverEvent>, Box<dyn Error>> {
    read_rows(path)
}

pub fn read_block_rows(path: &Path) -> Result<Vec<BlockRow>, Box<dyn Error>> {
    read_rows(path)
}

pub fn write_markers(path: &Path, markers: &[Marker]) -> Result<(), Box<dyn Error>> {
    write_rows(path, markers)
}

pub fn write_block_rows(path: &Path, rows: &[BlockRow]) -> Result<(), Box<dyn Error>> {
    write_rows(path, rows)
}

pub fn write_nco_rows(path: &Path, rows: &[NcoRow]) -> Result<(), Box<dyn Error>> {
    write_rows(path, rows)
}

pub fn write_summaries<T: Serialize>(path: &Path, summaries: &[T]) -> Result<(), Box<dyn Error>> {
    write_rows(path, summaries)
}

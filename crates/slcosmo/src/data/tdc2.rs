//! TDC2 sample-file parsing and writing.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use slcosmo_core::{ImageCount, LensEnsemble};

use super::{DataError, Tdc2Ensemble};

/// Read one TDC2 sample file.
///
/// # Errors
///
/// Returns `DataError` if the file cannot be read, a header field is missing
/// or malformed, a sample row has the wrong width, or the lens fails
/// validation.
pub fn read_tdc2_file(path: &Path) -> Result<Tdc2Ensemble, DataError> {
    let file = File::open(path)?;
    let lens = parse_tdc2(BufReader::new(file))?;
    Ok(Tdc2Ensemble {
        lens,
        source: Some(path.to_path_buf()),
    })
}

/// Read a batch of TDC2 sample files, failing on the first bad one.
pub fn read_tdc2_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Tdc2Ensemble>, DataError> {
    paths.iter().map(|p| read_tdc2_file(p.as_ref())).collect()
}

fn parse_number(text: &str, line: usize) -> Result<f64, DataError> {
    text.parse().map_err(|_| DataError::InvalidValue {
        line,
        value: text.to_string(),
    })
}

/// Parse TDC2 content from any buffered reader.
pub fn parse_tdc2<R: BufRead>(reader: R) -> Result<LensEnsemble, DataError> {
    let mut header: HashMap<String, (usize, String)> = HashMap::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        let line_no = line_num + 1;

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if let Some((key, value)) = comment.split_once(':') {
                header.insert(
                    key.trim().to_string(),
                    (line_no, value.trim().to_string()),
                );
            }
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|field| parse_number(field, line_no))
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }

    let field = |key: &str| -> Result<f64, DataError> {
        let (line, value) = header
            .get(key)
            .ok_or_else(|| DataError::MissingField(key.to_string()))?;
        parse_number(value, *line)
    };

    let nim = field("Nim")?;
    if nim.fract() != 0.0 || nim < 0.0 {
        let (line, value) = &header["Nim"];
        return Err(DataError::InvalidValue {
            line: *line,
            value: value.clone(),
        });
    }
    let images = ImageCount::from_images(nim as usize)?;
    let q = field("Q")?;

    let mut delta_fp_obs = Vec::with_capacity(images.num_delays());
    let mut delta_fp_err = Vec::with_capacity(images.num_delays());
    for label in images.pair_labels() {
        delta_fp_obs.push(field(&format!("DeltaFP_{}", label))?);
        delta_fp_err.push(field(&format!("DeltaFP_{}_err", label))?);
    }

    if rows.is_empty() {
        return Err(DataError::Parse {
            line: 0,
            message: "no time-delay samples found".to_string(),
        });
    }

    Ok(LensEnsemble::new(
        images.num_images(),
        delta_fp_obs,
        delta_fp_err,
        q,
        rows,
    )?)
}

/// Write a lens ensemble in TDC2 format.
pub fn write_tdc2<W: Write>(lens: &LensEnsemble, mut writer: W) -> Result<(), DataError> {
    let labels = lens.images().pair_labels();

    writeln!(writer, "# TDC2 time-delay posterior samples")?;
    writeln!(writer, "# Nim: {}", lens.num_images())?;
    writeln!(writer, "# Q: {}", lens.q())?;
    for (i, label) in labels.iter().enumerate() {
        writeln!(writer, "# DeltaFP_{}: {}", label, lens.delta_fp_obs()[i])?;
        writeln!(writer, "# DeltaFP_{}_err: {}", label, lens.delta_fp_err()[i])?;
    }
    let columns: Vec<String> = labels.iter().map(|l| format!("dt_{}", l)).collect();
    writeln!(writer, "# {}", columns.join(" "))?;

    for row in lens.sample_rows() {
        let fields: Vec<String> = row.iter().map(|dt| dt.to_string()).collect();
        writeln!(writer, "{}", fields.join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a lens ensemble to a TDC2 file, returning the path written.
pub fn write_tdc2_file(lens: &LensEnsemble, path: &Path) -> Result<PathBuf, DataError> {
    let file = File::create(path)?;
    write_tdc2(lens, BufWriter::new(file))?;
    Ok(path.to_path_buf())
}

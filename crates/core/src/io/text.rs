//! Plain-text matrix reading/writing
//!
//! One grid row per line, values separated by whitespace. Blank lines and
//! anything after a `#` are ignored on input.

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::debug;

/// Read a text matrix file into a Raster
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<Raster<f64>> {
    let file = File::open(path.as_ref())?;
    let raster = read_matrix_from_reader(BufReader::new(file))?;
    debug!(
        "read {}x{} matrix from {}",
        raster.rows(),
        raster.cols(),
        path.as_ref().display()
    );
    Ok(raster)
}

/// Parse a text matrix held in memory
pub fn read_matrix_from_str(text: &str) -> Result<Raster<f64>> {
    read_matrix_from_reader(text.as_bytes())
}

/// Parse a text matrix from any buffered reader.
///
/// Fails with [`Error::MalformedInput`] when a line is not UTF-8 or a token is
/// not a number, when a row has a different number of values than the first
/// row, or when the input holds no values at all.
pub fn read_matrix_from_reader<R: BufRead>(reader: R) -> Result<Raster<f64>> {
    let mut values = Vec::new();
    let mut cols: Option<usize> = None;
    let mut rows = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => Error::MalformedInput {
                line: line_no,
                reason: "not valid UTF-8".to_string(),
            },
            _ => Error::Io(e),
        })?;
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };

        let before = values.len();
        for token in content.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| Error::MalformedInput {
                line: line_no,
                reason: format!("'{}' is not a number", token),
            })?;
            values.push(value);
        }

        let width = values.len() - before;
        if width == 0 {
            continue;
        }
        match cols {
            None => cols = Some(width),
            Some(expected) if expected != width => {
                return Err(Error::MalformedInput {
                    line: line_no,
                    reason: format!("expected {} values, found {}", expected, width),
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let cols = cols.ok_or_else(|| Error::MalformedInput {
        line: 0,
        reason: "no data rows".to_string(),
    })?;

    Raster::from_vec(values, rows, cols)
}

/// Write a Raster to a text matrix file
pub fn write_matrix<T, P>(raster: &Raster<T>, path: P) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_matrix_to_writer(raster, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a Raster as text: each value with 4 decimals followed by a space,
/// one grid row per line.
pub fn write_matrix_to_writer<T, W>(raster: &Raster<T>, mut writer: W) -> Result<()>
where
    T: RasterElement,
    W: Write,
{
    for row in raster.data().rows() {
        for &value in row.iter() {
            let v = value.as_f64().unwrap_or(f64::NAN);
            write!(writer, "{:.4} ", v)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Render a Raster as a text matrix string
pub fn write_matrix_to_string<T: RasterElement>(raster: &Raster<T>) -> Result<String> {
    let mut buf = Vec::new();
    write_matrix_to_writer(raster, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_read_simple_matrix() {
        let raster = read_matrix_from_str("1 2 3\n4.5 5 6\n").unwrap();
        assert_eq!(raster.shape(), (2, 3));
        assert_eq!(raster.get(1, 0).unwrap(), 4.5);
        assert_eq!(raster.get(1, 2).unwrap(), 6.0);
    }

    #[test]
    fn test_read_skips_blank_lines_and_comments() {
        let text = "# elevation\n\n1\t2\n  3 4   # trailing\n\n";
        let raster = read_matrix_from_str(text).unwrap();
        assert_eq!(raster.shape(), (2, 2));
        assert_eq!(raster.get(1, 1).unwrap(), 4.0);
    }

    #[test]
    fn test_read_rejects_ragged_rows() {
        let err = read_matrix_from_str("1 2 3\n4 5\n").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_read_rejects_non_numeric() {
        let err = read_matrix_from_str("1 2\n3 snow\n").unwrap_err();
        match err {
            Error::MalformedInput { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("snow"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_rejects_invalid_utf8() {
        let err = read_matrix_from_reader(&b"1 2\n3 \xff\n"[..]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_read_rejects_empty_input() {
        assert!(matches!(
            read_matrix_from_str("\n# nothing\n"),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_write_format() {
        let raster = Raster::from_vec(vec![0.0, 1.23456, 10.0, 2.5], 2, 2).unwrap();
        let text = write_matrix_to_string(&raster).unwrap();
        assert_eq!(text, "0.0000 1.2346 \n10.0000 2.5000 \n");
    }

    #[test]
    fn test_file_roundtrip_within_tolerance() {
        let values: Vec<f64> = (0..20).map(|i| (i as f64 * 0.731).sin() * 13.0).collect();
        let raster = Raster::from_vec(values, 4, 5).unwrap();

        let tmp = tempfile::NamedTempFile::new().unwrap();
        write_matrix(&raster, tmp.path()).unwrap();
        let reloaded = read_matrix(tmp.path()).unwrap();

        assert_eq!(reloaded.shape(), raster.shape());
        for (a, b) in raster.data().iter().zip(reloaded.data().iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-4);
        }
    }
}

use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::algo::matrix::Matrix;
use crate::error::{Result, SymNmfError};

/// Read a comma-separated point file: one point per line, no header.
pub fn read_points(path: impl AsRef<Path>) -> Result<Matrix> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let points = parse_points(file)?;
    debug!(path = %path.display(), n = points.rows(), d = points.cols(), "read points");
    Ok(points)
}

/// Parse comma-separated points from any reader.
///
/// Blank lines are skipped. Every line must carry the same number of fields
/// and every field must parse as a finite float.
pub fn parse_points(reader: impl Read) -> Result<Matrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 1);
        let row = record
            .iter()
            .map(|field| match field.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                Ok(_) => Err(SymNmfError::InputFormat {
                    line,
                    reason: format!("'{field}' is not finite"),
                }),
                Err(_) => Err(SymNmfError::InputFormat {
                    line,
                    reason: format!("'{field}' is not a number"),
                }),
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SymNmfError::InputFormat {
            line: 0,
            reason: "no points".into(),
        });
    }
    Matrix::from_rows(&rows)
}

/// Render a matrix as comma-separated rows with 4 decimal digits.
pub fn format_matrix(m: &Matrix) -> String {
    let mut out = String::new();
    for row in m.iter_rows() {
        for (j, v) in row.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            let _ = write!(out, "{v:.4}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_points() {
        let m = parse_points("1.0,2.0\n3.5,-4\n".as_bytes()).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0], vec![3.5, -4.0]]);
    }

    #[test]
    fn parse_skips_blank_lines_and_spaces() {
        let m = parse_points("1, 2\n\n3 ,4\n".as_bytes()).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m[(1, 0)], 3.0);
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = parse_points("1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SymNmfError::InputFormat { .. }), "{err}");
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = parse_points("1,2\n3,abc\n".as_bytes()).unwrap_err();
        match err {
            SymNmfError::InputFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_non_finite() {
        for input in ["nan,0\n0,0\n", "0,0\n1,inf\n", "0,0\n1,1\n-infinity,2\n"] {
            match parse_points(input.as_bytes()) {
                Err(SymNmfError::InputFormat { line, reason }) => {
                    assert!(line >= 1, "{input:?}");
                    assert!(reason.contains("not finite"), "{reason}");
                }
                other => panic!("expected input error for {input:?}, got {other:?}"),
            }
        }
        let err = parse_points("0,0\n0,1\nNaN,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SymNmfError::InputFormat { line: 3, .. }), "{err}");
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(parse_points("".as_bytes()).is_err());
    }

    #[test]
    fn read_missing_file_is_io_failure() {
        let err = read_points("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, SymNmfError::IoFailure(_)));
    }

    #[test]
    fn format_four_decimals() {
        let m = Matrix::from_rows(&[vec![1.0, 0.123456], vec![-2.5, 0.0]]).unwrap();
        assert_eq!(format_matrix(&m), "1.0000,0.1235\n-2.5000,0.0000\n");
    }
}

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use ndarray::{Array1, Array2};
use sylva::Dataset;
use tracing::debug;

use crate::error::{DatasetError, Result};

/// Read a CSV file into a dataset
///
/// Every field has to parse as a floating point number, `NaN` included. The last column becomes
/// the targets and all other columns the features, so every row needs at least two columns and
/// all rows the same number. With `has_header` the first line is skipped and its names, except
/// the last one, become the feature names.
///
/// Errors report the offending line, counting from one and including the header.
pub fn load_csv<P: AsRef<Path>>(path: P, has_header: bool) -> Result<Dataset<f64>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(csv::Error::from)?;
    let dataset = load_csv_from_reader(file, has_header)?;

    debug!(
        path = %path.display(),
        nsamples = dataset.nsamples(),
        nfeatures = dataset.nfeatures(),
        "loaded CSV dataset"
    );

    Ok(dataset)
}

/// Read CSV data from any reader into a dataset, see [`load_csv`]
pub fn load_csv_from_reader<R: Read>(csv: R, has_header: bool) -> Result<Dataset<f64>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv);

    let header = if has_header {
        Some(reader.headers()?.clone())
    } else {
        None
    };

    let (mut values, mut targets) = (Vec::new(), Vec::new());
    let mut ncolumns = header.as_ref().map(StringRecord::len);
    for record in reader.records() {
        let record = record?;
        let row = record.position().map_or(0, |pos| pos.line());
        let columns = record.len();

        if columns < 2 {
            return Err(DatasetError::TooFewColumns { row, columns });
        }
        match ncolumns {
            Some(expected) if expected != columns => {
                return Err(DatasetError::RaggedRow {
                    row,
                    expected,
                    actual: columns,
                })
            }
            _ => ncolumns = Some(columns),
        }

        for (column, field) in record.iter().enumerate() {
            let value = field
                .parse::<f64>()
                .map_err(|_| DatasetError::ParseFloat {
                    row,
                    column: column + 1,
                    value: field.to_string(),
                })?;

            if column + 1 == columns {
                targets.push(value);
            } else {
                values.push(value);
            }
        }
    }

    let nfeatures = match ncolumns {
        Some(n) if n >= 2 => n - 1,
        Some(columns) => return Err(DatasetError::TooFewColumns { row: 1, columns }),
        None => 0,
    };
    let records = Array2::from_shape_vec((targets.len(), nfeatures), values)
        .map_err(sylva::Error::from)?;
    let dataset = Dataset::new(records, Array1::from(targets));

    Ok(match header {
        Some(names) => {
            let names = names.iter().take(nfeatures).collect::<Vec<_>>();
            dataset.with_feature_names(names)
        }
        None => dataset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn last_column_is_target() -> Result<()> {
        let csv = "1.5,2,0\n3,-4e1,1\n";
        let dataset = load_csv_from_reader(csv.as_bytes(), false)?;

        assert_abs_diff_eq!(*dataset.records(), array![[1.5, 2.], [3., -40.]]);
        assert_abs_diff_eq!(*dataset.targets(), array![0., 1.]);
        assert_eq!(dataset.feature_names(), vec!["feature-0", "feature-1"]);

        Ok(())
    }

    #[test]
    fn header_gives_feature_names() -> Result<()> {
        let csv = "width, height, label\n1, 2, 0\n3, 4, 1\n";
        let dataset = load_csv_from_reader(csv.as_bytes(), true)?;

        assert_eq!(dataset.nsamples(), 2);
        assert_eq!(dataset.feature_names(), vec!["width", "height"]);

        Ok(())
    }

    #[test]
    fn every_column_is_parsed() {
        // the first field of a row is no exception
        let err = load_csv_from_reader("a,b\n1,2\nx,4\n".as_bytes(), true).unwrap_err();

        match err {
            DatasetError::ParseFloat { row, column, value } => {
                assert_eq!((row, column), (3, 1));
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn missing_values_are_kept() -> Result<()> {
        let dataset = load_csv_from_reader("NaN,1\n2,0\n".as_bytes(), false)?;

        assert!(dataset.records()[(0, 0)].is_nan());
        assert_abs_diff_eq!(dataset.records()[(1, 0)], 2.);

        Ok(())
    }

    #[test]
    fn rows_need_two_columns() {
        assert!(matches!(
            load_csv_from_reader("1,2\n3\n".as_bytes(), false),
            Err(DatasetError::TooFewColumns { row: 2, columns: 1 })
        ));
        assert!(matches!(
            load_csv_from_reader("label\n".as_bytes(), true),
            Err(DatasetError::TooFewColumns { row: 1, columns: 1 })
        ));
    }

    #[test]
    fn rows_need_equal_length() {
        assert!(matches!(
            load_csv_from_reader("1,2,3\n4,5\n".as_bytes(), false),
            Err(DatasetError::RaggedRow {
                row: 2,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn empty_input_gives_empty_dataset() -> Result<()> {
        let dataset = load_csv_from_reader("".as_bytes(), false)?;
        assert_eq!(dataset.nsamples(), 0);

        let dataset = load_csv_from_reader("x,y,z\n".as_bytes(), true)?;
        assert_eq!((dataset.nsamples(), dataset.nfeatures()), (0, 2));

        Ok(())
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b,y").unwrap();
        writeln!(file, "0,1,1").unwrap();
        writeln!(file, "1,0,0").unwrap();

        let dataset = load_csv(file.path(), true)?;
        assert_abs_diff_eq!(*dataset.records(), array![[0., 1.], [1., 0.]]);
        assert_abs_diff_eq!(*dataset.targets(), array![1., 0.]);

        assert!(matches!(
            load_csv(file.path().with_extension("missing"), true),
            Err(DatasetError::Csv(_))
        ));

        Ok(())
    }
}

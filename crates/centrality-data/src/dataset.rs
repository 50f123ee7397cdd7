//! N-dimensional numeric datasets
//!
//! Every per-event quantity in the container (spectra, flow tables, nucleon
//! lists, scalars) is stored as a [`Dataset`]: a row-major `f64` buffer plus a
//! shape. A scalar has an empty shape and exactly one value.
//!
//! # Serialization
//!
//! Datasets are stored as nested JSON arrays, scalars as bare numbers. JSON has
//! no NaN, so degenerate entries are written as `null`; the strings `"nan"`,
//! `"inf"` and `"-inf"` are accepted on input as well.
//!
//! ```
//! use centrality_data::dataset::Dataset;
//!
//! let table: Dataset = serde_json::from_str("[[0.5, 12.0], [1.0, null]]").unwrap();
//! assert_eq!(table.shape(), [2, 2]);
//! assert!(table.values()[3].is_nan());
//!
//! let clean = table.sanitized();
//! assert_eq!(clean.values(), [0.5, 12.0, 1.0, 0.0]);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("nested arrays are not rectangular")]
    Ragged,
    #[display("expected a number, found {found}")]
    NotNumeric { found: String },
    #[display("shape {shape:?} needs {expected} values, got {actual}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[display("expected a 2-dimensional table, got {ndim} dimension(s)")]
    NotATable { ndim: usize },
}

/// A dense n-dimensional array of `f64` in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Dataset {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl Dataset {
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: vec![],
            values: vec![value],
        }
    }

    pub fn from_shape_vec(shape: Vec<usize>, values: Vec<f64>) -> Result<Self, DatasetError> {
        let expected = shape.iter().product::<usize>();
        if expected != values.len() {
            return Err(DatasetError::ShapeMismatch {
                shape,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// Builds a 2-dimensional table from rows of equal length.
    pub fn from_rows<R>(rows: R) -> Result<Self, DatasetError>
    where
        R: IntoIterator<Item = Vec<f64>>,
    {
        let mut nrows = 0;
        let mut ncols = None;
        let mut values = vec![];
        for row in rows {
            if *ncols.get_or_insert(row.len()) != row.len() {
                return Err(DatasetError::Ragged);
            }
            values.extend(row);
            nrows += 1;
        }
        Ok(Self {
            shape: vec![nrows, ncols.unwrap_or(0)],
            values,
        })
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Length of the first axis, `None` for scalars.
    #[must_use]
    pub fn row_count(&self) -> Option<usize> {
        self.shape.first().copied()
    }

    /// Returns a copy with every NaN and infinity replaced by zero.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        self.clone().into_sanitized()
    }

    #[must_use]
    pub fn into_sanitized(mut self) -> Self {
        for value in &mut self.values {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        self
    }

    /// Views the dataset as a row/column table.
    pub fn as_table(&self) -> Result<Table<'_>, DatasetError> {
        match *self.shape.as_slice() {
            [nrows, ncols] => Ok(Table {
                nrows,
                ncols,
                values: &self.values,
            }),
            _ => Err(DatasetError::NotATable { ndim: self.ndim() }),
        }
    }
}

/// A borrowed 2-dimensional view of a [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    nrows: usize,
    ncols: usize,
    values: &'a [f64],
}

impl<'a> Table<'a> {
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[must_use]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row < self.nrows && column < self.ncols {
            Some(self.values[row * self.ncols + column])
        } else {
            None
        }
    }

    /// Iterates over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &'a [f64]> + use<'a> {
        // chunks_exact panics on a zero chunk size
        let ncols = self.ncols.max(1);
        let rows = if self.ncols == 0 { &[][..] } else { self.values };
        rows.chunks_exact(ncols)
    }

    /// Values of one column, top to bottom. `None` if the column is out of range.
    #[must_use]
    pub fn column(&self, column: usize) -> Option<Vec<f64>> {
        (column < self.ncols).then(|| self.rows().map(|row| row[column]).collect())
    }
}

impl TryFrom<Value> for Dataset {
    type Error = DatasetError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut shape = vec![];
        let mut cursor = &value;
        while let Value::Array(items) = cursor {
            shape.push(items.len());
            match items.first() {
                Some(first) => cursor = first,
                None => break,
            }
        }

        let mut values = Vec::with_capacity(shape.iter().product());
        flatten_into(&value, &shape, &mut values)?;
        Ok(Self { shape, values })
    }
}

impl From<Dataset> for Value {
    fn from(dataset: Dataset) -> Self {
        nest(&dataset.shape, &dataset.values)
    }
}

fn flatten_into(value: &Value, shape: &[usize], out: &mut Vec<f64>) -> Result<(), DatasetError> {
    match (shape.split_first(), value) {
        (None, value) => out.push(parse_element(value)?),
        (Some((&len, rest)), Value::Array(items)) if items.len() == len => {
            for item in items {
                flatten_into(item, rest, out)?;
            }
        }
        _ => return Err(DatasetError::Ragged),
    }
    Ok(())
}

fn parse_element(value: &Value) -> Result<f64, DatasetError> {
    let not_numeric = || DatasetError::NotNumeric {
        found: value.to_string(),
    };
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(not_numeric),
        Value::Null => Ok(f64::NAN),
        Value::String(text) => match text.to_ascii_lowercase().as_str() {
            "nan" => Ok(f64::NAN),
            "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
            "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
            _ => Err(not_numeric()),
        },
        Value::Array(_) => Err(DatasetError::Ragged),
        Value::Bool(_) | Value::Object(_) => Err(not_numeric()),
    }
}

fn nest(shape: &[usize], values: &[f64]) -> Value {
    match shape.split_first() {
        None => serde_json::Number::from_f64(values[0]).map_or(Value::Null, Value::Number),
        Some((&len, rest)) => {
            let stride = rest.iter().product::<usize>();
            Value::Array(
                (0..len)
                    .map(|i| nest(rest, &values[i * stride..(i + 1) * stride]))
                    .collect(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Dataset, DatasetError> {
        Dataset::try_from(serde_json::from_str::<Value>(json).unwrap())
    }

    #[test]
    fn test_scalar() {
        let dataset = parse("3.5").unwrap();
        assert!(dataset.is_scalar());
        assert_eq!(dataset.values(), [3.5]);
        assert_eq!(dataset.row_count(), None);
        assert_eq!(serde_json::to_string(&dataset).unwrap(), "3.5");
    }

    #[test]
    fn test_three_dimensional_shape() {
        let dataset = parse("[[[1, 2], [3, 4], [5, 6]]]").unwrap();
        assert_eq!(dataset.shape(), [1, 3, 2]);
        assert_eq!(dataset.values(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            serde_json::to_string(&dataset).unwrap(),
            "[[[1.0,2.0],[3.0,4.0],[5.0,6.0]]]"
        );
    }

    #[test]
    fn test_empty_arrays() {
        assert_eq!(parse("[]").unwrap().shape(), [0]);
        let dataset = parse("[[], []]").unwrap();
        assert_eq!(dataset.shape(), [2, 0]);
        assert_eq!(serde_json::to_string(&dataset).unwrap(), "[[],[]]");
    }

    #[test]
    fn test_ragged_is_rejected() {
        assert_eq!(parse("[[1, 2], [3]]"), Err(DatasetError::Ragged));
        assert_eq!(parse("[[1, 2], 3]"), Err(DatasetError::Ragged));
        assert_eq!(parse("[1, [2]]"), Err(DatasetError::Ragged));
    }

    #[test]
    fn test_non_finite_markers() {
        let dataset = parse(r#"[null, "NaN", "inf", "-Infinity", 1]"#).unwrap();
        let values = dataset.values();
        assert!(values[0].is_nan() && values[1].is_nan());
        assert_eq!(values[2], f64::INFINITY);
        assert_eq!(values[3], f64::NEG_INFINITY);
        assert_eq!(dataset.sanitized().values(), [0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_non_finite_written_as_null() {
        let dataset = Dataset::from_shape_vec(vec![2], vec![f64::NAN, 1.0]).unwrap();
        assert_eq!(serde_json::to_string(&dataset).unwrap(), "[null,1.0]");
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        assert!(matches!(
            parse(r#"[1, "x"]"#),
            Err(DatasetError::NotNumeric { .. })
        ));
        assert!(matches!(parse("true"), Err(DatasetError::NotNumeric { .. })));
    }

    #[test]
    fn test_table_view() {
        let dataset = Dataset::from_rows([vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let table = dataset.as_table().unwrap();
        assert_eq!((table.nrows(), table.ncols()), (2, 3));
        assert_eq!(table.get(1, 2), Some(6.0));
        assert_eq!(table.get(2, 0), None);
        assert_eq!(table.column(1), Some(vec![2.0, 5.0]));
        assert_eq!(table.column(3), None);
        assert_eq!(table.rows().count(), 2);
    }

    #[test]
    fn test_table_requires_two_dimensions() {
        assert_eq!(
            Dataset::scalar(1.0).as_table().unwrap_err(),
            DatasetError::NotATable { ndim: 0 }
        );
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(matches!(
            Dataset::from_shape_vec(vec![2, 2], vec![1.0]),
            Err(DatasetError::ShapeMismatch { expected: 4, .. })
        ));
        assert_eq!(
            Dataset::from_rows([vec![1.0], vec![1.0, 2.0]]),
            Err(DatasetError::Ragged)
        );
    }
}

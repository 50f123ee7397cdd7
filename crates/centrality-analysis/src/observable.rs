//! Scalar centrality observables extracted from event datasets
//!
//! An [`ExtractionConfig`] names the dataset(s) an observable is computed from
//! and the [`ReductionKind`] that turns them into one number. Configurations
//! are plain data and can be loaded from JSON:
//!
//! ```json
//! {
//!   "id": "central_ET",
//!   "name": "Central ET",
//!   "datasets": "particle_9999_dNdeta_pT_0.2_3.dat",
//!   "reduction": {
//!     "kind": "sum_in_window",
//!     "window_column": 0,
//!     "value_column": -2,
//!     "min": 0.0,
//!     "max": 0.5,
//!     "absolute": true
//!   },
//!   "description": "Central transverse energy in |eta| <= 0.5"
//! }
//! ```
//!
//! # Dataset selection
//!
//! `datasets` is either a string or a list of strings:
//!
//! - a string containing `*`, `?` or `[` is a glob pattern; the first matching
//!   dataset name (in lexicographic order) is used
//! - any other string is an exact dataset name
//! - a list names several datasets, all of which must be present
//!
//! # Failure handling
//!
//! Extraction never fails for a single event. A missing dataset makes the
//! observable absent; a reduction that cannot be evaluated (out-of-range
//! column, wrong dimensionality, non-finite result) is logged and also makes
//! the observable absent. Only a malformed glob pattern is an error, reported
//! once per configuration by [`ExtractionConfig::compile`].

use centrality_data::{dataset::Dataset, event::EventRecord};
use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ReductionError {
    #[display("expected a table, got {ndim} dimension(s)")]
    NotATable { ndim: usize },
    #[display("column {column} is out of range for a table with {ncols} column(s)")]
    ColumnOutOfRange { column: i64, ncols: usize },
    #[display("table has no rows")]
    NoRows,
    #[display("expected a single input dataset, got {actual}")]
    NotSingleSource { actual: usize },
    #[display("no input datasets")]
    NoSources,
    #[display("result {value} is not finite")]
    NonFinite { value: f64 },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ExtractError {
    #[display("invalid dataset pattern '{pattern}' in configuration '{config_id}'")]
    InvalidPattern {
        config_id: String,
        pattern: String,
        #[error(source)]
        source: globset::Error,
    },
}

/// How datasets are reduced to a scalar observable.
///
/// Column indices may be negative, counting from the last column (`-1` is the
/// last column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReductionKind {
    /// `data[0, column]`
    FirstRowValue { column: i64 },
    /// Sum of `value_column` over rows whose `window_column` lies in `[min, max]`.
    SumInWindow {
        window_column: i64,
        value_column: i64,
        min: f64,
        max: f64,
        /// Compare `|window_column|` instead of the raw value.
        #[serde(default)]
        absolute: bool,
    },
    /// Number of rows whose `column` is nonzero.
    CountNonzeroFlag { column: i64 },
    /// `Σ value_column * weight_column`
    ColumnWeightedSum {
        value_column: i64,
        weight_column: i64,
    },
    /// Number of rows (length of the first axis).
    RowCount,
    /// Applies `each` to every input dataset and sums the results.
    MultiSourceSum { each: Box<ReductionKind> },
}

impl ReductionKind {
    /// Evaluates the reduction on sanitized inputs, in configured order.
    ///
    /// ```
    /// use centrality_analysis::observable::ReductionKind;
    /// use centrality_data::dataset::Dataset;
    ///
    /// let table = Dataset::from_rows([vec![-0.4, 10.0, 0.0], vec![0.2, 20.0, 0.0], vec![0.9, 40.0, 0.0]]).unwrap();
    /// let reduction = ReductionKind::SumInWindow {
    ///     window_column: 0,
    ///     value_column: -2,
    ///     min: 0.0,
    ///     max: 0.5,
    ///     absolute: true,
    /// };
    /// assert_eq!(reduction.apply(&[&table]).unwrap(), 30.0);
    /// ```
    pub fn apply(&self, inputs: &[&Dataset]) -> Result<f64, ReductionError> {
        let value = match self {
            Self::MultiSourceSum { each } => {
                if inputs.is_empty() {
                    return Err(ReductionError::NoSources);
                }
                inputs
                    .iter()
                    .map(|input| each.apply(&[*input]))
                    .sum::<Result<f64, _>>()?
            }
            _ => match inputs {
                [input] => self.apply_single(input)?,
                _ => {
                    return Err(ReductionError::NotSingleSource {
                        actual: inputs.len(),
                    });
                }
            },
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ReductionError::NonFinite { value })
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn apply_single(&self, data: &Dataset) -> Result<f64, ReductionError> {
        let table = || {
            data.as_table()
                .map_err(|_| ReductionError::NotATable { ndim: data.ndim() })
        };
        match self {
            Self::FirstRowValue { column } => {
                let table = table()?;
                let column = resolve_column(*column, table.ncols())?;
                table.get(0, column).ok_or(ReductionError::NoRows)
            }
            Self::SumInWindow {
                window_column,
                value_column,
                min,
                max,
                absolute,
            } => {
                let table = table()?;
                let window_column = resolve_column(*window_column, table.ncols())?;
                let value_column = resolve_column(*value_column, table.ncols())?;
                Ok(table
                    .rows()
                    .filter(|row| {
                        let x = if *absolute {
                            row[window_column].abs()
                        } else {
                            row[window_column]
                        };
                        (*min..=*max).contains(&x)
                    })
                    .map(|row| row[value_column])
                    .sum())
            }
            Self::CountNonzeroFlag { column } => {
                let table = table()?;
                let column = resolve_column(*column, table.ncols())?;
                Ok(table.rows().filter(|row| row[column] != 0.0).count() as f64)
            }
            Self::ColumnWeightedSum {
                value_column,
                weight_column,
            } => {
                let table = table()?;
                let value_column = resolve_column(*value_column, table.ncols())?;
                let weight_column = resolve_column(*weight_column, table.ncols())?;
                Ok(table
                    .rows()
                    .map(|row| row[value_column] * row[weight_column])
                    .sum())
            }
            Self::RowCount => data
                .row_count()
                .map(|rows| rows as f64)
                .ok_or(ReductionError::NotATable { ndim: 0 }),
            Self::MultiSourceSum { .. } => self.apply(&[data]),
        }
    }
}

fn resolve_column(column: i64, ncols: usize) -> Result<usize, ReductionError> {
    let out_of_range = || ReductionError::ColumnOutOfRange { column, ncols };
    let index = if column < 0 {
        let ncols = i64::try_from(ncols).map_err(|_| out_of_range())?;
        usize::try_from(ncols + column).map_err(|_| out_of_range())?
    } else {
        usize::try_from(column).map_err(|_| out_of_range())?
    };
    if index < ncols {
        Ok(index)
    } else {
        Err(out_of_range())
    }
}

/// The dataset name(s) a configuration reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetSelector {
    Single(String),
    List(Vec<String>),
}

impl DatasetSelector {
    fn is_pattern(name: &str) -> bool {
        name.contains(['*', '?', '['])
    }
}

impl std::fmt::Display for DatasetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(name) => f.write_str(name),
            Self::List(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

/// A named recipe for one centrality observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub id: String,
    pub name: String,
    pub datasets: DatasetSelector,
    pub reduction: ReductionKind,
    #[serde(default)]
    pub description: String,
}

impl ExtractionConfig {
    /// Prepares the configuration for extraction, compiling its glob pattern.
    pub fn compile(&self) -> Result<Extractor<'_>, ExtractError> {
        let sources = match &self.datasets {
            DatasetSelector::Single(pattern) if DatasetSelector::is_pattern(pattern) => {
                let matcher = Glob::new(pattern)
                    .map_err(|source| ExtractError::InvalidPattern {
                        config_id: self.id.clone(),
                        pattern: pattern.clone(),
                        source,
                    })?
                    .compile_matcher();
                Sources::Pattern(matcher)
            }
            DatasetSelector::Single(name) => Sources::Names(std::slice::from_ref(name)),
            DatasetSelector::List(names) => Sources::Names(names),
        };
        Ok(Extractor {
            config: self,
            sources,
        })
    }
}

#[derive(Debug, Clone)]
enum Sources<'a> {
    Names(&'a [String]),
    Pattern(GlobMatcher),
}

/// A compiled [`ExtractionConfig`].
#[derive(Debug, Clone)]
pub struct Extractor<'a> {
    config: &'a ExtractionConfig,
    sources: Sources<'a>,
}

impl Extractor<'_> {
    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        self.config
    }

    /// Looks up the input datasets of `event`, or `None` if any is missing.
    fn inputs<'e>(&self, event: &'e EventRecord) -> Option<Vec<&'e Dataset>> {
        match &self.sources {
            Sources::Names(names) => names.iter().map(|name| event.get(name)).collect(),
            Sources::Pattern(matcher) => event
                .iter()
                .find(|(name, _)| matcher.is_match(name))
                .map(|(_, dataset)| vec![dataset]),
        }
    }

    /// Computes the observable of one event.
    ///
    /// Returns `None` if a dataset is missing or the reduction fails; failures
    /// are logged with the event id and configuration.
    #[must_use]
    pub fn extract(&self, event_id: &str, event: &EventRecord) -> Option<f64> {
        let Some(inputs) = self.inputs(event) else {
            tracing::debug!(
                event = event_id,
                configuration = %self.config.id,
                datasets = %self.config.datasets,
                "dataset missing, observable absent"
            );
            return None;
        };
        let sanitized = inputs
            .into_iter()
            .map(Dataset::sanitized)
            .collect::<Vec<_>>();
        let refs = sanitized.iter().collect::<Vec<_>>();
        match self.config.reduction.apply(&refs) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    event = event_id,
                    configuration = %self.config.id,
                    "failed to extract observable: {err}"
                );
                None
            }
        }
    }
}

//! Statistical building blocks for centrality classification.
//!
//! This crate provides:
//!
//! - **Percentiles**: nearest-rank lookup of threshold values in sorted data
//! - **Binning**: partitioning of ranked events into percentile classes
//! - **Descriptive statistics**: min, max, mean, median and spread of a class
//!
//! # Modules
//!
//! - [`percentiles`]: Nearest-rank percentile lookup
//! - [`binning`]: Centrality classes from cut points and observables
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Classifying events
//!
//! ```
//! use centrality_stats::binning::{CutPoints, classify};
//!
//! let observables = [("a", 120.0), ("b", 80.0), ("c", 15.0), ("d", 40.0)];
//! let classification = classify(observables, &CutPoints::new(vec![0.0, 50.0, 100.0]).unwrap());
//!
//! let labels = classification
//!     .classes
//!     .iter()
//!     .map(|class| (class.label.as_str(), class.members.len()))
//!     .collect::<Vec<_>>();
//! assert_eq!(labels, [("C0-50", 2), ("C50-100", 2)]);
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use centrality_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod binning;
pub mod descriptive;
pub mod percentiles;

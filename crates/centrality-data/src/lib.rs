//! Data model and file formats for centrality analysis.
//!
//! # Modules
//!
//! - [`dataset`]: n-dimensional `f64` arrays with NaN sanitization
//! - [`event`]: event records and the event database
//! - [`container`]: JSON container files, optionally zstd-compressed
//! - [`mapping`]: the classification result shared by every downstream step
//! - [`keyed`]: insertion-ordered maps used by the output formats
//!
//! # Examples
//!
//! ```
//! use centrality_data::event::EventDatabase;
//!
//! let database: EventDatabase = serde_json::from_str(r#"{
//!     "event_0": {"NcollList0.dat": [[0.1, 0.2], [0.3, 0.4]]},
//!     "event_1": {"NcollList1.dat": [[0.5, 0.6]]}
//! }"#).unwrap();
//!
//! let rows = database
//!     .iter()
//!     .map(|(id, event)| (id, event.get(&format!("NcollList{}.dat", &id[6..])).unwrap().row_count()))
//!     .collect::<Vec<_>>();
//! assert_eq!(rows, [("event_0", Some(2)), ("event_1", Some(1))]);
//! ```

pub mod container;
pub mod dataset;
pub mod event;
pub mod keyed;
pub mod mapping;

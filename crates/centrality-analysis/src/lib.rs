//! Centrality classification and class averaging of simulated collision events
//!
//! This crate turns a per-event database into centrality classes and
//! class-averaged results.
//!
//! # Overview
//!
//! ## Classification Workflow
//!
//! 1. **Choose Observables** ([`registry::Registry`]): the detector-like
//!    estimators to classify with, built in or loaded from JSON
//! 2. **Extract** ([`observable::ExtractionConfig`]): one scalar per event and
//!    configuration; events without usable data are left out
//! 3. **Bin** ([`mapping_builder`]): rank events by observable and split the
//!    ranking at the cut points, for every configuration in parallel
//! 4. **Persist** ([`centrality_data::mapping::MappingDocument`]): the mapping
//!    shared with the aggregation step
//!
//! ## Averaging Workflow
//!
//! 1. **Load Mapping**: pick one configuration (or all) from the document
//! 2. **Average** ([`aggregate`]): per class, average every dataset name found
//!    in the member events
//!
//! ## Event Tables
//!
//! - [`summary`]: flow coefficients, mean `pT`, multiplicity, `Ncoll` and
//!   `Npart` per event, stored as a new database
//! - [`yields`]: `Ncoll`, `Npart` and charged-particle yields in experimental
//!   acceptances, as a text table
//!
//! # Examples
//!
//! ```
//! use centrality_analysis::{aggregate, mapping_builder, registry::Registry};
//! use centrality_data::event::EventDatabase;
//! use centrality_stats::binning::CutPoints;
//!
//! let database: EventDatabase = serde_json::from_str(r#"{
//!     "event_0": {"particle_9999_vndata_eta_-0.5_0.5.dat": [[0, 1800.0]], "v2": 0.02},
//!     "event_1": {"particle_9999_vndata_eta_-0.5_0.5.dat": [[0, 1200.0]], "v2": 0.05},
//!     "event_2": {"particle_9999_vndata_eta_-0.5_0.5.dat": [[0, 300.0]], "v2": 0.09},
//!     "event_3": {"particle_9999_vndata_eta_-0.5_0.5.dat": [[0, 100.0]], "v2": 0.07}
//! }"#).unwrap();
//!
//! let registry = Registry::builtin();
//! let cuts = CutPoints::new(vec![0.0, 50.0, 100.0]).unwrap();
//! let document = mapping_builder::build_mapping(&database, &registry, registry.default_id(), &cuts);
//!
//! let (_, mapping) = document.select(None).unwrap();
//! let averages = aggregate::aggregate(mapping, &database);
//! let central_v2 = averages.get("C0-50").unwrap().get("v2").unwrap();
//! assert!((central_v2.values()[0] - 0.035).abs() < 1e-12);
//! ```

pub mod aggregate;
pub mod mapping_builder;
pub mod observable;
pub mod registry;
pub mod summary;
pub mod yields;

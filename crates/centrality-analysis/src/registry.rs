//! The set of extraction configurations a run classifies with
//!
//! [`Registry::builtin`] holds the detector-inspired estimators used for
//! comparison with experiment; [`Registry::load`] reads a custom set from a
//! JSON file of the form
//!
//! ```json
//! {
//!   "default": "central_dNdy",
//!   "configurations": [ { "id": "central_dNdy", "...": "..." } ]
//! }
//! ```
//!
//! `default` names the configuration used for physical file organization when
//! none is requested.

use std::path::{Path, PathBuf};

use centrality_data::container::{self, ContainerError};
use serde::{Deserialize, Serialize};

use crate::observable::{DatasetSelector, ExtractionConfig, ReductionKind};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RegistryError {
    #[display("failed to read registry file {}", path.display())]
    Read {
        path: PathBuf,
        #[error(source)]
        source: ContainerError,
    },
    #[display("the registry contains no configurations")]
    Empty,
    #[display("configuration '{id}' is defined more than once")]
    DuplicateId { id: String },
    #[display("default configuration '{id}' is not defined")]
    UnknownDefault { id: String },
    #[display(
        "unknown centrality configuration '{requested}' (available: {})",
        available.join(", ")
    )]
    UnknownConfiguration {
        requested: String,
        available: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    default: String,
    configurations: Vec<ExtractionConfig>,
}

impl Registry {
    /// Builds a registry, checking that ids are unique and the default exists.
    pub fn new(
        default: impl Into<String>,
        configurations: Vec<ExtractionConfig>,
    ) -> Result<Self, RegistryError> {
        Self {
            default: default.into(),
            configurations,
        }
        .validated()
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let registry: Self = container::read_json(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        registry.validated()
    }

    fn validated(self) -> Result<Self, RegistryError> {
        if self.configurations.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (i, config) in self.configurations.iter().enumerate() {
            if self.configurations[..i].iter().any(|c| c.id == config.id) {
                return Err(RegistryError::DuplicateId {
                    id: config.id.clone(),
                });
            }
        }
        if !self.configurations.iter().any(|c| c.id == self.default) {
            return Err(RegistryError::UnknownDefault {
                id: self.default.clone(),
            });
        }
        Ok(self)
    }

    /// The detector-inspired configurations, `central_dNdy` first.
    #[must_use]
    pub fn builtin() -> Self {
        let first_row = |column| ReductionKind::FirstRowValue { column };
        let window = |min, max, absolute| ReductionKind::SumInWindow {
            window_column: 0,
            value_column: -2,
            min,
            max,
            absolute,
        };
        let configurations = vec![
            builtin_config(
                "central_dNdy",
                "Default dN/dy",
                "particle_9999_vndata_eta_-0.5_0.5.dat",
                first_row(1),
                "Charged particle multiplicity in |eta| < 0.5",
            ),
            builtin_config(
                "central_ET",
                "Central ET",
                "particle_9999_dNdeta_pT_0.2_3.dat",
                window(0.0, 0.5, true),
                "Central transverse energy in |eta| <= 0.5 and 0.2 <= pT <= 3 GeV",
            ),
            builtin_config(
                "ATLAS_FCal",
                "ATLAS FCal-like",
                "particle_9999_dNdeta_pT_0.3_3.dat",
                window(3.2, 4.9, false),
                "Forward calorimeter ET in 3.2 < eta < 4.9 and 0.3 <= pT <= 3 GeV (ATLAS centrality determination)",
            ),
            builtin_config(
                "ALICE_V0A",
                "ALICE V0A-like",
                "particle_9999_vndata_eta_2.8_5.1.dat",
                first_row(1),
                "ALICE V0A-like detector coverage (2.8 < eta < 5.1)",
            ),
            builtin_config(
                "ALICE_V0C",
                "ALICE V0C-like",
                "particle_9999_vndata_eta_-3.7_-1.7.dat",
                first_row(1),
                "ALICE V0C-like detector coverage (-3.7 < eta < -1.7)",
            ),
            ExtractionConfig {
                id: "ALICE_V0_combined".to_owned(),
                name: "ALICE V0 Combined".to_owned(),
                datasets: DatasetSelector::List(vec![
                    "particle_9999_vndata_eta_2.8_5.1.dat".to_owned(),
                    "particle_9999_vndata_eta_-3.7_-1.7.dat".to_owned(),
                ]),
                reduction: ReductionKind::MultiSourceSum {
                    each: Box::new(first_row(1)),
                },
                description: "Combined ALICE V0A + V0C multiplicity".to_owned(),
            },
            builtin_config(
                "ALICE_FTOA",
                "ALICE FTOA-like",
                "particle_9999_vndata_eta_3.1_4.9.dat",
                first_row(1),
                "ALICE FTOA-like detector coverage (3.1 < eta < 4.9)",
            ),
            builtin_config(
                "ALICE_FTOC",
                "ALICE FTOC-like",
                "particle_9999_vndata_eta_-3.9_-3.1.dat",
                first_row(1),
                "ALICE FTOC-like detector coverage (-3.9 < eta < -3.1)",
            ),
            builtin_config(
                "wide_eta",
                "Wide Pseudorapidity",
                "particle_9999_vndata_eta_-2.5_2.5.dat",
                first_row(1),
                "Wide pseudorapidity acceptance |eta| < 2.5",
            ),
            ncoll_config(),
            npart_config(),
        ];
        Self {
            default: "central_dNdy".to_owned(),
            configurations,
        }
    }

    #[must_use]
    pub fn default_id(&self) -> &str {
        &self.default
    }

    #[must_use]
    pub fn configurations(&self) -> &[ExtractionConfig] {
        &self.configurations
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.configurations.iter().map(|c| c.id.as_str())
    }

    /// Looks up a configuration, or the default one when `id` is `None`.
    ///
    /// ```
    /// use centrality_analysis::registry::Registry;
    ///
    /// let registry = Registry::builtin();
    /// assert_eq!(registry.get(None).unwrap().id, "central_dNdy");
    /// assert_eq!(registry.get(Some("Npart")).unwrap().name, "Number of Participants");
    /// assert!(registry.get(Some("nope")).is_err());
    /// ```
    pub fn get(&self, id: Option<&str>) -> Result<&ExtractionConfig, RegistryError> {
        let id = id.unwrap_or(self.default.as_str());
        self.configurations
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| RegistryError::UnknownConfiguration {
                requested: id.to_owned(),
                available: self.ids().map(str::to_owned).collect(),
            })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Number of binary collisions: rows of the collision list.
#[must_use]
pub fn ncoll_config() -> ExtractionConfig {
    builtin_config(
        "Ncoll",
        "Number of Collisions",
        "NcollList*.dat",
        ReductionKind::RowCount,
        "Number of binary nucleon-nucleon collisions",
    )
}

/// Number of participants: nucleon rows whose collided flag (column 3) is set.
#[must_use]
pub fn npart_config() -> ExtractionConfig {
    builtin_config(
        "Npart",
        "Number of Participants",
        "NpartList*.dat",
        ReductionKind::CountNonzeroFlag { column: 3 },
        "Number of participating nucleons. Similar to ZDC-based centrality.",
    )
}

fn builtin_config(
    id: &str,
    name: &str,
    dataset: &str,
    reduction: ReductionKind,
    description: &str,
) -> ExtractionConfig {
    ExtractionConfig {
        id: id.to_owned(),
        name: name.to_owned(),
        datasets: DatasetSelector::Single(dataset.to_owned()),
        reduction,
        description: description.to_owned(),
    }
}

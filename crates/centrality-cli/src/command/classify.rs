//! Classification command
//!
//! Classifies every event of a results folder under all registered
//! observables, writes the mapping document next to the database and moves
//! the simulation artifacts into class folders according to one of them.

use std::path::PathBuf;

use centrality_analysis::{
    mapping_builder::{self, ConfigurationResult},
    registry::Registry,
};
use centrality_data::event::EventDatabase;
use centrality_stats::{
    binning::{CutPoints, PercentRange},
    descriptive::DescriptiveStats,
};
use clap::Args;

use crate::{
    relocate::{self, ArtifactDirs},
    util,
};

const MAPPING_FILE_NAME: &str = "centrality_mappings_all.json";

#[derive(Debug, Clone, Args)]
pub(crate) struct ClassifyArg {
    /// Results folder holding `<folder>.json` (or `.json.zst`) and the
    /// HYDRO_RESULTS / URQMD_RESULTS artifact folders
    pub results_root: PathBuf,

    /// Configuration used to organize artifacts on disk [default: the
    /// registry's default]
    pub config: Option<String>,

    /// Centrality cut points in percent (comma-separated)
    #[arg(long, value_delimiter = ',', default_values_t = CutPoints::DEFAULT.to_vec())]
    pub cuts: Vec<f64>,

    /// Load extraction configurations from a JSON file instead of the built-in set
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Only write the mapping; leave artifacts where they are
    #[arg(long)]
    pub skip_relocation: bool,
}

pub(crate) fn run(arg: &ClassifyArg) -> anyhow::Result<()> {
    let registry = match &arg.registry {
        Some(path) => Registry::load(path)?,
        None => Registry::builtin(),
    };
    let physical = registry.get(arg.config.as_deref())?;
    let cuts = CutPoints::new(arg.cuts.clone())?;

    println!("Physical organization using: {}", physical.name);
    println!("Description: {}", physical.description);
    println!("Using datasets: {}", physical.datasets);

    let dirs = ArtifactDirs::find(&arg.results_root);
    if let Some(dir) = &dirs.hydro {
        println!("This run has hydro surface: {}", dir.display());
    }
    if let Some(dir) = &dirs.urqmd {
        println!("This run has UrQMD outputs: {}", dir.display());
    }
    if dirs.is_empty() && !arg.skip_relocation {
        println!("No hydro or UrQMD outputs! Exiting.");
        return Ok(());
    }

    let database_path = util::database_path(&arg.results_root)?;
    tracing::info!(path = %database_path.display(), "loading events");
    let database: EventDatabase = util::read_container("event database", &database_path)?;
    tracing::info!(events = database.len(), "events loaded");

    let results = mapping_builder::classify_all(&registry, &database, &cuts);
    println!();
    println!("Centrality Classes");
    println!("==================");
    for result in &results {
        print_configuration_report(result, database.len());
    }

    let document = mapping_builder::assemble(&physical.id, &results);
    let mapping_path = arg.results_root.join(MAPPING_FILE_NAME);
    util::write_container("mapping", &mapping_path, &document)?;
    println!("\nMappings for all configurations saved to: {}", mapping_path.display());

    if arg.skip_relocation {
        return Ok(());
    }

    println!("\nOrganizing artifacts by {}", physical.name);
    let labels = cuts.ranges().map(|range| range.label()).collect::<Vec<_>>();
    let physical_mapping = document.physical().cloned().unwrap_or_default();
    let stats = relocate::relocate(&dirs, &labels, &physical_mapping)?;
    println!(
        "Moved {} artifacts ({} not found)",
        stats.moved, stats.missing
    );

    Ok(())
}

fn print_configuration_report(result: &ConfigurationResult<'_>, total_events: usize) {
    println!("\n{} ({})", result.config.name, result.config.id);
    let classification = match &result.outcome {
        Ok(classification) if !classification.is_empty() => classification,
        Ok(_) => {
            println!("  No valid events found, skipping...");
            return;
        }
        Err(err) => {
            println!("  Skipped: {err}");
            return;
        }
    };

    println!(
        "  Valid events: {} / {total_events}",
        classification.valid_count
    );
    println!(
        "  {:<12} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Class", "Events", "Min", "Median", "Mean", "Max", "Std Dev"
    );
    for class in &classification.classes {
        let stats = DescriptiveStats::new(class.members.iter().map(|member| member.value));
        println!("{}", class_row(&class.range, stats.as_ref()));
    }
}

fn class_row(range: &PercentRange, stats: Option<&DescriptiveStats>) -> String {
    let range = range.to_string();
    match stats {
        Some(stats) => format!(
            "  {range:<12} {:>7} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
            stats.count, stats.min, stats.median, stats.mean, stats.max, stats.std_dev
        ),
        None => format!("  {range:<12} {:>7}", 0),
    }
}

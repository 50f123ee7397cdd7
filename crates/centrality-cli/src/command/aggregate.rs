//! Class averaging command

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use centrality_analysis::aggregate::{self, ConfigurationAverages};
use centrality_data::{event::EventDatabase, keyed::KeyedMap, mapping::MappingDocument};
use clap::Args;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct AggregateArg {
    /// Event database (`.json` or `.json.zst`)
    pub input: PathBuf,

    /// Mapping document written by `classify`
    pub mapping: PathBuf,

    /// Output file for the class averages (`.json` or `.json.zst`)
    pub output: PathBuf,

    /// Configuration to average over [default: the document's first]
    pub config: Option<String>,

    /// Average over every configuration in the mapping document
    #[arg(long, conflicts_with = "config")]
    pub all: bool,

    /// Overwrite the output file without asking
    #[arg(long)]
    pub force: bool,
}

pub(crate) fn run(arg: &AggregateArg) -> anyhow::Result<()> {
    execute(arg, io::stdin().lock(), io::stdout())
}

fn execute<R, W>(arg: &AggregateArg, input: R, mut prompt: W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    if arg.output.exists() && !arg.force {
        if !util::confirm_overwrite(&arg.output, input, &mut prompt)? {
            writeln!(prompt, "Aborted.")?;
            return Ok(());
        }
        writeln!(prompt)?;
    }

    let document: MappingDocument = util::read_container("mapping", &arg.mapping)?;
    let database: EventDatabase = util::read_container("event database", &arg.input)?;
    tracing::info!(events = database.len(), "events loaded");

    let averages: KeyedMap<ConfigurationAverages> = if arg.all {
        println!(
            "Using centrality mappings: {}",
            document.configuration_ids().collect::<Vec<_>>().join(", ")
        );
        aggregate::aggregate_all(&document, &database)
    } else {
        let (id, mapping) = document.select(arg.config.as_deref())?;
        println!("Using centrality mapping: {id}");
        [(id, aggregate::aggregate(mapping, &database))]
            .into_iter()
            .collect()
    };

    for (id, classes) in &averages {
        println!("\n{id}");
        for (label, datasets) in classes {
            println!("  {label:<12} {:>4} datasets", datasets.len());
        }
    }

    util::write_container("averages", &arg.output, &averages)?;
    println!("\nClass averages saved to: {}", arg.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use centrality_data::{
        container,
        dataset::Dataset,
        mapping::{ClassAssignments, ConfigurationMapping, EventAssignment},
    };

    use super::*;

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let members = |ids: &[&str]| {
            ids.iter()
                .map(|id| {
                    let assignment = EventAssignment {
                        centrality_range: [0.0, 1.0],
                        centrality_value: 0.0,
                    };
                    (*id, assignment)
                })
                .collect::<ClassAssignments>()
        };
        let mut central = ConfigurationMapping::new();
        central.insert("C0-50", members(&["e1", "e2"]));
        central.insert("C50-100", members(&["e3"]));
        let mut everything = ConfigurationMapping::new();
        everything.insert("C0-100", members(&["e1", "e2", "e3"]));
        let document = MappingDocument {
            physical_organization: "central".to_owned(),
            configurations: KeyedMap::new(),
            mappings: [("central", central), ("wide", everything)]
                .into_iter()
                .collect(),
        };

        let input = dir.join("events.json");
        let mapping = dir.join("centrality_mappings_all.json");
        std::fs::write(
            &input,
            r#"{"e1": {"v": [1.0, 2.0]}, "e2": {"v": [3.0, 4.0]}, "e3": {"v": [5.0, 6.0]}}"#,
        )
        .unwrap();
        container::write_json(&mapping, &document).unwrap();
        (input, mapping)
    }

    fn arg(dir: &Path, output: &str, config: Option<&str>, all: bool) -> AggregateArg {
        let (input, mapping) = write_inputs(dir);
        AggregateArg {
            input,
            mapping,
            output: dir.join(output),
            config: config.map(str::to_owned),
            all,
            force: false,
        }
    }

    fn averages(path: &Path) -> KeyedMap<ConfigurationAverages> {
        container::read_json(path).unwrap()
    }

    #[test]
    fn test_default_uses_first_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let arg = arg(dir.path(), "out.json", None, false);
        execute(&arg, io::empty(), io::sink()).unwrap();

        let output = averages(&arg.output);
        assert_eq!(output.keys().collect::<Vec<_>>(), ["central"]);
        let central = output.get("central").unwrap();
        assert_eq!(central.keys().collect::<Vec<_>>(), ["C0-50", "C50-100"]);
        assert_eq!(
            central.get("C0-50").unwrap().get("v").unwrap().values(),
            [2.0, 3.0]
        );
    }

    #[test]
    fn test_all_configurations_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let arg = arg(dir.path(), "out.json.zst", None, true);
        execute(&arg, io::empty(), io::sink()).unwrap();

        let output = averages(&arg.output);
        assert_eq!(output.keys().collect::<Vec<_>>(), ["central", "wide"]);
        assert_eq!(
            output.get("wide").unwrap().get("C0-100").unwrap().get("v"),
            Some(&Dataset::from_shape_vec(vec![2], vec![3.0, 4.0]).unwrap())
        );
    }

    #[test]
    fn test_unknown_selector_lists_configurations() {
        let dir = tempfile::tempdir().unwrap();
        let arg = arg(dir.path(), "out.json", Some("ZDC"), false);
        let err = execute(&arg, io::empty(), io::sink()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown configuration 'ZDC' (available: central, wide)"
        );
        assert!(!arg.output.exists());
    }

    #[test]
    fn test_declined_overwrite_keeps_output() {
        let dir = tempfile::tempdir().unwrap();
        let arg = arg(dir.path(), "out.json", None, false);
        std::fs::write(&arg.output, "previous").unwrap();

        let mut prompt = vec![];
        execute(&arg, &b"n\n"[..], &mut prompt).unwrap();
        let prompt = String::from_utf8(prompt).unwrap();
        assert!(prompt.starts_with("Output file '"));
        assert!(prompt.ends_with("Overwrite? (y/n): Aborted.\n"));
        assert_eq!(std::fs::read_to_string(&arg.output).unwrap(), "previous");
    }

    #[test]
    fn test_accepted_or_forced_overwrite_replaces_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut arg = arg(dir.path(), "out.json", None, false);
        std::fs::write(&arg.output, "previous").unwrap();
        execute(&arg, &b"y\n"[..], io::sink()).unwrap();
        assert!(averages(&arg.output).contains_key("central"));

        std::fs::write(&arg.output, "previous").unwrap();
        arg.force = true;
        execute(&arg, io::empty(), io::sink()).unwrap();
        assert!(averages(&arg.output).contains_key("central"));
    }
}

//! Per-event summary command

use std::path::PathBuf;

use centrality_analysis::summary::Summarizer;
use centrality_data::event::EventDatabase;
use clap::Args;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    /// Event database (`.json` or `.json.zst`)
    pub input: PathBuf,

    /// Output database of per-event summaries
    pub output: PathBuf,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let database: EventDatabase = util::read_container("event database", &arg.input)?;
    tracing::info!(events = database.len(), "events loaded");

    let summaries = Summarizer::default().summarize(&database)?;
    util::write_container("summary", &arg.output, &summaries)?;
    println!(
        "Summaries of {} events saved to: {}",
        summaries.len(),
        arg.output.display()
    );
    Ok(())
}

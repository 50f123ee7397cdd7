//! Participant table command

use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use centrality_analysis::yields;
use centrality_data::event::EventDatabase;
use clap::Args;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct ParticipantsArg {
    /// Event database (`.json` or `.json.zst`)
    pub input: PathBuf,

    /// Output text table
    pub output: PathBuf,
}

pub(crate) fn run(arg: &ParticipantsArg) -> anyhow::Result<()> {
    let database: EventDatabase = util::read_container("event database", &arg.input)?;
    tracing::info!(events = database.len(), "events loaded");

    let rows = yields::participant_table(&database)?;

    let file = File::create(&arg.output)
        .with_context(|| format!("Failed to create table file: {}", arg.output.display()))?;
    let mut writer = BufWriter::new(file);
    yields::write_table(&mut writer, &rows)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write table file: {}", arg.output.display()))?;

    println!(
        "Table of {} events saved to: {}",
        rows.len(),
        arg.output.display()
    );
    Ok(())
}

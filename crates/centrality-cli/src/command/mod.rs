use clap::{Parser, Subcommand};

use self::{
    aggregate::AggregateArg, classify::ClassifyArg, participants::ParticipantsArg,
    summarize::SummarizeArg,
};

mod aggregate;
mod classify;
mod participants;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Classify events into centrality classes and organize simulation outputs
    Classify(#[clap(flatten)] ClassifyArg),
    /// Average per-event datasets over centrality classes
    Aggregate(#[clap(flatten)] AggregateArg),
    /// Collect per-event flow, mean pT, multiplicity, Ncoll and Npart
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Write a table of Ncoll, Npart and charged yields per event
    Participants(#[clap(flatten)] ParticipantsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Classify(arg) => classify::run(&arg)?,
        Mode::Aggregate(arg) => aggregate::run(&arg)?,
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Participants(arg) => participants::run(&arg)?,
    }
    Ok(())
}

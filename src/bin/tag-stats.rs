use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use osmtagstats::{report, OsmParser, TagCounter};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Args {
    src: PathBuf,
}
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::from_args();

    let mut counter = TagCounter::new();

    OsmParser::new(1)
        .parse(&args.src, &mut counter)
        .context("parse src")?;
    counter.log_summary();

    let stdout = io::stdout();
    report::write(&counter, stdout.lock())?;
    Ok(())
}

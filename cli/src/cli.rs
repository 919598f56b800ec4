use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "picomake")]
#[command(about = "Generates GNU makefiles from a session description")]
#[command(version)]
pub struct Args {
    /// Session description file (TOML)
    pub session: PathBuf,

    /// Fail a solution whose projects name undeclared configurations
    /// instead of skipping those blocks
    #[arg(long)]
    pub fatal_missing_config: bool,

    /// Stop the whole session at the first failing solution
    #[arg(long)]
    pub abort_on_error: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

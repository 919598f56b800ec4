use std::fs;
use std::process::ExitCode;

use anyhow::Context as _;
use picomake::{Generator, MakeBackend, MissingConfig};

mod cli;
mod desc;
mod runtime;

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::parse();

    let text = fs::read_to_string(&args.session)
        .with_context(|| format!("reading {}", args.session.display()))?;
    let desc: desc::SessionDesc = toml::from_str(&text)
        .with_context(|| format!("parsing {}", args.session.display()))?;
    let session = desc.into_session();

    let mut generator = Generator::new(runtime::Host, MakeBackend);
    generator.abort_on_error(args.abort_on_error);
    if args.fatal_missing_config {
        generator.missing_config(MissingConfig::Fail);
    }

    let report = generator.generate(&session);
    for failure in &report.failures {
        eprintln!("{}: {}", failure.solution, failure.error);
    }

    Ok(if report.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

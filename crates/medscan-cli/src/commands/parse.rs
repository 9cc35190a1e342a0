//! Parse command - extract medication fields from label text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use medscan_core::medication::{with_confidence, MedicationParser, RuleBasedParser};

use super::{format_medications, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file (default: stdin)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ParseArgs) -> anyhow::Result<()> {
    let text = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let medications: Vec<_> = RuleBasedParser::new()
        .parse_multiple(&text)
        .into_iter()
        .map(with_confidence)
        .collect();

    println!("{}", format_medications(&medications, args.format)?);

    Ok(())
}

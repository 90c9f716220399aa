//! Regenerates `docs/pronom-tools.md` from the `pronom-tools` clap definitions

use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

const FILE_NAME: &str = "pronom-tools.md";

#[derive(Parser)]
#[command(name = "xtask", about = "Write the pronom-tools command reference")]
struct Cli {
    /// Directory the reference is written to
    #[arg(short, long, default_value = "docs")]
    output_dir: PathBuf,

    /// Fail if the file on disk is out of date instead of rewriting it
    #[arg(long)]
    check: bool,
}

fn render() -> String {
    format!(
        "# pronom-tools Reference\n\n\
         Generated by `cargo run --manifest-path xtask/Cargo.toml`; do not edit.\n\n{}",
        clap_markdown::help_markdown::<pronom_ingest::Cli>()
    )
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = cli.output_dir.join(FILE_NAME);
    let content = render();

    if cli.check {
        let current = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        if current != content {
            bail!("{} is out of date", path.display());
        }
        return Ok(());
    }

    fs::create_dir_all(&cli.output_dir)?;
    fs::write(&path, content)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_lists_every_command() {
        let content = render();
        for command in ["new-release", "check-existing", "summary", "store", "export", "cron"] {
            assert!(content.contains(command), "{}", command);
        }
    }
}

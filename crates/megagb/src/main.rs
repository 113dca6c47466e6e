use clap::Parser;
use megagb::Args;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let summary = megagb::run(&args)?;
    log::info!(
        "\"{}\" finished after {} machine cycles",
        summary.title,
        summary.cycles
    );
    Ok(())
}

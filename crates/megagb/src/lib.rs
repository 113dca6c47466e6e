use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use megagb_core::config::DEFAULT_RAM_SEED;
use megagb_core::debug::format_registers;
use megagb_core::{Cartridge, CoreConfig, EmulationContext, Registers, MACHINE_CYCLES_PER_FRAME};

/// One emulated second of DMG time.
pub const DEFAULT_CYCLE_BUDGET: u64 = MACHINE_CYCLES_PER_FRAME * 60;

/// Run a Game Boy cartridge headlessly for a fixed number of machine cycles.
#[derive(Parser, Debug, Clone)]
#[command(name = "megagb", version, about)]
pub struct Args {
    /// Cartridge image to load.
    pub rom: PathBuf,

    /// Machine cycles to execute before stopping.
    #[arg(long, default_value_t = DEFAULT_CYCLE_BUDGET)]
    pub cycles: u64,

    /// Log every executed instruction (needs RUST_LOG=trace).
    #[arg(long)]
    pub trace: bool,

    /// Accept cartridges whose header checksum does not match.
    #[arg(long)]
    pub no_verify: bool,

    /// Battery RAM file, restored before running and written back after.
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Seed for the power-on contents of uninitialised RAM.
    #[arg(long, value_name = "N")]
    pub ram_seed: Option<u64>,
}

/// What a finished run looked like.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub title: String,
    pub cycles: u64,
    pub registers: Registers,
    /// Whether battery RAM was written to the save file.
    pub saved: bool,
}

pub fn run(args: &Args) -> Result<RunSummary> {
    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM '{}'", args.rom.display()))?;
    let cartridge = Cartridge::from_bytes(rom)
        .with_context(|| format!("'{}' is not a usable cartridge", args.rom.display()))?;
    let title = cartridge.header().title.clone();

    let config = CoreConfig::builder()
        .verify_header(!args.no_verify)
        .ram_seed(args.ram_seed.unwrap_or(DEFAULT_RAM_SEED))
        .trace_instructions(args.trace)
        .build();
    let mut ctx = EmulationContext::new(cartridge, config).context("failed to start emulation")?;

    if let Some(path) = &args.save {
        restore_save(&mut ctx, path)?;
    }

    log::info!("running \"{title}\" for {} machine cycles", args.cycles);
    let outcome = ctx.run_for(args.cycles);
    log::info!("{}", format_registers(ctx.registers()));

    // Persist whatever the game wrote even if the CPU stopped on a fault.
    let saved = match &args.save {
        Some(path) => write_save(&ctx, path)?,
        None => false,
    };

    outcome.with_context(|| {
        format!(
            "emulation stopped after {} machine cycles at PC=0x{:04X}",
            ctx.cycles(),
            ctx.registers().pc
        )
    })?;

    Ok(RunSummary {
        title,
        cycles: ctx.cycles(),
        registers: *ctx.registers(),
        saved,
    })
}

fn restore_save(ctx: &mut EmulationContext, path: &Path) -> Result<()> {
    if !path.exists() {
        log::info!("no save at '{}', starting fresh", path.display());
        return Ok(());
    }
    if ctx.battery_ram().is_none() {
        log::warn!(
            "cartridge has no battery RAM; ignoring save '{}'",
            path.display()
        );
        return Ok(());
    }
    let data =
        std::fs::read(path).with_context(|| format!("failed to read save '{}'", path.display()))?;
    ctx.load_battery_ram(&data)
        .with_context(|| format!("save '{}' does not fit this cartridge", path.display()))?;
    log::info!("restored battery RAM from '{}'", path.display());
    Ok(())
}

fn write_save(ctx: &EmulationContext, path: &Path) -> Result<bool> {
    let Some(ram) = ctx.battery_ram() else {
        return Ok(false);
    };
    std::fs::write(path, &ram)
        .with_context(|| format!("failed to write save '{}'", path.display()))?;
    log::info!("wrote {} bytes of battery RAM to '{}'", ram.len(), path.display());
    Ok(true)
}

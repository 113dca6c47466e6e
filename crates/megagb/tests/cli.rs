use std::path::{Path, PathBuf};

use clap::Parser;
use megagb::{run, Args, DEFAULT_CYCLE_BUDGET};
use megagb_core::machine::header_checksum;
use tempfile::TempDir;

/// 32KB image whose entry point jumps to `program` at 0x0150.
fn build_rom(cartridge_type: u8, ram_code: u8, program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100..0x0104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
    rom[0x0134..0x013A].copy_from_slice(b"CLITST");
    rom[0x0147] = cartridge_type;
    rom[0x0149] = ram_code;
    rom[0x0150..0x0150 + program.len()].copy_from_slice(program);
    rom[0x014D] = header_checksum(&rom);
    rom
}

fn write_rom(dir: &TempDir, rom: &[u8]) -> PathBuf {
    let path = dir.path().join("test.gb");
    std::fs::write(&path, rom).unwrap();
    path
}

fn args(rom: &Path, cycles: u64) -> Args {
    Args {
        rom: rom.to_path_buf(),
        cycles,
        trace: false,
        no_verify: false,
        save: None,
        ram_seed: None,
    }
}

#[test]
fn parses_command_line() {
    let args = Args::try_parse_from([
        "megagb",
        "game.gb",
        "--cycles",
        "10",
        "--trace",
        "--no-verify",
        "--save",
        "game.sav",
        "--ram-seed",
        "7",
    ])
    .unwrap();
    assert_eq!(args.rom, PathBuf::from("game.gb"));
    assert_eq!(args.cycles, 10);
    assert!(args.trace);
    assert!(args.no_verify);
    assert_eq!(args.save, Some(PathBuf::from("game.sav")));
    assert_eq!(args.ram_seed, Some(7));

    let defaults = Args::try_parse_from(["megagb", "game.gb"]).unwrap();
    assert_eq!(defaults.cycles, DEFAULT_CYCLE_BUDGET);
    assert!(!defaults.trace);
    assert_eq!(defaults.save, None);
}

#[test]
fn runs_until_budget() {
    let dir = TempDir::new().unwrap();
    // JR -2
    let rom = write_rom(&dir, &build_rom(0x00, 0x00, &[0x18, 0xFE]));
    let summary = run(&args(&rom, 1_000)).unwrap();
    assert_eq!(summary.title, "CLITST");
    assert!(summary.cycles >= 1_000);
    assert_eq!(summary.registers.pc, 0x0150);
    assert!(!summary.saved);
}

#[test]
fn battery_ram_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    // Enable RAM, increment (0xA000), then spin.
    let program = [
        0x3E, 0x0A, // LD A,0x0A
        0xEA, 0x00, 0x00, // LD (0x0000),A
        0xFA, 0x00, 0xA0, // LD A,(0xA000)
        0x3C, // INC A
        0xEA, 0x00, 0xA0, // LD (0xA000),A
        0x18, 0xFE, // JR -2
    ];
    let rom = write_rom(&dir, &build_rom(0x03, 0x02, &program));
    let save = dir.path().join("test.sav");
    let mut run_args = args(&rom, 100);
    run_args.save = Some(save.clone());

    let summary = run(&run_args).unwrap();
    assert!(summary.saved);
    let data = std::fs::read(&save).unwrap();
    assert_eq!(data.len(), 0x2000);
    // Fresh MBC1 RAM reads 0xFF, so the first run wraps it to zero.
    assert_eq!(data[0], 0x00);

    run(&run_args).unwrap();
    assert_eq!(std::fs::read(&save).unwrap()[0], 0x01);
}

#[test]
fn mismatched_save_is_rejected() {
    let dir = TempDir::new().unwrap();
    let rom = write_rom(&dir, &build_rom(0x03, 0x02, &[0x18, 0xFE]));
    let save = dir.path().join("short.sav");
    std::fs::write(&save, [0u8; 16]).unwrap();
    let mut run_args = args(&rom, 10);
    run_args.save = Some(save);

    let err = run(&run_args).unwrap_err();
    assert!(format!("{err:#}").contains("expected 8192"), "{err:#}");
}

#[test]
fn illegal_opcode_is_an_error() {
    let dir = TempDir::new().unwrap();
    let rom = write_rom(&dir, &build_rom(0x00, 0x00, &[0x00, 0xD3]));
    let err = run(&args(&rom, 1_000)).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("illegal opcode 0xD3 at PC=0x0151"), "{message}");
}

#[test]
fn missing_rom_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = run(&args(&dir.path().join("absent.gb"), 10)).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read ROM"));
}

#[test]
fn checksum_check_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let mut image = build_rom(0x00, 0x00, &[0x18, 0xFE]);
    image[0x014D] ^= 0x55;
    let rom = write_rom(&dir, &image);

    let err = run(&args(&rom, 10)).unwrap_err();
    assert!(format!("{err:#}").contains("header checksum mismatch"));

    let mut lenient = args(&rom, 10);
    lenient.no_verify = true;
    assert!(run(&lenient).is_ok());
}

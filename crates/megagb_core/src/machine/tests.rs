use once_cell::sync::Lazy;

use super::*;
use crate::cpu::{Bus, CpuState};
use crate::{CoreConfig, CoreError};

const PROGRAM_START: usize = 0x0150;
const BANK_MARK_OFFSET: usize = 0x3FF0;

fn bank_mark(bank: usize) -> u8 {
    (bank as u8).wrapping_add(0x10)
}

/// Build a cartridge image: entry point jumps to `program` at 0x0150, and
/// every bank carries a marker byte at offset 0x3FF0.
fn build_rom(cartridge_type: u8, rom_code: u8, ram_code: u8, program: &[u8]) -> Vec<u8> {
    let size = 0x8000 << rom_code;
    let mut rom = vec![0u8; size];
    for bank in 0..size / ROM_BANK_SIZE {
        rom[bank * ROM_BANK_SIZE + BANK_MARK_OFFSET] = bank_mark(bank);
    }
    rom[0x0100..0x0104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
    rom[0x0134..0x0138].copy_from_slice(b"TEST");
    rom[0x0147] = cartridge_type;
    rom[0x0148] = rom_code;
    rom[0x0149] = ram_code;
    rom[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
    rom[0x014D] = header_checksum(&rom);
    rom
}

static MBC2_256K: Lazy<Vec<u8>> = Lazy::new(|| build_rom(0x06, 0x03, 0x00, &[]));

fn context(rom: Vec<u8>) -> EmulationContext {
    let cartridge = Cartridge::from_bytes(rom).unwrap();
    EmulationContext::new(cartridge, CoreConfig::default()).unwrap()
}

fn rom_bank(ctx: &EmulationContext) -> usize {
    ctx.bus().controller().map(|c| c.rom_bank()).unwrap_or(0)
}

#[test]
fn header_parsing_reports_metadata() {
    let cartridge = Cartridge::from_bytes(MBC2_256K.clone()).unwrap();
    let header = cartridge.header();
    assert_eq!(header.title, "TEST");
    assert_eq!(header.controller, ControllerKind::Mbc2);
    assert!(header.battery);
    assert_eq!(header.rom_size, RomSize::Kb256);
    assert_eq!(header.ram_size, RamSize::None);
    assert!(cartridge.verify_checksum().is_ok());
}

#[test]
fn header_parsing_rejects_unsupported_codes() {
    let mut rom = build_rom(0x00, 0x00, 0x00, &[]);
    rom[0x0147] = 0x04;
    assert_eq!(
        Cartridge::from_bytes(rom.clone()).err(),
        Some(CoreError::UnsupportedCartridgeType(0x04))
    );

    rom[0x0147] = 0x00;
    rom[0x0148] = 0x09;
    assert_eq!(
        Cartridge::from_bytes(rom.clone()).err(),
        Some(CoreError::UnsupportedRomSize(0x09))
    );

    rom[0x0148] = 0x00;
    rom[0x0149] = 0x06;
    assert_eq!(
        Cartridge::from_bytes(rom).err(),
        Some(CoreError::UnsupportedRamSize(0x06))
    );

    assert_eq!(
        Cartridge::from_bytes(vec![0; 0x100]).err(),
        Some(CoreError::RomTooSmall(0x100))
    );
}

#[test]
fn controller_kinds_and_batteries_by_type_byte() {
    let cases = [
        (0x00, ControllerKind::RomOnly, false),
        (0x01, ControllerKind::Mbc1, false),
        (0x03, ControllerKind::Mbc1, true),
        (0x05, ControllerKind::Mbc2, false),
        (0x0F, ControllerKind::Mbc3, true),
        (0x11, ControllerKind::Mbc3, false),
        (0x19, ControllerKind::Mbc5, false),
        (0x1B, ControllerKind::Mbc5, true),
    ];
    for (code, kind, battery) in cases {
        assert_eq!(ControllerKind::from_type_byte(code), Ok((kind, battery)), "0x{code:02X}");
    }
}

#[test]
fn checksum_mismatch_is_fatal_only_when_verifying() {
    let mut rom = MBC2_256K.clone();
    rom[0x014D] ^= 0xFF;
    let cartridge = Cartridge::from_bytes(rom).unwrap();
    let computed = header_checksum(cartridge.rom());

    let strict = EmulationContext::new(cartridge.clone(), CoreConfig::default());
    assert_eq!(
        strict.err(),
        Some(CoreError::HeaderChecksum {
            expected: computed ^ 0xFF,
            computed,
        })
    );

    let config = CoreConfig::builder().verify_header(false).build();
    assert!(EmulationContext::new(cartridge, config).is_ok());
}

#[test]
fn mbc2_bank_zero_maps_bank_one() {
    let mut ctx = context(MBC2_256K.clone());
    ctx.bus_mut().write8(0x2100, 0x00);
    assert_eq!(rom_bank(&ctx), 1);
    assert_eq!(ctx.bus_mut().read8(0x7FF0), bank_mark(1));

    ctx.bus_mut().write8(0x2100, 0x0D);
    assert_eq!(ctx.bus_mut().read8(0x7FF0), bank_mark(13));
    // The fixed window always shows bank 0.
    assert_eq!(ctx.bus_mut().read8(0x3FF0), bank_mark(0));
}

#[test]
fn mbc2_64kb_masks_bank_number() {
    let mut ctx = context(build_rom(0x05, 0x01, 0x00, &[]));
    ctx.bus_mut().write8(0x0100, 0x07);
    assert_eq!(rom_bank(&ctx), 3);
    assert_eq!(ctx.bus_mut().read8(0x7FF0), bank_mark(3));
}

#[test]
fn mbc2_ram_echoes_through_bus() {
    let mut ctx = context(MBC2_256K.clone());
    let bus = ctx.bus_mut();
    bus.write8(0x0000, 0x0A);
    bus.write8(0xA000, 0x0B);
    assert_eq!(bus.read8(0xA200), 0x0B);
    assert_eq!(bus.read8(0xBE00), 0x0B);
}

#[test]
fn mbc2_disabled_ram_still_reads_back() {
    let mut ctx = context(MBC2_256K.clone());
    let bus = ctx.bus_mut();
    bus.write8(0x0000, 0x0A);
    bus.write8(0xA010, 0x0F);
    bus.write8(0x0000, 0x00);
    assert_eq!(bus.read8(0xA010), 0x0F);
    match bus.controller() {
        Some(Controller::Mbc2(mbc)) => assert!(!mbc.ram_enabled()),
        other => panic!("expected an MBC2 controller, got {other:?}"),
    }
}

#[test]
fn mbc2_ram_survives_disable_enable() {
    let mut ctx = context(MBC2_256K.clone());
    let bus = ctx.bus_mut();
    bus.write8(0x0000, 0x0A);
    bus.write8(0xA1F0, 0x06);
    bus.write8(0x0000, 0x00);
    bus.write8(0x0000, 0x0A);
    assert_eq!(bus.read8(0xA1F0), 0x06);
}

#[test]
fn program_switches_banks_through_cpu() {
    // LD A,0x07; LD (0x2100),A; LD A,(0x7FF0)
    let program = [0x3E, 0x07, 0xEA, 0x00, 0x21, 0xFA, 0xF0, 0x7F];
    let mut ctx = context(build_rom(0x05, 0x01, 0x00, &program));
    // Entry NOP and JP.
    ctx.step().unwrap();
    ctx.step().unwrap();
    for _ in 0..3 {
        ctx.step().unwrap();
    }
    assert_eq!(ctx.registers().a, bank_mark(3));
    assert_eq!(ctx.cycles(), 1 + 4 + 2 + 4 + 4);
}

#[test]
fn mbc2_upper_window_write_terminates_cpu() {
    // LD A,0x02; LD (0x4000),A
    let program = [0x3E, 0x02, 0xEA, 0x00, 0x40];
    let mut ctx = context(build_rom(0x06, 0x03, 0x00, &program));
    let result = ctx.run_for(1_000);
    assert_eq!(
        result,
        Err(CoreError::UndefinedControlRegister {
            controller: ControllerKind::Mbc2,
            addr: 0x4000,
            value: 0x02,
        })
    );
    assert_eq!(ctx.cpu().state(), CpuState::Terminated);
    assert_eq!(ctx.step(), Err(CoreError::Terminated));
}

#[test]
fn allocate_release_allocate_starts_fresh() {
    let mut ctx = context(MBC2_256K.clone());
    ctx.bus_mut().write8(0x2100, 0x05);
    ctx.bus_mut().write8(0x0000, 0x0A);
    ctx.release();
    ctx.release();

    assert!(ctx.bus().controller().is_none());
    assert_eq!(ctx.bus_mut().read8(0x4000), 0xFF);
    assert_eq!(ctx.bus_mut().read8(0xA000), 0xFF);
    ctx.bus_mut().write8(0x2100, 0x01);
    assert_eq!(
        ctx.bus_mut().take_fault(),
        Some(CoreError::ControllerReleased { addr: 0x2100 })
    );
    drop(ctx);

    let ctx = context(MBC2_256K.clone());
    assert_eq!(rom_bank(&ctx), 1);
    match ctx.bus().controller() {
        Some(Controller::Mbc2(mbc)) => assert!(!mbc.ram_enabled()),
        other => panic!("expected an MBC2 controller, got {other:?}"),
    }
}

#[test]
fn rom_past_end_of_image_reads_open_bus() {
    let mut rom = build_rom(0x01, 0x02, 0x00, &[]);
    rom.truncate(0x8000);
    let mut ctx = context(rom);
    ctx.bus_mut().write8(0x2000, 0x05);
    assert_eq!(ctx.bus_mut().read8(0x4000), 0xFF);
    ctx.bus_mut().write8(0x2000, 0x01);
    assert_eq!(ctx.bus_mut().read8(0x7FF0), bank_mark(1));
}

#[test]
fn flat_regions_are_not_translated() {
    let mut ctx = context(MBC2_256K.clone());
    let bus = ctx.bus_mut();
    bus.write8(0xC123, 0x42);
    assert_eq!(bus.read8(0xC123), 0x42);
    // Echo RAM is separate storage.
    bus.write8(0xE123, 0x99);
    assert_eq!(bus.read8(0xC123), 0x42);
    assert_eq!(bus.read8(0xE123), 0x99);

    bus.write8(0x8000, 0x11);
    bus.write8(0xFF80, 0x22);
    assert_eq!(bus.peek(0x8000), 0x11);
    assert_eq!(bus.peek(0xFF80), 0x22);

    bus.write8(0xFF0F, 0xFF);
    assert_eq!(bus.read8(0xFF0F), 0xFF);
    assert_eq!(bus.interrupt_flags(), Interrupts::all());
    bus.write8(0xFF0F, 0x00);
    assert_eq!(bus.read8(0xFF0F), 0xE0);
}

#[test]
fn peek_leaves_state_untouched() {
    let mut ctx = context(MBC2_256K.clone());
    let before = ctx.bus().peek(0xA010);
    assert_eq!(ctx.bus().peek(0xA010), before);
    assert_eq!(ctx.bus().peek(0x0100), 0x00);
    assert_eq!(ctx.bus().peek(0x0101), 0xC3);
    assert_eq!(ctx.bus_mut().take_fault(), None);
    assert_eq!(rom_bank(&ctx), 1);
}

#[test]
fn interrupt_enable_register_is_typed() {
    let mut ctx = context(MBC2_256K.clone());
    assert_eq!(ctx.bus().interrupt_enable(), Interrupts::empty());
    ctx.bus_mut().write8(0xFFFF, 0x05);
    assert_eq!(
        ctx.bus().interrupt_enable(),
        Interrupts::VBLANK | Interrupts::TIMER
    );
    assert_eq!(ctx.bus().peek(0xFFFF), 0x05);
}

#[test]
fn context_keeps_its_config() {
    let cartridge = Cartridge::from_bytes(MBC2_256K.clone()).unwrap();
    let config = CoreConfig::builder()
        .ram_seed(42)
        .trace_instructions(true)
        .build();
    let mut ctx = EmulationContext::new(cartridge, config.clone()).unwrap();
    assert_eq!(ctx.config(), &config);
    // Tracing only adds log output.
    ctx.step().unwrap();
    assert_eq!(ctx.registers().pc, 0x0101);
}

#[test]
fn power_on_ram_is_seeded() {
    let seeded = |seed| {
        let cartridge = Cartridge::from_bytes(MBC2_256K.clone()).unwrap();
        let config = CoreConfig::builder().ram_seed(seed).build();
        let ctx = EmulationContext::new(cartridge, config).unwrap();
        let wram: Vec<u8> = (0xC000..0xC100).map(|a| ctx.bus().peek(a)).collect();
        let mbc2: Vec<u8> = (0xA000..0xA200).map(|a| ctx.bus().peek(a)).collect();
        (wram, mbc2)
    };
    assert_eq!(seeded(1), seeded(1));
    assert_ne!(seeded(1).0, seeded(2).0);
    assert_ne!(seeded(1).1, seeded(2).1);
}

#[test]
fn run_for_accumulates_cycles() {
    // JR -2 forever.
    let mut ctx = context(build_rom(0x00, 0x00, 0x00, &[0x18, 0xFE]));
    let ran = ctx.run_for(100).unwrap();
    assert!(ran >= 100);
    assert_eq!(ctx.cycles(), ran);
    assert_eq!(ctx.registers().pc, 0x0150);
}

#[test]
fn requested_interrupt_wakes_halt() {
    // LD A,0x04; LDH (0xFF),A; EI; HALT; NOP
    let program = [0x3E, 0x04, 0xE0, 0xFF, 0xFB, 0x76, 0x00];
    let mut ctx = context(build_rom(0x00, 0x00, 0x00, &program));
    for _ in 0..6 {
        ctx.step().unwrap();
    }
    assert_eq!(ctx.cpu().state(), CpuState::Halted);
    assert_eq!(ctx.step(), Ok(1));

    ctx.request_interrupt(Interrupts::TIMER);
    assert_eq!(ctx.step(), Ok(5));
    assert_eq!(ctx.registers().pc, 0x0050);
    assert!(!ctx.bus().interrupt_flags().contains(Interrupts::TIMER));
}

#[test]
fn mbc1_banking_through_bus() {
    let mut ctx = context(build_rom(0x01, 0x04, 0x00, &[]));
    let bus = ctx.bus_mut();
    bus.write8(0x2000, 0x00);
    assert_eq!(bus.read8(0x7FF0), bank_mark(1));
    bus.write8(0x2000, 0x1F);
    assert_eq!(bus.read8(0x7FF0), bank_mark(31));
    // 32 banks: the secondary register wraps back around.
    bus.write8(0x4000, 0x01);
    assert_eq!(bus.read8(0x7FF0), bank_mark(31));
}

#[test]
fn mbc5_can_map_bank_zero() {
    let mut ctx = context(build_rom(0x19, 0x02, 0x00, &[]));
    let bus = ctx.bus_mut();
    bus.write8(0x2000, 0x00);
    assert_eq!(bus.read8(0x7FF0), bank_mark(0));
    bus.write8(0x2000, 0x06);
    assert_eq!(bus.read8(0x7FF0), bank_mark(6));
}

#[test]
fn battery_ram_round_trip() {
    let rom = build_rom(0x03, 0x01, 0x02, &[]);
    let mut ctx = context(rom.clone());
    ctx.bus_mut().write8(0x0000, 0x0A);
    ctx.bus_mut().write8(0xA000, 0x12);
    ctx.bus_mut().write8(0xBFFF, 0x34);
    let save = ctx.battery_ram().unwrap();
    assert_eq!(save.len(), 0x2000);

    let mut restored = context(rom);
    restored.load_battery_ram(&save).unwrap();
    restored.bus_mut().write8(0x0000, 0x0A);
    assert_eq!(restored.bus_mut().read8(0xA000), 0x12);
    assert_eq!(restored.bus_mut().read8(0xBFFF), 0x34);

    assert_eq!(
        restored.load_battery_ram(&[0; 16]),
        Err(CoreError::BatteryRamSize {
            expected: 0x2000,
            actual: 16,
        })
    );
}

#[test]
fn battery_ram_requires_battery() {
    let mut ctx = context(build_rom(0x01, 0x01, 0x02, &[]));
    assert_eq!(ctx.battery_ram(), None);
    assert_eq!(
        ctx.load_battery_ram(&[0; 0x2000]),
        Err(CoreError::NoBatteryRam {
            controller: ControllerKind::Mbc1,
        })
    );

    // MBC2 keeps its built-in RAM on battery.
    let ctx = context(MBC2_256K.clone());
    assert_eq!(ctx.battery_ram().map(|ram| ram.len()), Some(512));
}

#[test]
fn context_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<EmulationContext>();
}

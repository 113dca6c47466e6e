use bitflags::bitflags;

/// Joypad register; the low nibble holds the input lines (0 = pressed).
pub const P1_ADDR: u16 = 0xFF00;
/// Interrupt request register.
pub const IF_ADDR: u16 = 0xFF0F;
/// Interrupt enable register.
pub const IE_ADDR: u16 = 0xFFFF;

bitflags! {
    /// Interrupt lines as laid out in IF and IE. Lower bits have higher
    /// priority.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Interrupts: u8 {
        const VBLANK = 1 << 0;
        const STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

impl Interrupts {
    /// The single highest-priority line in `self`, if any.
    pub fn highest_priority(self) -> Option<Self> {
        if self.is_empty() {
            return None;
        }
        Some(Self::from_bits_retain(1 << self.bits().trailing_zeros()))
    }

    /// Dispatch vector of the highest-priority line: `0x40 + 8 * index`.
    pub fn vector(self) -> u16 {
        0x0040 + 8 * (self.bits().trailing_zeros() as u16 & 0x07)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_and_vectors_follow_bit_order() {
        let pending = Interrupts::TIMER | Interrupts::JOYPAD | Interrupts::STAT;
        assert_eq!(pending.highest_priority(), Some(Interrupts::STAT));
        assert_eq!(Interrupts::VBLANK.vector(), 0x40);
        assert_eq!(Interrupts::STAT.vector(), 0x48);
        assert_eq!(Interrupts::TIMER.vector(), 0x50);
        assert_eq!(Interrupts::SERIAL.vector(), 0x58);
        assert_eq!(Interrupts::JOYPAD.vector(), 0x60);
        assert_eq!(Interrupts::empty().highest_priority(), None);
    }
}

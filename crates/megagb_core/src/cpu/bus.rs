use crate::CoreError;

/// Abstraction over the 16-bit address space as seen by the CPU.
///
/// The CPU never computes a physical offset itself: every load and store goes
/// through this trait, and the implementation decides whether an address is
/// flat memory, a banked ROM window or a controller register.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Hand over a fatal condition raised while servicing an access.
    ///
    /// Stores cannot fail from the CPU's point of view, so a bus that detects
    /// a protocol violation (for example a write to an undefined cartridge
    /// register) latches it here. The CPU drains it once per step and
    /// terminates if one is present. The default implementation never
    /// faults.
    fn take_fault(&mut self) -> Option<CoreError> {
        None
    }
}

use typed_builder::TypedBuilder;

/// Seed used for "uninitialised" RAM when the caller does not pick one.
pub const DEFAULT_RAM_SEED: u64 = 0xC0DE_1234;

/// Session-wide options for an [`EmulationContext`](crate::EmulationContext).
///
/// ```
/// use megagb_core::CoreConfig;
///
/// let config = CoreConfig::builder().trace_instructions(true).build();
/// assert!(config.verify_header);
/// ```
#[derive(TypedBuilder, Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    /// Reject cartridges whose header checksum does not match. When false a
    /// mismatch is only logged.
    #[builder(default = true)]
    pub verify_header: bool,
    /// Seed for the pseudo-random power-on contents of RAM that hardware
    /// leaves uninitialised (MBC2 built-in RAM, WRAM, HRAM).
    #[builder(default = DEFAULT_RAM_SEED)]
    pub ram_seed: u64,
    /// Log every executed instruction at trace level.
    #[builder(default = false)]
    pub trace_instructions: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

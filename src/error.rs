/// Errors surfaced by the engine's building blocks and its configuration.
///
/// Running a program never fails: unknown characters are skipped, missing
/// input suspends, and cursor movement clamps. These variants cover the few
/// places where a caller hands the VM something it cannot use.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A value destined for a cell was not a well-formed integer.
    #[error("Not a number: '{value}'")]
    InvalidWrite { value: String },

    /// Cell width outside the supported `1..=63` bits.
    #[error("Unsupported cell width: {bits} bits (expected 1..=63)")]
    InvalidBitWidth { bits: u32 },

    /// A configuration key carried a value that could not be used.
    #[error("Invalid setting {key} = '{value}'")]
    InvalidSetting { key: String, value: String },
}

use thiserror::Error;

/// Failures surfaced to the caller. Invariant violations inside a tick are
/// bugs, not errors; those fail fast with a panic instead of appearing here.
#[derive(Debug, Error)]
pub enum Error {
    /// The seed could not produce enough habitable starting tiles.
    #[error("world uninhabitable: placed {placed} of {required} starting tribes")]
    WorldUninhabitable { placed: u32, required: u32 },

    /// A loaded save failed schema or invariant validation. The simulation
    /// it was loaded into is left untouched.
    #[error("corrupt save: {0}")]
    SaveCorrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

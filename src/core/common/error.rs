use std::fmt;

/// Error type shared across the crate.
///
/// Absence of a record is never an error: lookups and removals signal
/// "not found" through `Option`/empty results instead.
#[derive(Debug)]
pub enum CrashDbError {
    Io(std::io::Error),
    Parsing(String),
    Configuration(String),
    /// Open-addressing insert probed every slot without finding a free one.
    /// The growth trigger keeps this from occurring in practice, but a full
    /// wrap must terminate rather than loop.
    TableFull { buckets: usize },
}

impl fmt::Display for CrashDbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {}", e),
            Self::Parsing(s) => write!(f, "Parsing Error: {}", s),
            Self::Configuration(s) => write!(f, "Configuration error: {}", s),
            Self::TableFull { buckets } => {
                write!(f, "Hash table full: all {} buckets occupied", buckets)
            }
        }
    }
}

impl std::error::Error for CrashDbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

// Manual From implementations
impl From<std::io::Error> for CrashDbError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

pub mod error;
pub use error::CrashDbError;

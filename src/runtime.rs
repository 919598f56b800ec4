pub use anyhow::Result;

use crate::path::Path;

/// Host abstraction for the generator's side effects.
///
/// The library itself is pure text generation over an immutable session;
/// everything that touches the outside world goes through this trait.
/// Implementations live with the caller (the cli ships a std one, tests
/// use an in-memory one).
pub trait Runtime: 'static {
    /// Progress reporting. Implementations decide where it goes.
    fn print(&self, msg: &str);

    /// Creates a directory and its missing parents; succeeds if it
    /// already exists.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Writes a whole file.
    ///
    /// Must be atomic: stage the data somewhere temporary and rename it
    /// into place, so a failed write never leaves a partial file behind.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

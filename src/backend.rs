use alloc::string::String;

use crate::error::Result;
use crate::path::Path;
use crate::resolve::MissingConfig;
use crate::session::{Session, Solution};

/// A generated build script together with the path it should land at.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: Path,
    pub text: String,
}

/// Knobs the caller can turn without touching the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
    pub missing_config: MissingConfig,
}

/// Build script emission abstraction.
///
/// This trait is the seam between the shared machinery (build model,
/// dependency ordering, configuration resolution) and a concrete output
/// dialect. Implementations consume a read-only view of the session and
/// produce text; they never touch the filesystem themselves.
pub trait Backend: 'static {
    /// Computes the file the solution's build script will be written to.
    ///
    /// Must be pure: equal solution identity yields an equal path across
    /// repeated invocations, with no side effects.
    fn makefile_name(&self, session: &Session, solution: &Solution) -> Result<Path>;

    /// Produces the complete build script for one solution.
    ///
    /// The returned text must be byte-identical across runs on equal
    /// input. On any error nothing is produced for the solution; emitters
    /// never return a partially valid script.
    fn emit(&self, session: &Session, solution: &Solution, opts: &EmitOptions)
    -> Result<Artifact>;
}

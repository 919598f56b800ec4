use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::path::Path;

/// Everything that can go wrong while turning a session into makefiles.
///
/// Errors are plain values tagged with the offending identifiers; one
/// solution's error never tears down the rest of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum GenError {
    /// The solution's dependency graph contains a cycle. `cycle` lists the
    /// project names in traversal order.
    CyclicDependency { solution: String, cycle: Vec<String> },
    /// A (config, platform) pair was requested that the solution never
    /// declares. `platform` is empty for solutions without a platform axis.
    ConfigurationNotFound {
        project: String,
        config: String,
        platform: String,
    },
    /// Two solutions resolved to the same output file.
    NamingCollision {
        first: String,
        second: String,
        path: Path,
    },
    /// A name or path that cannot be written into a makefile at all
    /// (embedded newline, NUL, ...).
    MalformedIdentifier {
        what: Cow<'static, str>,
        text: String,
    },
    /// A project depends on a name that matches no project in its solution.
    DanglingDependency { project: String, reference: String },
    /// A host-side failure (filesystem write), carried as text.
    Runtime(Cow<'static, str>),
}

pub type Result<T> = core::result::Result<T, GenError>;

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenError::CyclicDependency { solution, cycle } => {
                write!(f, "cyclic dependency in solution '{}': ", solution)?;
                for (i, name) in cycle.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    write!(f, "{}", name)?;
                }
                if let Some(first) = cycle.first() {
                    write!(f, " -> {}", first)?;
                }
                Ok(())
            }
            GenError::ConfigurationNotFound {
                project,
                config,
                platform,
            } => {
                if platform.is_empty() {
                    write!(
                        f,
                        "project '{}' requests undeclared configuration '{}'",
                        project, config
                    )
                } else {
                    write!(
                        f,
                        "project '{}' requests undeclared configuration '{}' for platform '{}'",
                        project, config, platform
                    )
                }
            }
            GenError::NamingCollision {
                first,
                second,
                path,
            } => write!(
                f,
                "solutions '{}' and '{}' would both generate {}",
                first, second, path
            ),
            GenError::MalformedIdentifier { what, text } => {
                write!(f, "{} {:?} cannot be written into a makefile", what, text)
            }
            GenError::DanglingDependency { project, reference } => write!(
                f,
                "project '{}' depends on unknown project '{}'",
                project, reference
            ),
            GenError::Runtime(msg) => write!(f, "runtime error: {}", msg),
        }
    }
}

impl core::error::Error for GenError {}

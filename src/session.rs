use alloc::string::String;
use alloc::vec::Vec;

use crate::path::Path;

/// What a project links into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Executable,
    StaticLibrary,
    SharedLibrary,
}

/// One layer of build settings.
///
/// Scalar fields override across layers, list fields concatenate in
/// layer order (solution, then project, then per-configuration block).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub flags: Vec<String>,
    pub defines: Vec<String>,
    pub ldflags: Vec<String>,
    pub sources: Vec<Path>,
    pub out_dir: Option<Path>,
    pub obj_dir: Option<Path>,
    pub out_file: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    pub fn ldflag(mut self, flag: impl Into<String>) -> Self {
        self.ldflags.push(flag.into());
        self
    }

    /// Adds a source file at this level; source lists concatenate across
    /// levels like the other list fields.
    pub fn source(mut self, path: impl AsRef<str>) -> Self {
        self.sources.push(Path::from(path));
        self
    }

    pub fn out_dir(mut self, dir: impl AsRef<str>) -> Self {
        self.out_dir = Some(Path::from(dir));
        self
    }

    pub fn obj_dir(mut self, dir: impl AsRef<str>) -> Self {
        self.obj_dir = Some(Path::from(dir));
        self
    }

    pub fn out_file(mut self, name: impl Into<String>) -> Self {
        self.out_file = Some(name.into());
        self
    }
}

/// Settings scoped to one (config, platform) pair of the owning project.
/// A block without a platform applies to every platform of its config.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBlock {
    pub(crate) config: String,
    pub(crate) platform: Option<String>,
    pub(crate) settings: Settings,
}

impl ConfigBlock {
    pub fn new(config: impl Into<String>, settings: Settings) -> Self {
        Self {
            config: config.into(),
            platform: None,
            settings,
        }
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}

/// A buildable unit owned by exactly one solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub(crate) name: String,
    pub(crate) kind: TargetKind,
    pub(crate) sources: Vec<Path>,
    pub(crate) depends: Vec<String>,
    pub(crate) overrides: Settings,
    pub(crate) blocks: Vec<ConfigBlock>,
}

impl Project {
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sources: Vec::new(),
            depends: Vec::new(),
            overrides: Settings::new(),
            blocks: Vec::new(),
        }
    }

    pub fn source(mut self, path: impl AsRef<str>) -> Self {
        self.sources.push(Path::from(path));
        self
    }

    pub fn sources<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sources.extend(paths.into_iter().map(Path::from));
        self
    }

    /// Declares that `name` must be built before this project. The name
    /// must resolve to a sibling project in the same solution.
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends.push(name.into());
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.overrides = settings;
        self
    }

    pub fn block(mut self, block: ConfigBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn depends(&self) -> &[String] {
        &self.depends
    }
}

/// A named group of projects sharing config and platform axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub(crate) name: String,
    pub(crate) location: Path,
    pub(crate) makefile: Option<String>,
    pub(crate) configs: Vec<String>,
    pub(crate) platforms: Vec<String>,
    pub(crate) defaults: Settings,
    pub(crate) projects: Vec<Project>,
}

impl Solution {
    pub fn new(name: impl Into<String>, location: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            location: Path::from(location),
            makefile: None,
            configs: Vec::new(),
            platforms: Vec::new(),
            defaults: Settings::new(),
            projects: Vec::new(),
        }
    }

    /// Overrides the generated makefile's name. Used verbatim after
    /// validation; without it the naming policy picks one.
    pub fn makefile(mut self, name: impl Into<String>) -> Self {
        self.makefile = Some(name.into());
        self
    }

    pub fn config(mut self, name: impl Into<String>) -> Self {
        self.configs.push(name.into());
        self
    }

    pub fn configs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.configs.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn platform(mut self, name: impl Into<String>) -> Self {
        self.platforms.push(name.into());
        self
    }

    pub fn platforms<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn defaults(mut self, settings: Settings) -> Self {
        self.defaults = settings;
        self
    }

    pub fn project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}

/// Read-only container of every solution in one generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub(crate) solutions: Vec<Solution>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solution(mut self, solution: Solution) -> Self {
        self.solutions.push(solution);
        self
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }
}

/// A (config, platform) point on the solution's configuration axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub config: String,
    pub platform: Option<String>,
}

impl Pair {
    pub(crate) fn new(config: &str, platform: Option<&str>) -> Self {
        Self {
            config: String::from(config),
            platform: platform.map(String::from),
        }
    }

    /// The value the generated makefile matches against `$(config)`,
    /// e.g. `debug_x86`, or `debug` without a platform axis.
    pub fn ident(&self) -> String {
        let mut out = sanitize(&self.config);
        if let Some(platform) = &self.platform {
            out.push('_');
            out.push_str(&sanitize(platform));
        }
        out
    }

    pub fn platform_str(&self) -> &str {
        self.platform.as_deref().unwrap_or("")
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

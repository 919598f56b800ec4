use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{GenError, Result};
use crate::path::Path;
use crate::session::{Pair, Project, Settings, Solution, TargetKind};

/// What to do with a project block naming a (config, platform) pair its
/// solution never declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingConfig {
    /// Ignore the block. The default.
    #[default]
    Skip,
    /// Fail the whole solution with `ConfigurationNotFound`.
    Fail,
}

/// An effective configuration with every field populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub pair: Pair,
    pub flags: Vec<String>,
    pub defines: Vec<String>,
    pub ldflags: Vec<String>,
    pub out_dir: Path,
    pub obj_dir: Path,
    pub out_file: String,
    pub sources: Vec<Path>,
}

impl Resolved {
    /// Full path of the linked artifact.
    pub fn target(&self) -> Path {
        self.out_dir.join(&self.out_file)
    }
}

/// The declaration-order cross product of the solution's configs and
/// platforms. A solution without configs gets a single built-in "Default"
/// config; one without platforms gets pairs with no platform component.
pub fn pairs(solution: &Solution) -> Vec<Pair> {
    if solution.configs.is_empty() {
        return fallback_pairs(solution);
    }

    let mut out = Vec::new();
    for config in &solution.configs {
        if solution.platforms.is_empty() {
            out.push(Pair::new(config, None));
        } else {
            for platform in &solution.platforms {
                out.push(Pair::new(config, Some(platform.as_str())));
            }
        }
    }
    out
}

fn fallback_pairs(solution: &Solution) -> Vec<Pair> {
    if solution.platforms.is_empty() {
        return alloc::vec![Pair::new("Default", None)];
    }
    solution
        .platforms
        .iter()
        .map(|p| Pair::new("Default", Some(p.as_str())))
        .collect()
}

/// Merges the three override levels into one effective configuration for
/// `project` at `pair`: solution defaults, then project settings, then the
/// project's matching per-configuration blocks. Scalars override, lists
/// concatenate; whatever is still unset afterwards falls back to built-in
/// defaults.
pub fn resolve(
    solution: &Solution,
    project: &Project,
    pair: &Pair,
    policy: MissingConfig,
) -> Result<Resolved> {
    let declared_pairs = pairs(solution);
    if !declared_pairs.contains(pair) {
        return Err(not_found(project, &pair.config, pair.platform_str()));
    }

    if policy == MissingConfig::Fail {
        for block in &project.blocks {
            let declared = declared_pairs.iter().any(|p| {
                p.config == block.config
                    && block
                        .platform
                        .as_ref()
                        .is_none_or(|platform| p.platform_str() == platform)
            });
            if !declared {
                return Err(not_found(
                    project,
                    &block.config,
                    block.platform.as_deref().unwrap_or(""),
                ));
            }
        }
    }

    let mut merged = solution.defaults.clone();
    // The project's own source list sits at project level, ahead of any
    // sources its settings add.
    merged.sources.extend(project.sources.iter().cloned());
    apply(&mut merged, &project.overrides);
    for block in &project.blocks {
        let matches = block.config == pair.config
            && block
                .platform
                .as_ref()
                .is_none_or(|platform| pair.platform_str() == platform);
        if matches {
            apply(&mut merged, &block.settings);
        }
    }

    let out_dir = merged.out_dir.unwrap_or_else(|| Path::from("."));
    let obj_dir = merged
        .obj_dir
        .unwrap_or_else(|| Path::from("obj"))
        .join(pair.ident())
        .join(project.name());
    let out_file = merged
        .out_file
        .unwrap_or_else(|| default_out_file(project.kind(), project.name()));

    Ok(Resolved {
        pair: pair.clone(),
        flags: merged.flags,
        defines: merged.defines,
        ldflags: merged.ldflags,
        out_dir,
        obj_dir,
        out_file,
        sources: merged.sources,
    })
}

pub fn default_out_file(kind: TargetKind, name: &str) -> String {
    match kind {
        TargetKind::Executable => String::from(name),
        TargetKind::StaticLibrary => format!("lib{}.a", name),
        TargetKind::SharedLibrary => format!("lib{}.so", name),
    }
}

fn not_found(project: &Project, config: &str, platform: &str) -> GenError {
    GenError::ConfigurationNotFound {
        project: String::from(project.name()),
        config: String::from(config),
        platform: String::from(platform),
    }
}

fn apply(base: &mut Settings, layer: &Settings) {
    base.flags.extend(layer.flags.iter().cloned());
    base.defines.extend(layer.defines.iter().cloned());
    base.ldflags.extend(layer.ldflags.iter().cloned());
    base.sources.extend(layer.sources.iter().cloned());
    if layer.out_dir.is_some() {
        base.out_dir = layer.out_dir.clone();
    }
    if layer.obj_dir.is_some() {
        base.obj_dir = layer.obj_dir.clone();
    }
    if layer.out_file.is_some() {
        base.out_file = layer.out_file.clone();
    }
}

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod backend;
mod error;
mod graph;
mod make;
pub mod path;
mod resolve;
pub mod runtime;
mod session;

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

pub use crate::backend::{Artifact, Backend, EmitOptions};
pub use crate::error::GenError;
pub use crate::graph::build_order;
pub use crate::make::{MakeBackend, check_collisions, solution_makefile};
pub use crate::path::Path;
pub use crate::resolve::{MissingConfig, Resolved, default_out_file, pairs, resolve};
pub use crate::session::{
    ConfigBlock, Pair, Project, Session, Settings, Solution, TargetKind,
};

/// One solution's failure, tagged with its name.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub solution: String,
    pub error: GenError,
}

/// What a generation run produced: written artifacts plus per-solution
/// failures. Solutions fail independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn ok(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Generator {
    rt: Rc<dyn runtime::Runtime>,
    backend: Rc<dyn Backend>,
    missing_config: MissingConfig,
    abort_on_error: bool,
}

impl Generator {
    pub fn new(rt: impl runtime::Runtime, backend: impl Backend) -> Self {
        let rt = Rc::new(rt);
        let backend = Rc::new(backend);
        Self {
            rt,
            backend,
            missing_config: MissingConfig::default(),
            abort_on_error: false,
        }
    }

    /// Policy for project blocks naming undeclared configurations.
    pub fn missing_config(&mut self, policy: MissingConfig) -> &mut Self {
        self.missing_config = policy;
        self
    }

    /// Stop the whole session at the first failing solution instead of
    /// letting the rest proceed.
    pub fn abort_on_error(&mut self, abort: bool) -> &mut Self {
        self.abort_on_error = abort;
        self
    }

    /// Generates and writes one build script per solution.
    ///
    /// Naming collisions are checked across the whole session first, so
    /// no solution's output silently overwrites another's. A failing
    /// solution contributes a `Failure` and nothing on disk.
    pub fn generate(&self, session: &Session) -> Report {
        let opts = EmitOptions {
            missing_config: self.missing_config,
        };
        let mut report = Report::default();
        let mut failed = vec![false; session.solutions().len()];

        let mut seen: HashMap<Path, usize> = HashMap::new();
        for (i, solution) in session.solutions().iter().enumerate() {
            match self.backend.makefile_name(session, solution) {
                Ok(path) => {
                    if let Some(&first) = seen.get(&path) {
                        let error = GenError::NamingCollision {
                            first: String::from(session.solutions()[first].name()),
                            second: String::from(solution.name()),
                            path,
                        };
                        for index in [first, i] {
                            if !failed[index] {
                                failed[index] = true;
                                report.failures.push(Failure {
                                    solution: String::from(session.solutions()[index].name()),
                                    error: error.clone(),
                                });
                            }
                        }
                    } else {
                        seen.insert(path, i);
                    }
                }
                Err(error) => {
                    failed[i] = true;
                    report.failures.push(Failure {
                        solution: String::from(solution.name()),
                        error,
                    });
                }
            }
        }
        if self.abort_on_error && !report.ok() {
            return report;
        }

        for (i, solution) in session.solutions().iter().enumerate() {
            if failed[i] {
                continue;
            }
            let outcome = self
                .backend
                .emit(session, solution, &opts)
                .and_then(|artifact| {
                    self.write(&artifact).map_err(|e| {
                        GenError::Runtime(format!("writing {}: {:#}", artifact.path, e).into())
                    })?;
                    Ok(artifact)
                });
            match outcome {
                Ok(artifact) => {
                    self.rt.print(&format!("Generated {}", artifact.path));
                    report.artifacts.push(artifact);
                }
                Err(error) => {
                    report.failures.push(Failure {
                        solution: String::from(solution.name()),
                        error,
                    });
                    if self.abort_on_error {
                        break;
                    }
                }
            }
        }
        report
    }

    fn write(&self, artifact: &Artifact) -> runtime::Result<()> {
        let dir = artifact.path.parent();
        if !dir.is_empty() {
            self.rt.create_dir_all(&dir)?;
        }
        self.rt.write_file(&artifact.path, artifact.text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::runtime::Runtime;

    #[derive(Default)]
    struct MemFs {
        files: Vec<(String, Vec<u8>)>,
        fail_writes: bool,
    }

    #[derive(Clone, Default)]
    struct MemRuntime(Rc<RefCell<MemFs>>);

    impl Runtime for MemRuntime {
        fn print(&self, _msg: &str) {}

        fn create_dir_all(&self, _path: &Path) -> runtime::Result<()> {
            Ok(())
        }

        fn write_file(&self, path: &Path, data: &[u8]) -> runtime::Result<()> {
            if self.0.borrow().fail_writes {
                anyhow::bail!("disk full");
            }
            self.0
                .borrow_mut()
                .files
                .push((path.to_string(), data.to_vec()));
            Ok(())
        }
    }

    fn solution(name: &str, location: &str) -> Solution {
        Solution::new(name, location)
            .configs(["Debug"])
            .project(Project::new(name, TargetKind::Executable).source("main.c"))
    }

    fn cyclic(name: &str, location: &str) -> Solution {
        Solution::new(name, location)
            .configs(["Debug"])
            .project(Project::new("A", TargetKind::StaticLibrary).depends_on("B"))
            .project(Project::new("B", TargetKind::StaticLibrary).depends_on("A"))
    }

    #[test]
    fn test_generate_writes_one_makefile_per_solution() {
        let fs = MemRuntime::default();
        let generator = Generator::new(fs.clone(), MakeBackend);
        let session = Session::new()
            .solution(solution("App", "app"))
            .solution(solution("Tools", "tools"));

        let report = generator.generate(&session);
        assert!(report.ok());
        assert_eq!(report.artifacts.len(), 2);

        let files = &fs.0.borrow().files;
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].0, "app/Makefile");
        assert_eq!(files[1].0, "tools/Makefile");
        assert_eq!(files[0].1, report.artifacts[0].text.as_bytes());
    }

    #[test]
    fn test_failing_solution_does_not_block_the_rest() {
        let fs = MemRuntime::default();
        let generator = Generator::new(fs.clone(), MakeBackend);
        let session = Session::new()
            .solution(cyclic("Broken", "broken"))
            .solution(solution("App", "app"));

        let report = generator.generate(&session);
        assert_eq!(report.artifacts.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].solution, "Broken");
        assert!(matches!(
            report.failures[0].error,
            GenError::CyclicDependency { .. }
        ));

        let files = &fs.0.borrow().files;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "app/Makefile");
    }

    #[test]
    fn test_abort_on_error_stops_the_batch() {
        let fs = MemRuntime::default();
        let mut generator = Generator::new(fs.clone(), MakeBackend);
        generator.abort_on_error(true);
        let session = Session::new()
            .solution(cyclic("Broken", "broken"))
            .solution(solution("App", "app"));

        let report = generator.generate(&session);
        assert_eq!(report.artifacts.len(), 0);
        assert_eq!(report.failures.len(), 1);
        assert!(fs.0.borrow().files.is_empty());
    }

    #[test]
    fn test_naming_collision_fails_both_solutions() {
        let fs = MemRuntime::default();
        let generator = Generator::new(fs.clone(), MakeBackend);
        let session = Session::new()
            .solution(solution("App", "out").makefile("Makefile"))
            .solution(solution("Tools", "out").makefile("Makefile"));

        let report = generator.generate(&session);
        assert_eq!(report.artifacts.len(), 0);
        assert_eq!(report.failures.len(), 2);
        assert!(fs.0.borrow().files.is_empty());
        for failure in &report.failures {
            assert!(matches!(failure.error, GenError::NamingCollision { .. }));
        }
    }

    #[test]
    fn test_write_failure_is_reported_not_raised() {
        let fs = MemRuntime::default();
        fs.0.borrow_mut().fail_writes = true;
        let generator = Generator::new(fs.clone(), MakeBackend);
        let session = Session::new().solution(solution("App", "app"));

        let report = generator.generate(&session);
        assert_eq!(report.artifacts.len(), 0);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, GenError::Runtime(_)));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let fs = MemRuntime::default();
        let generator = Generator::new(fs.clone(), MakeBackend);
        let session = Session::new().solution(solution("App", "app"));
        let a = generator.generate(&session);
        let b = generator.generate(&session);
        assert_eq!(a, b);
    }
}

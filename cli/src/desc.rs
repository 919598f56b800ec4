//! The TOML session description the cli accepts.
//!
//! These types are a transport for the library's build model, nothing
//! more; validation (dangling dependencies, undeclared configurations,
//! naming) happens inside the generator.

use picomake::{ConfigBlock, Project, Session, Settings, Solution, TargetKind};
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub struct SessionDesc {
    #[serde(default, rename = "solution")]
    solutions: Vec<SolutionDesc>,
}

#[derive(Deserialize, Debug)]
struct SolutionDesc {
    name: String,
    #[serde(default = "default_location")]
    location: String,
    makefile: Option<String>,
    #[serde(default)]
    configs: Vec<String>,
    #[serde(default)]
    platforms: Vec<String>,
    #[serde(default)]
    settings: SettingsDesc,
    #[serde(default, rename = "project")]
    projects: Vec<ProjectDesc>,
}

#[derive(Deserialize, Debug)]
struct ProjectDesc {
    name: String,
    kind: KindDesc,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    depends: Vec<String>,
    #[serde(default)]
    settings: SettingsDesc,
    #[serde(default, rename = "config")]
    blocks: Vec<BlockDesc>,
}

#[derive(Deserialize, Debug)]
struct BlockDesc {
    config: String,
    platform: Option<String>,
    #[serde(flatten)]
    settings: SettingsDesc,
}

#[derive(Deserialize, Debug, Default)]
struct SettingsDesc {
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    defines: Vec<String>,
    #[serde(default)]
    ldflags: Vec<String>,
    #[serde(default)]
    sources: Vec<String>,
    out_dir: Option<String>,
    obj_dir: Option<String>,
    out_file: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
enum KindDesc {
    Executable,
    StaticLibrary,
    SharedLibrary,
}

fn default_location() -> String {
    String::from(".")
}

impl SessionDesc {
    pub fn into_session(self) -> Session {
        let mut session = Session::new();
        for solution in self.solutions {
            session = session.solution(solution.into_solution());
        }
        session
    }
}

impl SolutionDesc {
    fn into_solution(self) -> Solution {
        let mut solution = Solution::new(self.name, self.location)
            .configs(self.configs)
            .platforms(self.platforms)
            .defaults(self.settings.into_settings());
        if let Some(makefile) = self.makefile {
            solution = solution.makefile(makefile);
        }
        for project in self.projects {
            solution = solution.project(project.into_project());
        }
        solution
    }
}

impl ProjectDesc {
    fn into_project(self) -> Project {
        let mut project = Project::new(self.name, self.kind.into_kind())
            .sources(self.sources)
            .settings(self.settings.into_settings());
        for dep in self.depends {
            project = project.depends_on(dep);
        }
        for block in self.blocks {
            let mut cb = ConfigBlock::new(block.config, block.settings.into_settings());
            if let Some(platform) = block.platform {
                cb = cb.platform(platform);
            }
            project = project.block(cb);
        }
        project
    }
}

impl SettingsDesc {
    fn into_settings(self) -> Settings {
        let mut settings = Settings::new();
        settings.flags = self.flags;
        settings.defines = self.defines;
        settings.ldflags = self.ldflags;
        for source in self.sources {
            settings = settings.source(source);
        }
        if let Some(dir) = self.out_dir {
            settings = settings.out_dir(dir);
        }
        if let Some(dir) = self.obj_dir {
            settings = settings.obj_dir(dir);
        }
        if let Some(name) = self.out_file {
            settings = settings.out_file(name);
        }
        settings
    }
}

impl KindDesc {
    fn into_kind(self) -> TargetKind {
        match self {
            KindDesc::Executable => TargetKind::Executable,
            KindDesc::StaticLibrary => TargetKind::StaticLibrary,
            KindDesc::SharedLibrary => TargetKind::SharedLibrary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_description_maps_onto_the_model() {
        let input = r#"
[[solution]]
name = "Server"
location = "build"
configs = ["Debug", "Release"]
platforms = ["x86", "x64"]

[solution.settings]
flags = ["-Wall"]
defines = ["SERVER"]

[[solution.project]]
name = "utils"
kind = "static-library"
sources = ["utils/utils.c"]

[[solution.project]]
name = "server"
kind = "executable"
sources = ["server/main.c"]
depends = ["utils"]

[[solution.project.config]]
config = "Debug"
flags = ["-g"]
"#;
        let desc: SessionDesc = toml::from_str(input).unwrap();
        let session = desc.into_session();

        assert_eq!(session.solutions().len(), 1);
        let solution = &session.solutions()[0];
        assert_eq!(solution.name(), "Server");
        assert_eq!(solution.projects().len(), 2);
        assert_eq!(solution.projects()[1].depends(), ["utils"]);
        assert_eq!(solution.projects()[0].kind(), TargetKind::StaticLibrary);
    }

    #[test]
    fn test_per_config_sources_reach_the_makefile() {
        let input = r#"
[[solution]]
name = "App"
configs = ["Debug", "Release"]

[[solution.project]]
name = "app"
kind = "executable"
sources = ["main.c"]

[[solution.project.config]]
config = "Debug"
sources = ["trace.c"]
"#;
        let desc: SessionDesc = toml::from_str(input).unwrap();
        let session = desc.into_session();

        use picomake::{Backend, EmitOptions, MakeBackend};
        let artifact = MakeBackend
            .emit(&session, &session.solutions()[0], &EmitOptions::default())
            .unwrap();
        assert!(artifact.text.contains("obj/debug/app/trace.o"));
        assert!(!artifact.text.contains("obj/release/app/trace.o"));
    }

    #[test]
    fn test_minimal_description() {
        let input = r#"
[[solution]]
name = "MyApp"

[[solution.project]]
name = "MyApp"
kind = "executable"
sources = ["main.c"]
"#;
        let desc: SessionDesc = toml::from_str(input).unwrap();
        let session = desc.into_session();
        assert_eq!(session.solutions()[0].location().as_ref(), ".");
    }
}

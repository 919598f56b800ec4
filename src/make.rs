use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::backend::{Artifact, Backend, EmitOptions};
use crate::error::{GenError, Result};
use crate::graph;
use crate::path::Path;
use crate::resolve::{self, MissingConfig, Resolved};
use crate::session::{Pair, Session, Solution, TargetKind};

mod escape;
mod name;

pub use name::{check_collisions, solution_makefile};

/// The GNU Make emitter.
///
/// One makefile per solution; projects become targets inside it. The
/// text is assembled in a single append-only pass: one variable block
/// per (config, platform) pair, then the link rules, which reference
/// only pair-scoped variables and therefore hold for every pair, then
/// the compile and directory rules, which are conditional per pair
/// because a configuration can contribute sources of its own.
pub struct MakeBackend;

impl Backend for MakeBackend {
    fn makefile_name(&self, session: &Session, solution: &Solution) -> Result<Path> {
        name::solution_makefile(session, solution)
    }

    fn emit(
        &self,
        session: &Session,
        solution: &Solution,
        opts: &EmitOptions,
    ) -> Result<Artifact> {
        let path = name::solution_makefile(session, solution)?;
        let order = graph::build_order(solution)?;
        let text = emit_solution(solution, &order, opts.missing_config)?;
        Ok(Artifact { path, text })
    }
}

fn emit_solution(sln: &Solution, order: &[usize], policy: MissingConfig) -> Result<String> {
    let pairs = resolve::pairs(sln);
    let idents: Vec<String> = pairs.iter().map(Pair::ident).collect();

    // Distinct (config, platform) pairs can sanitize to the same selector,
    // which would make their ifeq blocks shadow each other. Refuse rather
    // than emit a makefile that silently merges configurations.
    let mut seen = HashSet::new();
    for ident in &idents {
        if !seen.insert(ident.as_str()) {
            return Err(GenError::MalformedIdentifier {
                what: Cow::Borrowed("configuration selector"),
                text: ident.clone(),
            });
        }
    }

    let prefixes = var_prefixes(sln);
    let index: HashMap<&str, usize> = sln
        .projects
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name(), i))
        .collect();

    let mut aliases = Vec::with_capacity(order.len());
    for &i in order {
        aliases.push(escape::path(sln.projects[i].name())?);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "# GNU Make makefile for solution '{}'\n# Generated by picomake. Do not edit.\n\n",
        sln.name()
    ));
    out.push_str(&format!(
        "ifndef config\n  config = {}\nendif\n\n",
        idents[0]
    ));
    out.push_str(&format!(
        "ifeq ($(filter $(config),{}),)\n  $(error unknown configuration '$(config)')\nendif\n\n",
        idents.join(" ")
    ));
    out.push_str("CC ?= cc\nAR ?= ar\nRM ?= rm -f\n");

    // Sources can differ between pairs, so every (pair, project)
    // combination is resolved up front; the variable blocks and the
    // pair-scoped rule sections below both read from this table.
    let mut resolved: Vec<Vec<Resolved>> = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        let mut row = Vec::with_capacity(order.len());
        for &i in order {
            row.push(resolve::resolve(sln, &sln.projects[i], pair, policy)?);
        }
        resolved.push(row);
    }

    // Per-pair variable blocks. Raw paths are collected on the side for
    // the clean rule, which covers every pair.
    let mut clean_paths: Vec<String> = Vec::new();
    for (pi, pair) in pairs.iter().enumerate() {
        out.push_str(&format!("\nifeq ($(config),{})\n", pair.ident()));
        for (pos, &i) in order.iter().enumerate() {
            let rc = &resolved[pi][pos];
            let p = &prefixes[i];

            let target = rc.target();
            let mut objs = Vec::new();
            for (_, obj_name) in objects(&rc.sources) {
                objs.push(escape::path(rc.obj_dir.join(&obj_name).as_ref())?);
            }
            let mut cflags = Vec::new();
            for define in &rc.defines {
                cflags.push(format!("-D{}", escape::value(define)?));
            }
            for flag in &rc.flags {
                cflags.push(escape::value(flag)?);
            }
            let mut ldflags = Vec::new();
            for flag in &rc.ldflags {
                ldflags.push(escape::value(flag)?);
            }

            out.push_str(&format!(
                "  {p}_outdir := {}\n",
                escape::path(rc.out_dir.as_ref())?
            ));
            out.push_str(&format!(
                "  {p}_target := {}\n",
                escape::path(target.as_ref())?
            ));
            out.push_str(&format!(
                "  {p}_objdir := {}\n",
                escape::path(rc.obj_dir.as_ref())?
            ));
            out.push_str(&format!("  {p}_objects :={}\n", words(&objs)));
            out.push_str(&format!("  {p}_cflags :={}\n", words(&cflags)));
            out.push_str(&format!("  {p}_ldflags :={}\n", words(&ldflags)));

            push_unique(&mut clean_paths, target.to_string());
            push_unique(&mut clean_paths, rc.obj_dir.to_string());
        }
        out.push_str("endif\n");
    }

    // `all` must stay the first rule in the file so it is the default
    // goal; everything above is variables and conditionals only.
    out.push_str(&format!("\n.PHONY: all clean{}\n", words(&aliases)));
    out.push_str(&format!("\nall:{}\n", words(&aliases)));

    for (pos, &i) in order.iter().enumerate() {
        let project = &sln.projects[i];
        let p = &prefixes[i];

        out.push_str(&format!("\n{}: $({p}_target)\n", aliases[pos]));

        // Dependency targets go first, then the project's own objects,
        // then the output directory as an order-only prerequisite.
        let mut prereqs = Vec::new();
        for reference in project.depends() {
            let dep = index[reference.as_str()];
            prereqs.push(format!("$({}_target)", prefixes[dep]));
        }
        prereqs.push(format!("$({p}_objects)"));
        out.push_str(&format!(
            "\n$({p}_target):{} | $({p}_outdir)\n",
            words(&prereqs)
        ));
        out.push_str(&link_recipe(project.kind(), p));
    }

    let mut removed = Vec::new();
    for path in &clean_paths {
        removed.push(escape::shell(path)?);
    }
    out.push_str(&format!("\nclean:\n\t$(RM) -r{}\n", words(&removed)));

    // Compile and directory rules are pair-scoped since the source list
    // itself can vary with the configuration. These sections come after
    // `all` and carry no non-conditional rules, so the default goal is
    // unaffected.
    for (pi, pair) in pairs.iter().enumerate() {
        out.push_str(&format!("\nifeq ($(config),{})\n", pair.ident()));
        let mut dirs: Vec<String> = Vec::new();
        for (pos, &i) in order.iter().enumerate() {
            let rc = &resolved[pi][pos];
            let p = &prefixes[i];
            for (source, obj_name) in objects(&rc.sources) {
                out.push_str(&format!(
                    "\n$({p}_objdir)/{}: {} | $({p}_objdir)\n",
                    escape::path(&obj_name)?,
                    escape::path(source.as_ref())?
                ));
                out.push_str(&format!("\t$(CC) $({p}_cflags) -c -o '$@' '$<'\n"));
            }
            // The current directory always exists; no rule for it.
            if rc.out_dir.as_ref() != "." {
                push_unique(&mut dirs, escape::path(rc.out_dir.as_ref())?);
            }
            push_unique(&mut dirs, escape::path(rc.obj_dir.as_ref())?);
        }
        if !dirs.is_empty() {
            out.push_str(&format!("\n{}:\n\tmkdir -p '$@'\n", dirs.join(" ")));
        }
        out.push_str("endif\n");
    }

    Ok(out)
}

fn link_recipe(kind: TargetKind, p: &str) -> String {
    match kind {
        TargetKind::Executable => {
            format!("\t$(CC) -o '$@' $({p}_objects) $({p}_ldflags)\n")
        }
        TargetKind::SharedLibrary => {
            format!("\t$(CC) -shared -o '$@' $({p}_objects) $({p}_ldflags)\n")
        }
        TargetKind::StaticLibrary => format!("\t$(AR) rcs '$@' $({p}_objects)\n"),
    }
}

/// Compilable sources paired with their object file names. Headers and
/// other non-compilable files listed as sources produce no objects.
fn objects(sources: &[Path]) -> Vec<(&Path, String)> {
    sources
        .iter()
        .filter(|s| is_compilable(s))
        .map(|s| {
            let obj = Path::from(s.file_name()).set_extension("o");
            (s, obj.to_string())
        })
        .collect()
}

fn is_compilable(source: &Path) -> bool {
    matches!(
        source.extension().map(str::to_ascii_lowercase).as_deref(),
        Some("c" | "cc" | "cpp" | "cxx" | "s")
    )
}

/// Variable prefixes per project, unique within the solution.
fn var_prefixes(sln: &Solution) -> Vec<String> {
    let mut used = HashSet::new();
    sln.projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let mut prefix = sanitize_prefix(project.name());
            if !used.insert(prefix.clone()) {
                prefix = format!("{}_{}", prefix, i);
                used.insert(prefix.clone());
            }
            prefix
        })
        .collect()
}

fn sanitize_prefix(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Joins words with a leading space per word, so empty lists collapse to
/// nothing instead of a trailing separator.
fn words(items: &[String]) -> String {
    let mut out = String::new();
    for item in items {
        out.push(' ');
        out.push_str(item);
    }
    out
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::{GenError, Result};
use crate::session::Solution;

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Orders the solution's projects so every dependency lands before its
/// dependents. Returns indices into `solution.projects()`.
///
/// Projects unconstrained relative to each other keep their declaration
/// order, so repeated runs over the same input emit identical makefiles.
pub fn build_order(solution: &Solution) -> Result<Vec<usize>> {
    let index: HashMap<&str, usize> = solution
        .projects
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name(), i))
        .collect();

    let mut marks = vec![Mark::Unvisited; solution.projects.len()];
    let mut order = Vec::with_capacity(solution.projects.len());
    let mut trail = Vec::new();

    for i in 0..solution.projects.len() {
        visit(solution, &index, &mut marks, &mut order, &mut trail, i)?;
    }
    Ok(order)
}

fn visit(
    solution: &Solution,
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    order: &mut Vec<usize>,
    trail: &mut Vec<usize>,
    current: usize,
) -> Result<()> {
    match marks[current] {
        Mark::Done => return Ok(()),
        Mark::InProgress => {
            // Trail holds the in-progress chain; the cycle starts where
            // `current` first appears in it.
            let start = trail.iter().position(|&i| i == current).unwrap_or(0);
            let cycle: Vec<String> = trail[start..]
                .iter()
                .map(|&i| String::from(solution.projects[i].name()))
                .collect();
            return Err(GenError::CyclicDependency {
                solution: String::from(solution.name()),
                cycle,
            });
        }
        Mark::Unvisited => {}
    }

    marks[current] = Mark::InProgress;
    trail.push(current);

    let project = &solution.projects[current];
    for reference in project.depends() {
        let Some(&dep) = index.get(reference.as_str()) else {
            return Err(GenError::DanglingDependency {
                project: String::from(project.name()),
                reference: reference.clone(),
            });
        };
        visit(solution, index, marks, order, trail, dep)?;
    }

    trail.pop();
    marks[current] = Mark::Done;
    order.push(current);
    Ok(())
}

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

use hashbrown::HashMap;

use crate::error::{GenError, Result};
use crate::path::Path;
use crate::session::{Session, Solution};

/// Computes the makefile path for one solution.
///
/// A solution alone in its output directory gets the plain `Makefile`,
/// so `make` picks it up with no arguments. When several solutions share
/// a directory each falls back to `<name>.make` instead of fighting over
/// `Makefile`. An explicit override on the solution wins verbatim, after
/// validation. Pure: equal solution identity always yields the same path.
pub fn solution_makefile(session: &Session, solution: &Solution) -> Result<Path> {
    let name = match &solution.makefile {
        Some(name) => {
            validate("makefile override", name)?;
            name.clone()
        }
        None => {
            let sharing = session
                .solutions
                .iter()
                .filter(|s| s.location == solution.location)
                .count();
            if sharing > 1 {
                let name = format!("{}.make", solution.name);
                validate("solution name", &name)?;
                name
            } else {
                String::from("Makefile")
            }
        }
    };
    Ok(solution.location.join(&name))
}

/// Refuses to let two solutions resolve to the same output file.
pub fn check_collisions(session: &Session) -> Result<()> {
    let mut seen: HashMap<Path, &str> = HashMap::new();
    for solution in &session.solutions {
        let path = solution_makefile(session, solution)?;
        if let Some(first) = seen.insert(path.clone(), solution.name()) {
            return Err(GenError::NamingCollision {
                first: String::from(first),
                second: String::from(solution.name()),
                path,
            });
        }
    }
    Ok(())
}

fn validate(what: &'static str, name: &str) -> Result<()> {
    let bad = name.is_empty() || name.contains(['/', '\\', '\0', '\n', '\r']);
    if bad {
        return Err(GenError::MalformedIdentifier {
            what: Cow::Borrowed(what),
            text: String::from(name),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lone_solution_gets_plain_makefile() {
        let session = Session::new().solution(Solution::new("MyApp", "."));
        let path = solution_makefile(&session, &session.solutions()[0]).unwrap();
        assert_eq!(path, Path::from("./Makefile"));
    }

    #[test]
    fn test_shared_directory_falls_back_to_named_makefiles() {
        let session = Session::new()
            .solution(Solution::new("App", "build"))
            .solution(Solution::new("Tests", "build"));
        let app = solution_makefile(&session, &session.solutions()[0]).unwrap();
        let tests = solution_makefile(&session, &session.solutions()[1]).unwrap();
        assert_eq!(app, Path::from("build/App.make"));
        assert_eq!(tests, Path::from("build/Tests.make"));
        assert!(check_collisions(&session).is_ok());
    }

    #[test]
    fn test_override_is_used_verbatim() {
        let session = Session::new()
            .solution(Solution::new("App", "build").makefile("app.mk"))
            .solution(Solution::new("Tests", "build"));
        let app = solution_makefile(&session, &session.solutions()[0]).unwrap();
        let tests = solution_makefile(&session, &session.solutions()[1]).unwrap();
        assert_eq!(app, Path::from("build/app.mk"));
        // The override still counts as occupying the directory.
        assert_eq!(tests, Path::from("build/Tests.make"));
    }

    #[test]
    fn test_same_name_same_directory_collides() {
        let session = Session::new()
            .solution(Solution::new("App", "out"))
            .solution(Solution::new("App", "out"));
        let err = check_collisions(&session).unwrap_err();
        assert_eq!(
            err,
            GenError::NamingCollision {
                first: "App".into(),
                second: "App".into(),
                path: Path::from("out/App.make"),
            }
        );
    }

    #[test]
    fn test_override_collision_is_detected() {
        let session = Session::new()
            .solution(Solution::new("A", "out").makefile("Makefile"))
            .solution(Solution::new("B", "out").makefile("Makefile"));
        assert!(matches!(
            check_collisions(&session),
            Err(GenError::NamingCollision { .. })
        ));
    }

    #[test]
    fn test_bad_override_is_malformed() {
        for bad in ["", "dir/Makefile", "Make\nfile"] {
            let session = Session::new().solution(Solution::new("App", ".").makefile(bad));
            assert!(matches!(
                solution_makefile(&session, &session.solutions()[0]),
                Err(GenError::MalformedIdentifier { .. })
            ));
        }
    }

    #[test]
    fn test_naming_is_pure() {
        let session = Session::new()
            .solution(Solution::new("App", "build"))
            .solution(Solution::new("Tests", "build"));
        let a = solution_makefile(&session, &session.solutions()[0]).unwrap();
        let b = solution_makefile(&session, &session.solutions()[0]).unwrap();
        assert_eq!(a, b);
    }
}

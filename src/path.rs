use alloc::string::String;
use core::fmt;

/// A forward-slash path, kept as plain text.
///
/// Generated makefiles are textual, so paths never touch the host
/// filesystem representation inside the library. Backslashes are
/// normalized on construction so Windows-style input joins cleanly.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(String);

const SEP: &str = "/";

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.0)
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(path: impl AsRef<str>) -> Self {
        Self(path.as_ref().replace("\\", "/"))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The final component, or the whole path if it has one component.
    pub fn file_name(&self) -> &str {
        match self.0.rfind(SEP) {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        }
    }

    /// Everything before the final component. Empty for single-component
    /// paths.
    pub fn parent(&self) -> Self {
        match self.0.rfind(SEP) {
            Some(0) => Self(String::from(SEP)),
            Some(i) => Self(String::from(&self.0[..i])),
            None => Self::new(),
        }
    }

    pub fn set_extension(&self, suffix: &str) -> Self {
        let path = &self.0;
        let last_separator = path.rfind(SEP);

        // Only look for a '.' inside the final component.
        let search_start = last_separator.map(|i| i + 1).unwrap_or(0);
        let last_dot = path[search_start..].rfind('.').map(|i| search_start + i);

        let stem = match last_dot {
            Some(dot_pos) => &path[..dot_pos],
            None => path,
        };
        let mut new_path = String::from(stem);
        if !suffix.starts_with('.') {
            new_path.push('.');
        }
        new_path.push_str(suffix);
        Self(new_path)
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        name.rfind('.').map(|i| &name[i + 1..])
    }

    pub fn join(&self, path: impl AsRef<str>) -> Self {
        let path = path.as_ref().replace("\\", "/");
        if path.starts_with(SEP) || self.0.is_empty() {
            return Self(path);
        }

        let mut new_path = String::from(self.0.trim_end_matches(SEP));
        new_path.push_str(SEP);
        new_path.push_str(&path);
        Self(new_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_and_parent() {
        let p = Path::from("src/util/a.c");
        assert_eq!(p.file_name(), "a.c");
        assert_eq!(p.parent(), Path::from("src/util"));
        assert_eq!(Path::from("Makefile").parent(), Path::new());
    }

    #[test]
    fn test_set_extension() {
        assert_eq!(Path::from("src/a.c").set_extension("o"), Path::from("src/a.o"));
        assert_eq!(Path::from("src/noext").set_extension("o"), Path::from("src/noext.o"));
        assert_eq!(Path::from("a.b/noext").set_extension("o"), Path::from("a.b/noext.o"));
    }

    #[test]
    fn test_join_normalizes_backslashes() {
        let p = Path::from("build").join("sub\\dir");
        assert_eq!(p, Path::from("build/sub/dir"));
    }
}

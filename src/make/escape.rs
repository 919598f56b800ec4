use alloc::borrow::Cow;
use alloc::string::String;

use crate::error::{GenError, Result};

/// Escapes a path or name for target and prerequisite position, where
/// whitespace splits tokens and `$ # : \` carry meaning to Make.
pub fn path(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\0' | '\n' | '\r' => return Err(malformed("path", text)),
            ' ' => out.push_str("\\ "),
            '$' => out.push_str("$$"),
            '#' => out.push_str("\\#"),
            ':' => out.push_str("\\:"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Escapes a flag or define for variable-value position. Only `$` and `#`
/// are special there; spaces separate arguments on purpose.
pub fn value(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\0' | '\n' | '\r' => return Err(malformed("value", text)),
            '$' => out.push_str("$$"),
            '#' => out.push_str("\\#"),
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Quotes a path for recipe (shell) position. Make only expands `$` on
/// recipe lines; the single quotes keep the shell from splitting or
/// expanding the rest.
pub fn shell(text: &str) -> Result<String> {
    if text.contains(['\0', '\n', '\r', '\'']) {
        return Err(malformed("path", text));
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '$' => out.push_str("$$"),
            c => out.push(c),
        }
    }
    out.push('\'');
    Ok(out)
}

fn malformed(what: &'static str, text: &str) -> GenError {
    GenError::MalformedIdentifier {
        what: Cow::Borrowed(what),
        text: String::from(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_stays_one_token() {
        assert_eq!(path("my file.c").unwrap(), "my\\ file.c");
    }

    #[test]
    fn test_metacharacters() {
        assert_eq!(path("a$b").unwrap(), "a$$b");
        assert_eq!(path("a#b").unwrap(), "a\\#b");
        assert_eq!(path("c:/x").unwrap(), "c\\:/x");
        assert_eq!(path("a\\b").unwrap(), "a\\\\b");
    }

    #[test]
    fn test_newline_is_malformed() {
        assert!(matches!(
            path("a\nb"),
            Err(GenError::MalformedIdentifier { .. })
        ));
        assert!(matches!(
            value("a\rb"),
            Err(GenError::MalformedIdentifier { .. })
        ));
    }

    #[test]
    fn test_value_keeps_spaces() {
        assert_eq!(value("-DNAME=\"x y\"").unwrap(), "-DNAME=\"x y\"");
        assert_eq!(value("-DPRICE=$2").unwrap(), "-DPRICE=$$2");
    }

    #[test]
    fn test_shell_quotes() {
        assert_eq!(shell("bin/my app").unwrap(), "'bin/my app'");
        assert_eq!(shell("a$b").unwrap(), "'a$$b'");
        assert!(shell("don't").is_err());
    }
}

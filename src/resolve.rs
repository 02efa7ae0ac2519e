//! Name to identifier resolution.
//!
//! Names are matched case-insensitively. When several objects share a name
//! the first one listed by the API wins.

use crate::asana::Resource;
use crate::error::ResolveError;

/// Find the object named `name` among `candidates`.
pub fn by_name<'a>(
    candidates: &'a [Resource],
    kind: &'static str,
    name: &str,
) -> Result<&'a Resource, ResolveError> {
    let wanted = name.trim().to_uppercase();
    candidates
        .iter()
        .find(|c| c.name.trim().to_uppercase() == wanted)
        .ok_or_else(|| ResolveError::NotFound {
            kind,
            name: name.to_string(),
        })
}

/// Same as [`by_name`], returning only the identifier.
pub fn id_by_name(
    candidates: &[Resource],
    kind: &'static str,
    name: &str,
) -> Result<String, ResolveError> {
    by_name(candidates, kind, name).map(|r| r.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<Resource> {
        vec![
            Resource::new("1", "House"),
            Resource::new("2", "Pets"),
            Resource::new("3", "pets"),
        ]
    }

    #[test]
    fn test_case_insensitive_match() {
        let sections = sections();
        assert_eq!(id_by_name(&sections, "section", "HOUSE").unwrap(), "1");
        assert_eq!(id_by_name(&sections, "section", " house ").unwrap(), "1");
    }

    #[test]
    fn test_first_match_wins() {
        let sections = sections();
        assert_eq!(by_name(&sections, "section", "PETS").unwrap().id, "2");
    }

    #[test]
    fn test_not_found() {
        let sections = sections();
        assert_eq!(
            by_name(&sections, "section", "Garden"),
            Err(ResolveError::NotFound {
                kind: "section",
                name: "Garden".to_string(),
            })
        );
    }
}

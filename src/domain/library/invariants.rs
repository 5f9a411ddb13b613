use super::entity::Library;
use crate::domain::{DomainError, DomainResult};

/// Validates Library invariants
pub fn validate_library(library: &Library) -> DomainResult<()> {
    if library.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Library name cannot be empty".to_string(),
        ));
    }

    if !library.path.is_absolute() {
        return Err(DomainError::InvariantViolation(format!(
            "Library path must be absolute: {:?}",
            library.path
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GamePlatform;
    use std::path::PathBuf;

    #[test]
    fn test_valid_library() {
        let path = std::env::current_dir().unwrap();
        let library = Library::new("Games".to_string(), path, GamePlatform::Pc);
        assert!(validate_library(&library).is_ok());
    }

    #[test]
    fn test_empty_name_fails() {
        let path = std::env::current_dir().unwrap();
        let library = Library::new(" ".to_string(), path, GamePlatform::Pc);
        assert!(validate_library(&library).is_err());
    }

    #[test]
    fn test_relative_path_fails() {
        let library = Library::new("Games".to_string(), PathBuf::from("games"), GamePlatform::Pc);
        assert!(validate_library(&library).is_err());
    }
}

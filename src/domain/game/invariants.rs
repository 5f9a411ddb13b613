use super::entity::Game;
use crate::domain::{DomainError, DomainResult};

/// Validates all Game invariants
pub fn validate_game(game: &Game) -> DomainResult<()> {
    validate_name(&game.info.name)?;
    validate_path(game)?;
    Ok(())
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Game name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_path(game: &Game) -> DomainResult<()> {
    if !game.path.is_absolute() {
        return Err(DomainError::InvariantViolation(format!(
            "Game path must be absolute: {:?}",
            game.path
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GamePlatform, UnifiedGameInfo};
    use std::path::PathBuf;

    fn info(name: &str) -> UnifiedGameInfo {
        UnifiedGameInfo {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_game() {
        let mut path = std::env::current_dir().unwrap();
        path.push("Deus Ex");

        let game = Game::new(info("Deus Ex"), path, GamePlatform::Pc);
        assert!(validate_game(&game).is_ok());
    }

    #[test]
    fn test_empty_name_fails() {
        let mut path = std::env::current_dir().unwrap();
        path.push("nameless");

        let game = Game::new(info("  "), path, GamePlatform::Pc);
        assert!(validate_game(&game).is_err());
    }

    #[test]
    fn test_relative_path_fails() {
        let game = Game::new(info("Thief"), PathBuf::from("games/Thief"), GamePlatform::Pc);

        let result = validate_game(&game);
        if let Err(DomainError::InvariantViolation(msg)) = result {
            assert!(msg.contains("must be absolute"));
        } else {
            panic!("Expected InvariantViolation error");
        }
    }
}

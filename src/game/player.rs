use super::board::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    Human,
    Ai,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Human => Player::Ai,
            Player::Ai => Player::Human,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Human => Cell::Human,
            Player::Ai => Cell::Ai,
        }
    }

    /// Code used for this player in the AI service's grid.
    pub fn wire_code(self) -> u8 {
        match self {
            Player::Human => 1,
            Player::Ai => 2,
        }
    }

    pub fn from_wire_code(code: u8) -> Option<Player> {
        match code {
            1 => Some(Player::Human),
            2 => Some(Player::Ai),
            _ => None,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Human => "Human",
            Player::Ai => "AI",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::Human.other(), Player::Ai);
        assert_eq!(Player::Ai.other(), Player::Human);
    }

    #[test]
    fn test_player_name() {
        assert_eq!(Player::Human.name(), "Human");
        assert_eq!(Player::Ai.name(), "AI");
    }

    #[test]
    fn test_wire_code() {
        assert_eq!(Player::Ai.wire_code(), 2);
        assert_eq!(Player::from_wire_code(1), Some(Player::Human));
        assert_eq!(Player::from_wire_code(0), None);
        assert_eq!(Player::from_wire_code(3), None);
    }
}

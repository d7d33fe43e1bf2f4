/// Tile types and their symbols.
/// The grid stores `Tile`, the view asks for `symbol()`, so the
/// character legend lives here and nowhere else.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Floor,
}

/// Symbol for a cell with no generated tile (off-map or not yet generated).
pub const BLANK: char = ' ';

/// Symbol drawn at the player's position.
pub const PLAYER: char = '@';

impl Tile {
    /// Interpret a generator callback value: nonzero = wall, zero = floor.
    pub fn from_value(value: u8) -> Self {
        if value != 0 { Tile::Wall } else { Tile::Floor }
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Wall  => '#',
            Tile::Floor => '.',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_values_are_walls() {
        assert_eq!(Tile::from_value(0), Tile::Floor);
        assert_eq!(Tile::from_value(1), Tile::Wall);
        assert_eq!(Tile::from_value(2), Tile::Wall);
    }

    #[test]
    fn legend() {
        assert_eq!(Tile::Wall.symbol(), '#');
        assert_eq!(Tile::Floor.symbol(), '.');
    }
}

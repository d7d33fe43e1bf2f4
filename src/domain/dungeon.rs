/// Dungeon state holder.
///
/// `DungeonState` is an immutable snapshot: a sparse tile grid plus the
/// level counter. `DungeonStore` owns the current snapshot and replaces it
/// wholesale on `generate()`; the grid is never patched in place.
///
/// ## Strategy by level parity
///   - even level → `Strategy::Uniform` (rooms joined by corridors)
///   - odd level  → `Strategy::Digger`  (corridor digging)
///
/// The level counter starts at 1, so the first regeneration digs.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use rand::Rng;

use crate::config::DungeonConfig;

use super::geom::Point;
use super::mapgen::{Digger, DiggerOptions, MapGenerator, Uniform, UniformOptions};
use super::tile::{self, Tile};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    Uniform,
    Digger,
}

impl Strategy {
    pub fn for_level(level: u32) -> Self {
        if level % 2 == 0 { Strategy::Uniform } else { Strategy::Digger }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Uniform => f.write_str("uniform"),
            Strategy::Digger => f.write_str("digger"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DungeonState {
    pub tiles: HashMap<Point, Tile>,
    pub level: u32,
}

impl DungeonState {
    pub fn tile_at(&self, p: Point) -> Option<Tile> {
        self.tiles.get(&p).copied()
    }

    /// Symbol for a cell; cells outside the generated grid are blank.
    pub fn symbol_at(&self, p: Point) -> char {
        self.tile_at(p).map_or(tile::BLANK, Tile::symbol)
    }
}

impl Default for DungeonState {
    fn default() -> Self {
        DungeonState { tiles: HashMap::new(), level: 1 }
    }
}

pub struct DungeonStore<R> {
    state: Rc<DungeonState>,
    config: DungeonConfig,
    rng: R,
}

impl<R: Rng> DungeonStore<R> {
    pub fn new(config: DungeonConfig, rng: R) -> Self {
        DungeonStore { state: Rc::new(DungeonState::default()), config, rng }
    }

    pub fn state(&self) -> &Rc<DungeonState> {
        &self.state
    }

    /// Build a fresh grid with the strategy for the current level, then
    /// install it together with `level + 1`. Returns the strategy used.
    pub fn generate(&mut self) -> Strategy {
        let strategy = Strategy::for_level(self.state.level);
        let size = self.config.map_size;
        let c = &self.config;

        let mut tiles = HashMap::with_capacity((size * size).max(0) as usize);
        let record = |x: i32, y: i32, value: u8| {
            tiles.insert(Point::new(x, y), Tile::from_value(value));
        };

        match strategy {
            Strategy::Uniform => {
                let options = UniformOptions {
                    room_width: c.room_width,
                    room_height: c.room_height,
                    room_dug_percentage: c.room_dug_percentage,
                    max_attempts: c.max_attempts,
                };
                Uniform::new(size, size, options).create(&mut self.rng, record);
            }
            Strategy::Digger => {
                let options = DiggerOptions {
                    room_width: c.room_width,
                    room_height: c.room_height,
                    corridor_length: c.corridor_length,
                    dug_percentage: c.dug_percentage,
                    max_iterations: c.max_attempts,
                };
                Digger::new(size, size, options).create(&mut self.rng, record);
            }
        }

        self.state = Rc::new(DungeonState {
            tiles,
            level: self.state.level.saturating_add(1),
        });
        strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store(seed: u64) -> DungeonStore<StdRng> {
        DungeonStore::new(GameConfig::default().dungeon, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn starts_empty_at_level_one() {
        let s = store(0);
        assert_eq!(s.state().level, 1);
        assert!(s.state().tiles.is_empty());
        assert_eq!(s.state().symbol_at(Point::new(0, 0)), ' ');
    }

    #[test]
    fn strategy_follows_level_parity() {
        assert_eq!(Strategy::for_level(1), Strategy::Digger);
        assert_eq!(Strategy::for_level(2), Strategy::Uniform);
        assert_eq!(Strategy::for_level(3), Strategy::Digger);
        assert_eq!(Strategy::for_level(10), Strategy::Uniform);
    }

    #[test]
    fn generate_advances_level_and_alternates() {
        let mut s = store(1);
        assert_eq!(s.generate(), Strategy::Digger);
        assert_eq!(s.state().level, 2);
        assert_eq!(s.generate(), Strategy::Uniform);
        assert_eq!(s.state().level, 3);
        assert_eq!(s.generate(), Strategy::Digger);
        assert_eq!(s.state().level, 4);
    }

    #[test]
    fn generated_grid_covers_the_whole_map() {
        let mut s = store(2);
        for _ in 0..2 {
            s.generate();
            let st = s.state();
            assert_eq!(st.tiles.len(), 15 * 15);
            for x in 0..15 {
                for y in 0..15 {
                    let sym = st.symbol_at(Point::new(x, y));
                    assert!(sym == '#' || sym == '.', "({x},{y}) = {sym:?}");
                }
            }
            assert_eq!(st.symbol_at(Point::new(15, 0)), ' ');
            assert_eq!(st.symbol_at(Point::new(-1, 3)), ' ');
        }
    }

    #[test]
    fn regeneration_replaces_snapshot_wholesale() {
        let mut s = store(3);
        s.generate();
        let before = Rc::clone(s.state());
        s.generate();
        assert!(!Rc::ptr_eq(&before, s.state()));
        // Previous snapshot is untouched
        assert_eq!(before.level, 2);
        assert_eq!(before.tiles.len(), 225);
    }

    #[test]
    fn seeded_stores_agree() {
        let mut a = store(77);
        let mut b = store(77);
        a.generate();
        b.generate();
        assert_eq!(a.state().tiles, b.state().tiles);
    }
}

/// Session: the two state holders for one run of the game.
///
/// Built once at startup and handed by reference to whatever needs to read
/// or mutate state (the action layer mutates, the renderer reads
/// snapshots). Assembly goes through `SessionBuilder`, which refuses to
/// produce a session missing either holder, so a misassembled front end
/// fails before the first frame rather than on first access.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::domain::dungeon::DungeonStore;
use crate::domain::geom::Point;
use crate::domain::player::{PlayerState, PlayerStore};
use crate::error::{GameError, Result};

pub struct Session<R = StdRng> {
    dungeon: DungeonStore<R>,
    player: PlayerStore,
    start: Point,
}

impl<R: Rng> Session<R> {
    pub fn builder() -> SessionBuilder<R> {
        SessionBuilder { dungeon: None, player: None }
    }

    pub fn dungeon(&self) -> &DungeonStore<R> {
        &self.dungeon
    }

    pub fn dungeon_mut(&mut self) -> &mut DungeonStore<R> {
        &mut self.dungeon
    }

    pub fn player(&self) -> &PlayerStore {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerStore {
        &mut self.player
    }

    /// Where the player stood when the session was built.
    pub fn start(&self) -> Point {
        self.start
    }
}

impl Session<StdRng> {
    /// Standard assembly from config. A configured seed makes every level
    /// reproducible; otherwise the generator is seeded from the OS.
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        let rng = match config.dungeon.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let p = &config.player;
        let player = PlayerState::new(Point::new(p.start_x, p.start_y), p.lives, p.max_lives);

        Session::builder()
            .dungeon(DungeonStore::new(config.dungeon.clone(), rng))
            .player(PlayerStore::new(player))
            .build()
    }
}

pub struct SessionBuilder<R> {
    dungeon: Option<DungeonStore<R>>,
    player: Option<PlayerStore>,
}

impl<R: Rng> SessionBuilder<R> {
    pub fn dungeon(mut self, dungeon: DungeonStore<R>) -> Self {
        self.dungeon = Some(dungeon);
        self
    }

    pub fn player(mut self, player: PlayerStore) -> Self {
        self.player = Some(player);
        self
    }

    pub fn build(self) -> Result<Session<R>> {
        let dungeon = self.dungeon.ok_or(GameError::MissingState("dungeon"))?;
        let player = self.player.ok_or(GameError::MissingState("player"))?;
        let start = player.state().position;
        Ok(Session { dungeon, player, start })
    }
}

/// Player state holder.
///
/// `PlayerState` is an immutable snapshot. `PlayerStore` owns the current
/// snapshot and swaps in a fresh `Rc` on every mutation, so a consumer can
/// detect change with `Rc::ptr_eq` instead of comparing fields.
///
/// All operations are total:
///   - position is never clamped (walking off the map or into walls is allowed)
///   - lives saturate into `[0, max_lives]`

use std::rc::Rc;

use super::geom::Point;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub position: Point,
    pub lives: u32,
    pub max_lives: u32,
}

impl PlayerState {
    /// `lives` is clamped to `max_lives` on construction.
    pub fn new(position: Point, lives: u32, max_lives: u32) -> Self {
        PlayerState { position, lives: lives.min(max_lives), max_lives }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        PlayerState::new(Point::new(0, 0), 3, 5)
    }
}

pub struct PlayerStore {
    state: Rc<PlayerState>,
}

impl PlayerStore {
    pub fn new(initial: PlayerState) -> Self {
        PlayerStore { state: Rc::new(initial) }
    }

    /// Current snapshot. Cloning the `Rc` is how the view keeps a reference
    /// to what it last drew.
    pub fn state(&self) -> &Rc<PlayerState> {
        &self.state
    }

    /// Relative move. No bounds or collision checks.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let position = self.state.position.offset(dx, dy);
        self.replace(|s| s.position = position);
    }

    /// Absolute move.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.replace(|s| s.position = Point::new(x, y));
    }

    pub fn lose_life(&mut self) {
        let lives = self.state.lives.saturating_sub(1);
        self.replace(|s| s.lives = lives);
    }

    pub fn gain_life(&mut self) {
        let lives = self.state.lives.saturating_add(1).min(self.state.max_lives);
        self.replace(|s| s.lives = lives);
    }

    // ── Internal ──

    fn replace(&mut self, edit: impl FnOnce(&mut PlayerState)) {
        let mut next = PlayerState::clone(&self.state);
        edit(&mut next);
        self.state = Rc::new(next);
    }
}

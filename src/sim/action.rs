/// Actions: the only way input reaches the state holders.
///
/// One button press = one `Action` = one synchronous state change and one
/// `GameEvent`. Every action is total; there is no failure path.

use rand::Rng;

use crate::domain::geom::Direction;
use super::event::GameEvent;
use super::session::Session;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Move(Direction),
    ReturnToStart,
    Regenerate,
    LoseLife,
    GainLife,
}

pub fn apply<R: Rng>(session: &mut Session<R>, action: Action) -> GameEvent {
    match action {
        Action::Move(dir) => {
            let from = session.player().state().position;
            let (dx, dy) = dir.delta();
            session.player_mut().move_by(dx, dy);
            let to = session.player().state().position;
            tracing::debug!(?dir, %from, %to, "player moved");
            GameEvent::PlayerMoved { from, to }
        }
        Action::ReturnToStart => {
            let from = session.player().state().position;
            let to = session.start();
            session.player_mut().set_position(to.x, to.y);
            tracing::debug!(%from, %to, "player returned to start");
            GameEvent::PlayerMoved { from, to }
        }
        Action::Regenerate => {
            let strategy = session.dungeon_mut().generate();
            let level = session.dungeon().state().level;
            tracing::info!(depth = level, %strategy, "generated new level");
            GameEvent::LevelGenerated { level, strategy }
        }
        Action::LoseLife => {
            session.player_mut().lose_life();
            let lives = session.player().state().lives;
            tracing::info!(lives, "life lost");
            GameEvent::LifeLost { lives }
        }
        Action::GainLife => {
            session.player_mut().gain_life();
            let lives = session.player().state().lives;
            tracing::info!(lives, "life gained");
            GameEvent::LifeGained { lives }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::dungeon::Strategy;
    use crate::domain::geom::Point;
    use rand::rngs::StdRng;

    fn session() -> Session<StdRng> {
        let cfg = GameConfig::parse("[dungeon]\nseed = 11\n").unwrap();
        Session::from_config(&cfg).unwrap()
    }

    #[test]
    fn directions_move_by_one_cell() {
        let mut s = session();
        let cases = [
            (Direction::Down, Point::new(0, 1)),
            (Direction::Right, Point::new(1, 1)),
            (Direction::Up, Point::new(1, 0)),
            (Direction::Left, Point::new(0, 0)),
            (Direction::Left, Point::new(-1, 0)),
        ];
        for (dir, expected) in cases {
            let ev = apply(&mut s, Action::Move(dir));
            assert!(matches!(ev, GameEvent::PlayerMoved { to, .. } if to == expected), "{dir:?}");
            assert_eq!(s.player().state().position, expected);
        }
    }

    #[test]
    fn return_to_start_after_wandering() {
        let cfg = GameConfig::parse("[dungeon]\nseed = 3\n[player]\nstart_x = 5\nstart_y = 5\n").unwrap();
        let mut s = Session::from_config(&cfg).unwrap();
        for _ in 0..12 { apply(&mut s, Action::Move(Direction::Left)); }
        assert_eq!(s.player().state().position, Point::new(-7, 5));

        let ev = apply(&mut s, Action::ReturnToStart);
        assert_eq!(ev, GameEvent::PlayerMoved { from: Point::new(-7, 5), to: Point::new(5, 5) });
        assert_eq!(s.player().state().position, Point::new(5, 5));
    }

    #[test]
    fn first_regeneration_digs_and_reaches_level_two() {
        let mut s = session();
        let ev = apply(&mut s, Action::Regenerate);
        assert_eq!(ev, GameEvent::LevelGenerated { level: 2, strategy: Strategy::Digger });
        let ev = apply(&mut s, Action::Regenerate);
        assert_eq!(ev, GameEvent::LevelGenerated { level: 3, strategy: Strategy::Uniform });
    }

    #[test]
    fn zero_sized_rooms_in_config_still_generate() {
        let cfg = GameConfig::parse(
            "[dungeon]\nseed = 1\nroom_width = [0, 0]\nroom_height = [-3, 2]\ncorridor_length = [0, 0]\n",
        ).unwrap();
        let mut s = Session::from_config(&cfg).unwrap();
        for level in 2..=5 {
            let ev = apply(&mut s, Action::Regenerate);
            assert!(matches!(ev, GameEvent::LevelGenerated { level: l, .. } if l == level));
        }
    }

    #[test]
    fn moving_past_the_coordinate_limit_saturates() {
        let cfg = GameConfig::parse("[dungeon]\nseed = 1\n[player]\nstart_x = 2147483647\n").unwrap();
        let mut s = Session::from_config(&cfg).unwrap();
        apply(&mut s, Action::Move(Direction::Right));
        assert_eq!(s.player().state().position, Point::new(i32::MAX, 0));
    }

    #[test]
    fn regeneration_does_not_move_the_player() {
        let mut s = session();
        apply(&mut s, Action::Move(Direction::Right));
        apply(&mut s, Action::Regenerate);
        assert_eq!(s.player().state().position, Point::new(1, 0));
    }

    #[test]
    fn life_actions_saturate() {
        let mut s = session();
        for _ in 0..5 { apply(&mut s, Action::LoseLife); }
        assert_eq!(apply(&mut s, Action::LoseLife), GameEvent::LifeLost { lives: 0 });
        for _ in 0..9 { apply(&mut s, Action::GainLife); }
        assert_eq!(apply(&mut s, Action::GainLife), GameEvent::LifeGained { lives: 5 });
    }
}

/// Viewport: the fixed window of the map drawn around the player.
///
/// The window is `2 * radius + 1` cells square. Its top-left corner is the
/// player's position minus the radius, clamped per axis into
/// `[0, map_size - window]`, so the window stays on the map even when the
/// player has wandered off it. The player is drawn at their raw position,
/// which may therefore lie outside the window.

use crate::config::ViewConfig;
use crate::domain::dungeon::DungeonState;
use crate::domain::geom::Point;
use crate::domain::player::PlayerState;
use crate::domain::tile;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Viewport {
    /// World X of the top-left visible cell
    pub x: i32,
    /// World Y of the top-left visible cell
    pub y: i32,
    /// Cells per side
    pub size: i32,
}

impl Viewport {
    pub fn around(target: Point, view: &ViewConfig) -> Self {
        let size = view.window();
        let max_start = view.map_size - size;
        let clamp = |v: i32| v.saturating_sub(view.radius).min(max_start).max(0);
        Viewport { x: clamp(target.x), y: clamp(target.y), size }
    }

    /// World coordinates of the cells in row `vy`, left to right.
    pub fn row(&self, vy: i32) -> impl Iterator<Item = Point> + '_ {
        (0..self.size).map(move |vx| Point::new(self.x + vx, self.y + vy))
    }
}

/// Render the window as text rows: `@` at the player's exact position,
/// otherwise the tile symbol, blank where no tile exists.
pub fn render_rows(dungeon: &DungeonState, player: &PlayerState, view: &ViewConfig) -> Vec<String> {
    let vp = Viewport::around(player.position, view);
    (0..vp.size)
        .map(|vy| {
            vp.row(vy)
                .map(|p| if p == player.position { tile::PLAYER } else { dungeon.symbol_at(p) })
                .collect::<String>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::domain::tile::Tile;

    fn view() -> ViewConfig {
        ViewConfig { radius: 4, map_size: 15 }
    }

    fn player_at(x: i32, y: i32) -> PlayerState {
        PlayerState::new(Point::new(x, y), 3, 5)
    }

    /// 15x15 map: wall border, floor inside.
    fn boxed() -> DungeonState {
        let mut tiles = HashMap::new();
        for x in 0..15 {
            for y in 0..15 {
                let edge = x == 0 || y == 0 || x == 14 || y == 14;
                tiles.insert(Point::new(x, y), if edge { Tile::Wall } else { Tile::Floor });
            }
        }
        DungeonState { tiles, level: 2 }
    }

    #[test]
    fn window_clamped_at_origin() {
        let vp = Viewport::around(Point::new(0, 0), &view());
        assert_eq!((vp.x, vp.y, vp.size), (0, 0, 9));
    }

    #[test]
    fn window_clamped_at_far_corner() {
        let vp = Viewport::around(Point::new(14, 14), &view());
        assert_eq!((vp.x, vp.y), (6, 6));
    }

    #[test]
    fn window_centred_in_the_middle() {
        let vp = Viewport::around(Point::new(7, 5), &view());
        assert_eq!((vp.x, vp.y), (3, 1));
    }

    #[test]
    fn axes_clamp_independently() {
        let vp = Viewport::around(Point::new(-20, 9), &view());
        assert_eq!((vp.x, vp.y), (0, 5));
        let vp = Viewport::around(Point::new(100, -3), &view());
        assert_eq!((vp.x, vp.y), (6, 0));
    }

    #[test]
    fn map_smaller_than_window_pins_to_origin() {
        let small = ViewConfig { radius: 4, map_size: 5 };
        let vp = Viewport::around(Point::new(3, 3), &small);
        assert_eq!((vp.x, vp.y), (0, 0));
    }

    #[test]
    fn rows_have_fixed_shape() {
        let rows = render_rows(&boxed(), &player_at(7, 7), &view());
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.chars().count() == 9));
    }

    #[test]
    fn player_marker_overrides_tile() {
        let rows = render_rows(&boxed(), &player_at(0, 0), &view());
        assert_eq!(rows[0], "@########");
        assert_eq!(rows[1], "#........");
    }

    #[test]
    fn player_in_the_middle_of_the_window() {
        let rows = render_rows(&boxed(), &player_at(7, 7), &view());
        assert_eq!(rows[4], "....@....");
        assert_eq!(rows[0], ".........");
    }

    #[test]
    fn far_corner_window_shows_border() {
        let rows = render_rows(&boxed(), &player_at(14, 14), &view());
        assert_eq!(rows[8], "########@");
        assert_eq!(rows[0], "........#");
    }

    #[test]
    fn missing_tiles_render_blank() {
        let empty = DungeonState::default();
        let rows = render_rows(&empty, &player_at(2, 1), &view());
        assert_eq!(rows[1], "  @      ");
        assert_eq!(rows[0], " ".repeat(9));
    }

    #[test]
    fn player_outside_window_is_not_drawn() {
        let rows = render_rows(&boxed(), &player_at(-3, -3), &view());
        assert!(rows.iter().all(|r| !r.contains('@')));
        assert_eq!(rows[0], "#########");
    }
}

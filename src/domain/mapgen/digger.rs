/// Corridor-digging generator.
///
/// Starts with one room around the map centre and grows the dungeon
/// outward. Each iteration:
///   1. Pick a candidate wall (priority walls first, see `Corridor::priority_walls`)
///   2. Derive the digging direction: the wall must have exactly one open
///      neighbour, and digging proceeds away from it
///   3. Try up to `FEATURE_ATTEMPTS` random rooms/corridors at that wall
///
/// Stops once `dug_percentage` of the interior is open and no priority
/// walls remain, when candidates run out, or after `max_iterations`.

use std::collections::BTreeMap;

use rand::seq::IteratorRandom;
use rand::Rng;

use super::feature::{Corridor, Room};
use super::{Cells, MapGenerator, Span, FLOOR, WALL};

const FEATURE_ATTEMPTS: u32 = 20;

const DIRS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

#[derive(Clone, Debug)]
pub struct DiggerOptions {
    pub room_width: Span,
    pub room_height: Span,
    pub corridor_length: Span,
    pub dug_percentage: f64,
    pub max_iterations: u32,
}

impl Default for DiggerOptions {
    fn default() -> Self {
        DiggerOptions {
            room_width: [3, 9],
            room_height: [3, 5],
            corridor_length: [3, 10],
            dug_percentage: 0.2,
            max_iterations: 1000,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum WallKind {
    Candidate,
    Priority,
}

/// Map under construction plus the bookkeeping the dig loop needs.
struct Excavation {
    cells: Cells,
    walls: BTreeMap<(i32, i32), WallKind>,
    dug: usize,
}

impl Excavation {
    fn dig(&mut self, x: i32, y: i32, value: u8) {
        self.cells.set(x, y, value);
        if value == FLOOR {
            self.dug += 1;
        } else {
            self.walls.insert((x, y), WallKind::Candidate);
        }
    }

    fn priority_count(&self) -> usize {
        self.walls.values().filter(|&&k| k == WallKind::Priority).count()
    }

    /// Take a random wall out of the candidate set, priority walls first.
    fn take_wall<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(i32, i32)> {
        let kind = if self.priority_count() > 0 { WallKind::Priority } else { WallKind::Candidate };
        let picked = self.walls.iter()
            .filter(|&(_, &k)| k == kind)
            .map(|(&p, _)| p)
            .choose(rng)?;
        self.walls.remove(&picked);
        Some(picked)
    }

    /// Direction to dig from wall `(cx, cy)`: away from its single open
    /// neighbour. None on the border or with zero or several open neighbours.
    fn digging_direction(&self, cx: i32, cy: i32) -> Option<(i32, i32)> {
        let (w, h) = (self.cells.width(), self.cells.height());
        if cx <= 0 || cy <= 0 || cx >= w - 1 || cy >= h - 1 {
            return None;
        }
        let mut open = None;
        for (dx, dy) in DIRS {
            if self.cells.get(cx + dx, cy + dy) == Some(FLOOR) {
                if open.is_some() {
                    return None;
                }
                open = Some((dx, dy));
            }
        }
        open.map(|(dx, dy)| (-dx, -dy))
    }

    /// Forget candidate walls near a freshly attached feature.
    fn remove_surrounding_walls(&mut self, cx: i32, cy: i32) {
        for (dx, dy) in DIRS {
            self.walls.remove(&(cx + dx, cy + dy));
            self.walls.remove(&(cx + 2 * dx, cy + 2 * dy));
        }
    }
}

pub struct Digger {
    width: i32,
    height: i32,
    options: DiggerOptions,
}

impl Digger {
    pub fn new(width: i32, height: i32, options: DiggerOptions) -> Self {
        Digger { width, height, options }
    }

    fn first_room<R: Rng + ?Sized>(&self, ex: &mut Excavation, rng: &mut R) {
        let room = Room::random_around(
            self.width / 2, self.height / 2,
            self.options.room_width, self.options.room_height,
            rng,
        )
        .clamped(self.width, self.height);
        if room.left <= room.right && room.top <= room.bottom {
            room.dig(|x, y, v| ex.dig(x, y, v));
        }
    }

    fn try_feature<R: Rng + ?Sized>(
        &self, ex: &mut Excavation, x: i32, y: i32, dx: i32, dy: i32, rng: &mut R,
    ) -> bool {
        let o = &self.options;
        if rng.gen_bool(0.5) {
            let room = Room::random_at(x, y, dx, dy, o.room_width, o.room_height, rng);
            if !room.is_valid(&ex.cells) {
                return false;
            }
            room.dig(|x, y, v| ex.dig(x, y, v));
        } else {
            let mut corridor = Corridor::random_at(x, y, dx, dy, o.corridor_length, rng);
            if !corridor.is_valid(&ex.cells) {
                return false;
            }
            corridor.dig(|x, y, v| ex.dig(x, y, v));
            for wall in corridor.priority_walls() {
                ex.walls.insert(wall, WallKind::Priority);
            }
        }
        true
    }
}

impl MapGenerator for Digger {
    fn create<R, F>(&mut self, rng: &mut R, callback: F)
    where
        R: Rng + ?Sized,
        F: FnMut(i32, i32, u8),
    {
        let mut ex = Excavation {
            cells: Cells::filled(self.width, self.height, WALL),
            walls: BTreeMap::new(),
            dug: 0,
        };
        let area = ex.cells.interior_area().max(1) as f64;

        self.first_room(&mut ex, rng);

        for _ in 0..self.options.max_iterations {
            let density_reached = ex.dug as f64 / area >= self.options.dug_percentage;
            if density_reached && ex.priority_count() == 0 {
                break;
            }
            let Some((x, y)) = ex.take_wall(rng) else { break };
            let Some((dx, dy)) = ex.digging_direction(x, y) else { continue };

            for _ in 0..FEATURE_ATTEMPTS {
                if self.try_feature(&mut ex, x, y, dx, dy, rng) {
                    ex.remove_surrounding_walls(x, y);
                    ex.remove_surrounding_walls(x - dx, y - dy);
                    break;
                }
            }
        }

        ex.cells.emit(callback);
    }
}

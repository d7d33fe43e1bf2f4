/// Room-based generator.
///
/// Scatters non-overlapping rooms until `room_dug_percentage` of the
/// interior is open, then links each room to its nearest already-linked
/// neighbour with an L-shaped corridor. A layout with fewer than two rooms
/// is thrown away and retried, up to `max_attempts` times.

use rand::seq::SliceRandom;
use rand::Rng;

use super::feature::Room;
use super::{Cells, MapGenerator, Span, FLOOR, WALL};

/// Consecutive failed placements before a layout stops adding rooms.
const ROOM_ATTEMPTS: u32 = 20;

#[derive(Clone, Debug)]
pub struct UniformOptions {
    pub room_width: Span,
    pub room_height: Span,
    pub room_dug_percentage: f64,
    pub max_attempts: u32,
}

impl Default for UniformOptions {
    fn default() -> Self {
        UniformOptions {
            room_width: [3, 9],
            room_height: [3, 5],
            room_dug_percentage: 0.1,
            max_attempts: 300,
        }
    }
}

pub struct Uniform {
    width: i32,
    height: i32,
    options: UniformOptions,
}

impl Uniform {
    pub fn new(width: i32, height: i32, options: UniformOptions) -> Self {
        Uniform { width, height, options }
    }

    /// Place rooms on a solid map. Returns them in placement order.
    fn place_rooms<R: Rng + ?Sized>(&self, cells: &mut Cells, rng: &mut R) -> Vec<Room> {
        let area = cells.interior_area().max(1) as f64;
        let mut rooms = Vec::new();
        let mut dug = 0usize;

        while let Some(room) = self.place_room(cells, rng) {
            dug += ((room.right - room.left + 1) * (room.bottom - room.top + 1)) as usize;
            rooms.push(room);
            if dug as f64 / area > self.options.room_dug_percentage {
                break;
            }
        }
        rooms
    }

    fn place_room<R: Rng + ?Sized>(&self, cells: &mut Cells, rng: &mut R) -> Option<Room> {
        for _ in 0..ROOM_ATTEMPTS {
            let room = Room::random_in(
                self.width, self.height,
                self.options.room_width, self.options.room_height,
                rng,
            );
            if room.is_valid(cells) {
                room.dig(|x, y, v| cells.set(x, y, v));
                return Some(room);
            }
        }
        None
    }

    fn connect_rooms<R: Rng + ?Sized>(cells: &mut Cells, rooms: &[Room], rng: &mut R) {
        let Some((first, rest)) = rooms.split_first() else { return };
        let mut pending: Vec<Room> = rest.to_vec();
        pending.shuffle(rng);

        let mut linked = vec![*first];
        for room in pending {
            let (cx, cy) = room.center();
            let nearest = linked.iter()
                .min_by_key(|r| {
                    let (ox, oy) = r.center();
                    (ox - cx).abs() + (oy - cy).abs()
                })
                .map(|r| r.center())
                .unwrap_or((cx, cy));
            carve_elbow(cells, (cx, cy), nearest, rng.gen_bool(0.5));
            linked.push(room);
        }
    }
}

impl MapGenerator for Uniform {
    fn create<R, F>(&mut self, rng: &mut R, callback: F)
    where
        R: Rng + ?Sized,
        F: FnMut(i32, i32, u8),
    {
        let attempts = self.options.max_attempts.max(1);
        let mut cells = Cells::filled(self.width, self.height, WALL);

        for attempt in 1..=attempts {
            let rooms = self.place_rooms(&mut cells, rng);
            Self::connect_rooms(&mut cells, &rooms, rng);
            if rooms.len() >= 2 || attempt == attempts {
                break;
            }
            cells = Cells::filled(self.width, self.height, WALL);
        }

        cells.emit(callback);
    }
}

/// Open an L-shaped path between two interior points.
/// `horizontal_first` picks which leg is dug from `from`.
fn carve_elbow(cells: &mut Cells, from: (i32, i32), to: (i32, i32), horizontal_first: bool) {
    let corner = if horizontal_first { (to.0, from.1) } else { (from.0, to.1) };
    carve_line(cells, from, corner);
    carve_line(cells, corner, to);
}

fn carve_line(cells: &mut Cells, a: (i32, i32), b: (i32, i32)) {
    let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
    let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
    for x in x0..=x1 {
        for y in y0..=y1 {
            if x > 0 && y > 0 && x + 1 < cells.width() && y + 1 < cells.height() {
                cells.set(x, y, FLOOR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapgen::testutil::{border_is_wall, collect, floor_is_connected};

    fn small_rooms() -> UniformOptions {
        UniformOptions {
            room_width: [3, 6],
            room_height: [3, 6],
            ..UniformOptions::default()
        }
    }

    #[test]
    fn reports_every_cell_once() {
        let mut g = Uniform::new(15, 15, small_rooms());
        let (map, calls) = collect(&mut g, 1);
        assert_eq!(calls, 225);
        assert_eq!(map.len(), 225);
        assert!(map.values().all(|&v| v == WALL || v == FLOOR));
    }

    #[test]
    fn layout_is_walled_and_connected() {
        for seed in 0..20 {
            let mut g = Uniform::new(15, 15, small_rooms());
            let (map, _) = collect(&mut g, seed);
            assert!(border_is_wall(&map, 15, 15), "seed {seed}");
            assert!(floor_is_connected(&map), "seed {seed}");
            assert!(map.values().any(|&v| v == FLOOR), "seed {seed}");
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let (a, _) = collect(&mut Uniform::new(15, 15, small_rooms()), 42);
        let (b, _) = collect(&mut Uniform::new(15, 15, small_rooms()), 42);
        assert_eq!(a, b);
    }

    #[test]
    fn elbow_links_two_points() {
        let mut cells = Cells::filled(10, 10, WALL);
        carve_elbow(&mut cells, (2, 2), (7, 6), true);
        // Horizontal leg then vertical leg
        for x in 2..=7 { assert_eq!(cells.get(x, 2), Some(FLOOR)); }
        for y in 2..=6 { assert_eq!(cells.get(7, y), Some(FLOOR)); }
        assert!(cells.is_wall(2, 6));
    }

    #[test]
    fn tiny_map_still_reports_every_cell() {
        let mut g = Uniform::new(4, 4, small_rooms());
        let (map, calls) = collect(&mut g, 9);
        assert_eq!(calls, 16);
        assert!(border_is_wall(&map, 4, 4));
    }
}

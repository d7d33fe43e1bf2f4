/// Dungeon features: rectangular rooms and straight corridors.
///
/// A feature is first checked against the current map (`is_valid`) and
/// only then carved (`dig`). Carving goes through a callback so the
/// generator can track what was dug.

use rand::Rng;

use super::{roll, Cells, Span, FLOOR, WALL};

// ── Room ──

/// Room interior is `left..=right × top..=bottom`; the ring one cell
/// outside it is the room's wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    door: Option<(i32, i32)>,
}

impl Room {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Room { left, top, right, bottom, door: None }
    }

    /// Random room placed anywhere in a map of the given size.
    pub fn random_in<R: Rng + ?Sized>(
        map_w: i32, map_h: i32, width: Span, height: Span, rng: &mut R,
    ) -> Self {
        let w = roll(rng, width);
        let h = roll(rng, height);
        let left = 1 + rng.gen_range(0..(map_w - w - 1).max(1));
        let top = 1 + rng.gen_range(0..(map_h - h - 1).max(1));
        Room::new(left, top, left + w - 1, top + h - 1)
    }

    /// Random room that contains `(cx, cy)`.
    pub fn random_around<R: Rng + ?Sized>(
        cx: i32, cy: i32, width: Span, height: Span, rng: &mut R,
    ) -> Self {
        let w = roll(rng, width);
        let h = roll(rng, height);
        let left = cx - rng.gen_range(0..w);
        let top = cy - rng.gen_range(0..h);
        Room::new(left, top, left + w - 1, top + h - 1)
    }

    /// Random room behind the wall cell `(x, y)`, extending in `(dx, dy)`.
    /// `(x, y)` becomes the room's door.
    pub fn random_at<R: Rng + ?Sized>(
        x: i32, y: i32, dx: i32, dy: i32, width: Span, height: Span, rng: &mut R,
    ) -> Self {
        let w = roll(rng, width);
        let h = roll(rng, height);
        let mut room = if dx == 1 {
            let top = y - rng.gen_range(0..h);
            Room::new(x + 1, top, x + w, top + h - 1)
        } else if dx == -1 {
            let top = y - rng.gen_range(0..h);
            Room::new(x - w, top, x - 1, top + h - 1)
        } else if dy == 1 {
            let left = x - rng.gen_range(0..w);
            Room::new(left, y + 1, left + w - 1, y + h)
        } else {
            let left = x - rng.gen_range(0..w);
            Room::new(left, y - h, left + w - 1, y - 1)
        };
        room.door = Some((x, y));
        room
    }

    /// Shrink the room so it and its wall ring stay inside the map.
    pub fn clamped(self, map_w: i32, map_h: i32) -> Self {
        Room {
            left: self.left.max(1),
            top: self.top.max(1),
            right: self.right.min(map_w - 2),
            bottom: self.bottom.min(map_h - 2),
            door: self.door,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    fn on_ring(&self, x: i32, y: i32) -> bool {
        x == self.left - 1 || x == self.right + 1 || y == self.top - 1 || y == self.bottom + 1
    }

    /// The wall ring must be all wall, the interior all diggable wall.
    pub fn is_valid(&self, cells: &Cells) -> bool {
        if self.left > self.right || self.top > self.bottom {
            return false;
        }
        for x in self.left - 1..=self.right + 1 {
            for y in self.top - 1..=self.bottom + 1 {
                let ok = if self.on_ring(x, y) {
                    cells.is_wall(x, y)
                } else {
                    cells.can_be_dug(x, y)
                };
                if !ok { return false; }
            }
        }
        true
    }

    pub fn dig<F: FnMut(i32, i32, u8)>(&self, mut dig: F) {
        for x in self.left - 1..=self.right + 1 {
            for y in self.top - 1..=self.bottom + 1 {
                let value = if self.door == Some((x, y)) {
                    FLOOR
                } else if self.on_ring(x, y) {
                    WALL
                } else {
                    FLOOR
                };
                dig(x, y, value);
            }
        }
    }
}

// ── Corridor ──

/// Straight corridor from `start` to `end` inclusive.
#[derive(Clone, Copy, Debug)]
pub struct Corridor {
    start: (i32, i32),
    end: (i32, i32),
    dir: (i32, i32),
    ends_with_wall: bool,
}

impl Corridor {
    /// `start` and `end` must share a row or a column.
    pub fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        let dir = ((end.0 - start.0).signum(), (end.1 - start.1).signum());
        Corridor { start, end, dir, ends_with_wall: false }
    }

    pub fn random_at<R: Rng + ?Sized>(
        x: i32, y: i32, dx: i32, dy: i32, length: Span, rng: &mut R,
    ) -> Self {
        let len = roll(rng, length);
        Corridor::new((x, y), (x + dx * len, y + dy * len))
    }

    fn step(&self) -> (i32, i32) {
        self.dir
    }

    fn len(&self) -> i32 {
        1 + (self.end.0 - self.start.0).abs().max((self.end.1 - self.start.1).abs())
    }

    /// Check the corridor against the map, cutting it short at the first
    /// cell that cannot be dug or whose sides are not wall.
    ///
    /// Rejected when nothing remains, when a one-cell stub would dead-end
    /// in a wall, or when it dead-ends next to an open diagonal.
    pub fn is_valid(&mut self, cells: &Cells) -> bool {
        let (sx, sy) = self.start;
        let (dx, dy) = self.step();
        // Perpendicular
        let (nx, ny) = (dy, -dx);

        let mut len = self.len();
        for i in 0..len {
            let (x, y) = (sx + i * dx, sy + i * dy);
            let ok = cells.can_be_dug(x, y)
                && cells.is_wall(x + nx, y + ny)
                && cells.is_wall(x - nx, y - ny);
            if !ok {
                len = i;
                self.end = (x - dx, y - dy);
                break;
            }
        }

        if len == 0 {
            return false;
        }
        let (ex, ey) = self.end;
        if len == 1 && cells.is_wall(ex + dx, ey + dy) {
            return false;
        }

        let first_corner_bad = !cells.is_wall(ex + dx + nx, ey + dy + ny);
        let second_corner_bad = !cells.is_wall(ex + dx - nx, ey + dy - ny);
        self.ends_with_wall = cells.is_wall(ex + dx, ey + dy);
        !((first_corner_bad || second_corner_bad) && self.ends_with_wall)
    }

    /// Call after a successful `is_valid`.
    pub fn dig<F: FnMut(i32, i32, u8)>(&self, mut dig: F) {
        let (sx, sy) = self.start;
        let (dx, dy) = self.step();
        for i in 0..self.len() {
            dig(sx + i * dx, sy + i * dy, FLOOR);
        }
    }

    /// Walls just past a dead end: preferred spots for the next feature,
    /// so corridors lead somewhere.
    pub fn priority_walls(&self) -> Vec<(i32, i32)> {
        if !self.ends_with_wall {
            return Vec::new();
        }
        let (dx, dy) = self.step();
        let (nx, ny) = (dy, -dx);
        let (x, y) = (self.end.0 + dx, self.end.1 + dy);
        vec![(x, y), (x + nx, y + ny), (x - nx, y - ny)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn solid(w: i32, h: i32) -> Cells {
        Cells::filled(w, h, WALL)
    }

    fn carve(cells: &mut Cells, room: &Room) {
        room.dig(|x, y, v| cells.set(x, y, v));
    }

    #[test]
    fn room_fits_in_solid_map() {
        let cells = solid(10, 10);
        assert!(Room::new(1, 1, 8, 8).is_valid(&cells));
        // Wall ring would land outside the map
        assert!(!Room::new(0, 1, 3, 3).is_valid(&cells));
        assert!(!Room::new(1, 1, 9, 3).is_valid(&cells));
    }

    #[test]
    fn room_dig_leaves_ring_and_opens_interior() {
        let mut cells = solid(7, 7);
        let room = Room::new(2, 2, 4, 4);
        carve(&mut cells, &room);
        for x in 2..=4 {
            for y in 2..=4 {
                assert_eq!(cells.get(x, y), Some(FLOOR));
            }
        }
        assert!(cells.is_wall(1, 3));
        assert!(cells.is_wall(5, 3));
        assert!(cells.is_wall(3, 1));
    }

    #[test]
    fn overlapping_room_rejected() {
        let mut cells = solid(15, 15);
        carve(&mut cells, &Room::new(2, 2, 6, 6));
        assert!(!Room::new(4, 4, 8, 8).is_valid(&cells));
        assert!(Room::new(8, 8, 12, 12).is_valid(&cells));
    }

    #[test]
    fn attached_room_has_door_at_origin() {
        let mut rng = StdRng::seed_from_u64(3);
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let room = Room::random_at(7, 7, dx, dy, [3, 4], [3, 4], &mut rng);
            assert_eq!(room.door, Some((7, 7)));
            // Door sits on the wall ring, not inside the room
            assert!(room.on_ring(7, 7));
            let inside = 7 + dx >= room.left && 7 + dx <= room.right
                && 7 + dy >= room.top && 7 + dy <= room.bottom;
            assert!(inside, "cell past the door must be room interior");
        }
    }

    #[test]
    fn clamped_room_stays_inside() {
        let room = Room::new(-3, 0, 20, 12).clamped(15, 15);
        assert_eq!((room.left, room.top, room.right, room.bottom), (1, 1, 13, 12));
    }

    #[test]
    fn corridor_cut_short_at_map_edge() {
        let cells = solid(10, 10);
        // Heads right from x=5 for 10 cells; x=9 is border
        let mut c = Corridor::new((5, 5), (15, 5));
        assert!(c.is_valid(&cells));
        assert_eq!(c.end, (8, 5));
        assert!(c.ends_with_wall);
        assert_eq!(c.priority_walls(), vec![(9, 5), (9, 4), (9, 6)]);
    }

    #[test]
    fn corridor_into_open_space_has_no_priority_walls() {
        let mut cells = solid(12, 12);
        carve(&mut cells, &Room::new(6, 2, 9, 9));
        let mut c = Corridor::new((2, 5), (5, 5));
        assert!(c.is_valid(&cells));
        assert!(!c.ends_with_wall);
        assert!(c.priority_walls().is_empty());
    }

    #[test]
    fn corridor_with_no_room_is_rejected() {
        let cells = solid(5, 5);
        let mut c = Corridor::new((0, 2), (3, 2));
        assert!(!c.is_valid(&cells));
    }

    #[test]
    fn corridor_dig_opens_each_cell() {
        let mut cells = solid(10, 10);
        let mut c = Corridor::new((2, 3), (2, 6));
        assert!(c.is_valid(&cells));
        c.dig(|x, y, v| cells.set(x, y, v));
        for y in 3..=6 {
            assert_eq!(cells.get(2, y), Some(FLOOR));
        }
        assert!(cells.is_wall(2, 7));
    }
}

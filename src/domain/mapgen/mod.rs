/// Dungeon layout generators.
///
/// Two strategies behind one contract: build a `width × height` map in
/// memory, then report every cell exactly once through the `create`
/// callback as `(x, y, value)`, nonzero = wall, zero = floor.
///
///   - `Uniform`: scattered rectangular rooms joined by corridors
///   - `Digger`:  rooms and corridors grown outward from a central room
///
/// The outer border is always wall and all floor cells are 4-connected.

mod digger;
mod feature;
mod uniform;

pub use digger::{Digger, DiggerOptions};
pub use uniform::{Uniform, UniformOptions};

use rand::Rng;

pub(crate) const WALL: u8 = 1;
pub(crate) const FLOOR: u8 = 0;

/// Inclusive `[min, max]` range used for room and corridor sizes.
pub type Span = [i32; 2];

pub trait MapGenerator {
    fn create<R, F>(&mut self, rng: &mut R, callback: F)
    where
        R: Rng + ?Sized,
        F: FnMut(i32, i32, u8);
}

/// Pick a value in a span. Reversed spans are accepted.
pub(crate) fn roll<R: Rng + ?Sized>(rng: &mut R, span: Span) -> i32 {
    let (lo, hi) = (span[0].min(span[1]), span[0].max(span[1]));
    rng.gen_range(lo..=hi)
}

// ── Cells: the in-memory map both generators carve ──

#[derive(Clone, Debug)]
pub(crate) struct Cells {
    width: i32,
    height: i32,
    data: Vec<u8>,
}

impl Cells {
    pub fn filled(width: i32, height: i32, value: u8) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Cells { width, height, data: vec![value; (width * height) as usize] }
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if self.in_bounds(x, y) {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if self.in_bounds(x, y) {
            self.data[(y * self.width + x) as usize] = value;
        }
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(WALL)
    }

    /// Wall strictly inside the outer border.
    pub fn can_be_dug(&self, x: i32, y: i32) -> bool {
        x > 0 && y > 0 && x + 1 < self.width && y + 1 < self.height && self.is_wall(x, y)
    }

    /// Number of cells strictly inside the outer border.
    pub fn interior_area(&self) -> usize {
        ((self.width - 2).max(0) * (self.height - 2).max(0)) as usize
    }

    /// Report every cell, column by column.
    pub fn emit<F: FnMut(i32, i32, u8)>(&self, mut callback: F) {
        for x in 0..self.width {
            for y in 0..self.height {
                callback(x, y, self.data[(y * self.width + x) as usize]);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::{HashMap, VecDeque};

    use super::{MapGenerator, FLOOR, WALL};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Run a generator and collect its callback output.
    pub fn collect<G: MapGenerator>(generator: &mut G, seed: u64) -> (HashMap<(i32, i32), u8>, usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut out = HashMap::new();
        let mut calls = 0;
        generator.create(&mut rng, |x, y, v| {
            calls += 1;
            out.insert((x, y), v);
        });
        (out, calls)
    }

    pub fn border_is_wall(map: &HashMap<(i32, i32), u8>, w: i32, h: i32) -> bool {
        (0..w).all(|x| map[&(x, 0)] == WALL && map[&(x, h - 1)] == WALL)
            && (0..h).all(|y| map[&(0, y)] == WALL && map[&(w - 1, y)] == WALL)
    }

    /// True when every floor cell is 4-reachable from every other.
    pub fn floor_is_connected(map: &HashMap<(i32, i32), u8>) -> bool {
        let floors: Vec<(i32, i32)> = map.iter()
            .filter(|(_, v)| **v == FLOOR)
            .map(|(&p, _)| p)
            .collect();
        let Some(&start) = floors.first() else { return true };

        let mut seen = std::collections::HashSet::new();
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let n = (x + dx, y + dy);
                if map.get(&n) == Some(&FLOOR) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == floors.len()
    }
}

pub mod dungeon;
pub mod geom;
pub mod mapgen;
pub mod player;
pub mod tile;

/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::mapgen::Span;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub dungeon: DungeonConfig,
    pub player: PlayerConfig,
    pub view: ViewConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct DungeonConfig {
    pub map_size: i32,
    pub room_width: Span,
    pub room_height: Span,
    pub corridor_length: Span,
    pub dug_percentage: f64,       // digger: stop once this share of the interior is open
    pub room_dug_percentage: f64,  // uniform: stop adding rooms past this share
    pub max_attempts: u32,         // bound on generator retries/iterations
    pub seed: Option<u64>,
    pub generate_on_start: bool,
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub start_x: i32,
    pub start_y: i32,
    pub lives: u32,
    pub max_lives: u32,
}

#[derive(Clone, Debug)]
pub struct ViewConfig {
    pub radius: i32,
    /// Conceptual map extent the window is clamped against.
    pub map_size: i32,
}

impl ViewConfig {
    pub fn window(&self) -> i32 {
        2 * self.radius + 1
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub regenerate: Vec<String>,
    pub return_to_start: Vec<String>,
    pub lose_life: Vec<String>,
    pub gain_life: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    dungeon: TomlDungeon,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    view: TomlView,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlDungeon {
    #[serde(default = "default_map_size")]
    map_size: u32,
    #[serde(default = "default_room_span")]
    room_width: Span,
    #[serde(default = "default_room_span")]
    room_height: Span,
    #[serde(default = "default_corridor_length")]
    corridor_length: Span,
    #[serde(default = "default_dug_percentage")]
    dug_percentage: f64,
    #[serde(default = "default_room_dug_percentage")]
    room_dug_percentage: f64,
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_true")]
    generate_on_start: bool,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default)]
    start_x: i32,
    #[serde(default)]
    start_y: i32,
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_max_lives")]
    max_lives: u32,
}

#[derive(Deserialize, Debug)]
struct TomlView {
    #[serde(default = "default_radius")]
    radius: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_regenerate")]
    regenerate: Vec<String>,
    #[serde(default = "default_return_to_start")]
    return_to_start: Vec<String>,
    #[serde(default = "default_lose_life")]
    lose_life: Vec<String>,
    #[serde(default = "default_gain_life")]
    gain_life: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

const MIN_MAP_SIZE: u32 = 5;
const MAX_MAP_SIZE: u32 = 256;
const MAX_RADIUS: u32 = 64;

fn default_map_size() -> u32 { 15 }
fn default_room_span() -> Span { [3, 6] }
fn default_corridor_length() -> Span { [2, 5] }
fn default_dug_percentage() -> f64 { 0.2 }
fn default_room_dug_percentage() -> f64 { 0.1 }
fn default_max_attempts() -> u32 { 1000 }
fn default_true() -> bool { true }
fn default_lives() -> u32 { 3 }
fn default_max_lives() -> u32 { 5 }
fn default_radius() -> u32 { 4 }   // 9x9 window

fn default_regenerate() -> Vec<String> { vec!["A".into()] }
fn default_return_to_start() -> Vec<String> { vec!["Start".into()] }
fn default_lose_life() -> Vec<String> { vec!["L1".into()] }
fn default_gain_life() -> Vec<String> { vec!["R1".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlDungeon {
    fn default() -> Self {
        TomlDungeon {
            map_size: default_map_size(),
            room_width: default_room_span(),
            room_height: default_room_span(),
            corridor_length: default_corridor_length(),
            dug_percentage: default_dug_percentage(),
            room_dug_percentage: default_room_dug_percentage(),
            max_attempts: default_max_attempts(),
            seed: None,
            generate_on_start: true,
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            start_x: 0,
            start_y: 0,
            lives: default_lives(),
            max_lives: default_max_lives(),
        }
    }
}

impl Default for TomlView {
    fn default() -> Self {
        TomlView { radius: default_radius() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            regenerate: default_regenerate(),
            return_to_start: default_return_to_start(),
            lose_life: default_lose_life(),
            gain_life: default_gain_life(),
            quit: default_quit(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    /// Parse config text. Keys that are absent take their defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(t: TomlConfig) -> Self {
        let map_size = t.dungeon.map_size.clamp(MIN_MAP_SIZE, MAX_MAP_SIZE) as i32;
        let radius = t.view.radius.min(MAX_RADIUS) as i32;
        let interior = map_size - 2;

        GameConfig {
            dungeon: DungeonConfig {
                map_size,
                room_width: sanitize_span(t.dungeon.room_width, interior),
                room_height: sanitize_span(t.dungeon.room_height, interior),
                corridor_length: sanitize_span(t.dungeon.corridor_length, interior),
                dug_percentage: t.dungeon.dug_percentage.clamp(0.0, 1.0),
                room_dug_percentage: t.dungeon.room_dug_percentage.clamp(0.0, 1.0),
                max_attempts: t.dungeon.max_attempts,
                seed: t.dungeon.seed,
                generate_on_start: t.dungeon.generate_on_start,
            },
            player: PlayerConfig {
                start_x: t.player.start_x,
                start_y: t.player.start_y,
                lives: t.player.lives.min(t.player.max_lives),
                max_lives: t.player.max_lives,
            },
            view: ViewConfig { radius, map_size },
            gamepad: GamepadConfig {
                regenerate: t.gamepad.regenerate,
                return_to_start: t.gamepad.return_to_start,
                lose_life: t.gamepad.lose_life,
                gain_life: t.gamepad.gain_life,
                quit: t.gamepad.quit,
            },
        }
    }
}

/// Order a span and pull both bounds into `1..=max`; the generators
/// sample from it and cannot take an empty or non-positive range.
fn sanitize_span(span: Span, max: i32) -> Span {
    let (lo, hi) = (span[0].min(span[1]), span[0].max(span[1]));
    [lo.clamp(1, max), hi.clamp(1, max)]
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!("config.toml parse error: {e}; using default settings");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                tracing::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}

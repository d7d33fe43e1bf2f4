/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// A frame is only composed at all when something it shows has changed:
/// a new dungeon or player snapshot, a new message, or a terminal resize.

use std::io::{self, BufWriter, Write};
use std::rc::Rc;

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::ViewConfig;
use crate::domain::dungeon::DungeonState;
use crate::domain::player::PlayerState;
use crate::domain::tile;
use super::viewport;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the gap
    /// between rows matches the cell colour on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Paint a whole row as a bar, then write `s` on it.
    fn put_bar(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', fg, bg));
        }
        self.put_str(0, y, s, fg, bg);
    }
}

// ── Layout ──

/// Each map cell = 2 terminal columns, so the map reads roughly square.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const POS_ROW: usize = 1;
const HINT_ROW: usize = 2;
const BOX_TOP: usize = 4;
const MAP_ROW: usize = BOX_TOP + 1;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const FRAME_FG: Color = Color::Rgb { r: 90, g: 90, b: 120 };

const HELP: &str = " Arrows/WASD:Move  H:Start  G/Enter:Generate  -/+:Lives  Q/Esc:Quit";

/// Everything one frame shows.
pub struct Frame<'a> {
    pub dungeon: &'a Rc<DungeonState>,
    pub player: &'a Rc<PlayerState>,
    pub message: &'a str,
}

fn tile_colors(ch: char) -> (Color, Color) {
    match ch {
        tile::PLAYER => (Color::Rgb { r: 255, g: 220, b: 50 }, Color::Reset),
        '#' => (Color::Rgb { r: 150, g: 150, b: 160 }, Color::Rgb { r: 60, g: 60, b: 75 }),
        '.' => (Color::Rgb { r: 90, g: 90, b: 110 }, Color::Reset),
        _ => (Color::White, Color::Reset),
    }
}

/// Build the full screen for `frame` into `buf`.
fn compose(buf: &mut FrameBuffer, frame: &Frame<'_>, view: &ViewConfig) {
    let d = frame.dungeon;
    let p = frame.player;

    // ── HUD ──
    let hud = format!(" Level: {}    Lives: {}/{} ", d.level, p.lives, p.max_lives);
    buf.put_bar(HUD_ROW, &hud, Color::White, HUD_BG);
    let pos = format!(" Player Position: {}", p.position);
    buf.put_str(0, POS_ROW, &pos, Color::White, Color::Reset);
    buf.put_str(0, HINT_ROW, " [G] Generate New Level", Color::Rgb { r: 80, g: 255, b: 80 }, Color::Reset);

    // ── Map box ──
    let rows = viewport::render_rows(d, p, view);
    let inner = rows.len() * CELL_W;
    let edge: String = std::iter::once('+')
        .chain(std::iter::repeat('-').take(inner))
        .chain(std::iter::once('+'))
        .collect();
    buf.put_str(0, BOX_TOP, &edge, FRAME_FG, Color::Reset);

    for (vy, line) in rows.iter().enumerate() {
        let row = MAP_ROW + vy;
        buf.set(0, row, Cell::new('|', FRAME_FG, Color::Reset));
        for (vx, ch) in line.chars().enumerate() {
            let (fg, bg) = tile_colors(ch);
            let col = 1 + vx * CELL_W;
            buf.set(col, row, Cell::new(ch, fg, bg));
            buf.set(col + 1, row, Cell::new(' ', fg, bg));
        }
        buf.set(1 + inner, row, Cell::new('|', FRAME_FG, Color::Reset));
    }
    let bottom = MAP_ROW + rows.len();
    buf.put_str(0, bottom, &edge, FRAME_FG, Color::Reset);

    // ── Message bar ──
    let msg_row = bottom + 1;
    if !frame.message.is_empty() {
        let msg = format!(" * {} ", frame.message);
        buf.put_bar(msg_row, &msg, Color::Black, MSG_BG);
    }

    // ── Help bar ──
    buf.put_str(0, msg_row + 1, HELP, Color::DarkGrey, Color::Reset);
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    view: ViewConfig,
    // Snapshots last drawn; identity, not contents, decides a redraw.
    shown_dungeon: Option<Rc<DungeonState>>,
    shown_player: Option<Rc<PlayerState>>,
    shown_message: String,
}

impl Renderer {
    pub fn new(view: ViewConfig) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            view,
            shown_dungeon: None,
            shown_player: None,
            shown_message: String::new(),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back != front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let resized = tw as usize != self.term_w || th as usize != self.term_h;
        if resized {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if !resized && self.is_current(frame) {
            return Ok(());
        }

        self.front.clear();
        compose(&mut self.front, frame, &self.view);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        self.mark_shown(frame);
        Ok(())
    }

    fn is_current(&self, frame: &Frame<'_>) -> bool {
        fn same<T>(shown: &Option<Rc<T>>, now: &Rc<T>) -> bool {
            shown.as_ref().is_some_and(|s| Rc::ptr_eq(s, now))
        }
        same(&self.shown_dungeon, frame.dungeon)
            && same(&self.shown_player, frame.player)
            && self.shown_message == frame.message
    }

    fn mark_shown(&mut self, frame: &Frame<'_>) {
        self.shown_dungeon = Some(Rc::clone(frame.dungeon));
        self.shown_player = Some(Rc::clone(frame.player));
        if self.shown_message != frame.message {
            self.shown_message = frame.message.to_owned();
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal's own default and leave line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::domain::geom::Point;
    use crate::domain::tile::Tile;

    fn view() -> ViewConfig {
        ViewConfig { radius: 4, map_size: 15 }
    }

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect::<String>().trim_end().to_owned()
    }

    fn walled_dungeon() -> Rc<DungeonState> {
        let mut tiles = HashMap::new();
        for x in 0..15 {
            for y in 0..15 {
                tiles.insert(Point::new(x, y), Tile::Wall);
            }
        }
        Rc::new(DungeonState { tiles, level: 4 })
    }

    #[test]
    fn hud_shows_level_position_and_lives() {
        let dungeon = walled_dungeon();
        let player = Rc::new(PlayerState::new(Point::new(3, 2), 2, 5));
        let mut buf = FrameBuffer::new(100, 30);
        compose(&mut buf, &Frame { dungeon: &dungeon, player: &player, message: "" }, &view());

        assert!(row_text(&buf, HUD_ROW).contains("Level: 4"));
        assert!(row_text(&buf, HUD_ROW).contains("Lives: 2/5"));
        assert_eq!(row_text(&buf, POS_ROW), " Player Position: (3, 2)");
        assert!(row_text(&buf, HINT_ROW).contains("Generate New Level"));
    }

    #[test]
    fn map_box_holds_the_viewport() {
        let dungeon = walled_dungeon();
        let player = Rc::new(PlayerState::new(Point::new(0, 0), 3, 5));
        let mut buf = FrameBuffer::new(100, 30);
        compose(&mut buf, &Frame { dungeon: &dungeon, player: &player, message: "hello" }, &view());

        assert_eq!(row_text(&buf, BOX_TOP), format!("+{}+", "-".repeat(18)));
        assert_eq!(row_text(&buf, MAP_ROW), "|@ # # # # # # # # |");
        assert_eq!(row_text(&buf, MAP_ROW + 9), format!("+{}+", "-".repeat(18)));
        assert_eq!(row_text(&buf, MAP_ROW + 10), " * hello");
        assert!(row_text(&buf, MAP_ROW + 11).contains("Generate"));
    }

    #[test]
    fn empty_dungeon_draws_blank_map() {
        let dungeon = Rc::new(DungeonState::default());
        let player = Rc::new(PlayerState::default());
        let mut buf = FrameBuffer::new(100, 30);
        compose(&mut buf, &Frame { dungeon: &dungeon, player: &player, message: "" }, &view());

        assert_eq!(row_text(&buf, MAP_ROW + 1), format!("|{}|", " ".repeat(18)));
        assert!(row_text(&buf, HUD_ROW).contains("Level: 1"));
    }

    #[test]
    fn narrow_terminal_clips_instead_of_panicking() {
        let dungeon = walled_dungeon();
        let player = Rc::new(PlayerState::default());
        let mut buf = FrameBuffer::new(6, 3);
        compose(&mut buf, &Frame { dungeon: &dungeon, player: &player, message: "x" }, &view());
        assert_eq!(row_text(&buf, HUD_ROW), " Level");
    }

    #[test]
    fn redraw_only_on_new_snapshots_or_message() {
        let dungeon = walled_dungeon();
        let player = Rc::new(PlayerState::default());
        let mut r = Renderer::new(view());

        let frame = Frame { dungeon: &dungeon, player: &player, message: "" };
        assert!(!r.is_current(&frame));
        r.mark_shown(&frame);
        assert!(r.is_current(&frame));

        // Equal contents, new snapshot: still a change
        let moved = Rc::new((*player).clone());
        assert!(!r.is_current(&Frame { dungeon: &dungeon, player: &moved, message: "" }));
        assert!(!r.is_current(&Frame { dungeon: &dungeon, player: &player, message: "new" }));
    }
}

//! GameView: lays a [`GameSnapshot`] (and the shared-session panel) out on a
//! [`Canvas`].
//!
//! Pure: no terminal I/O happens here, so layouts are unit-testable.

use crate::canvas::{block_color, Canvas, Rgb, Style};
use crate::core::{GamePiece, GameSnapshot, MultiplayerSnapshot};
use crate::types::{LifeStatus, PIECE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// UI-side state that is not part of the game itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    /// Aim cursor on the main grid
    pub aim: Option<(u8, u8)>,
    /// Countdown left, `0.0..=1.0`
    pub timer_fraction: f32,
    pub high_score: u32,
    /// Open chat prompt contents
    pub chat_prompt: Option<&'a str>,
    pub status: Option<&'a str>,
}

const FRAME: Style = Style::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
const WELL: Style = Style::new(Rgb::new(70, 70, 80), Rgb::new(25, 25, 35));
const LABEL: Style = Style::new(Rgb::new(150, 150, 170), Rgb::new(0, 0, 0));
const VALUE: Style = Style::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
const AIM: Style = Style::new(Rgb::new(255, 255, 255), Rgb::new(90, 90, 110)).bold();

/// Terminal layout of the game screen
pub struct GameView {
    cell_w: u16,
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Wide cells offset the tall terminal glyph aspect.
        Self {
            cell_w: 4,
            cell_h: 2,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Size of the main grid including its frame.
    pub fn board_extent(&self, snap: &GameSnapshot) -> (u16, u16) {
        (
            snap.cols as u16 * self.cell_w + 2,
            snap.rows as u16 * self.cell_h + 2,
        )
    }

    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        multiplayer: Option<&MultiplayerSnapshot>,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        canvas: &mut Canvas,
    ) {
        canvas.resize(viewport.width, viewport.height);
        canvas.fill(Style::default().glyph(' '));

        self.draw_hud(snap, overlay, canvas);

        let (board_w, board_h) = self.board_extent(snap);
        let board_x = 1;
        let board_y = 2;
        self.draw_board(snap, overlay, board_x, board_y, canvas);
        draw_timer(board_x, board_y + board_h, board_w, snap, overlay, canvas);

        let side_x = board_x + board_w + 2;
        canvas.text(side_x, board_y, "Current", LABEL);
        draw_piece(snap.current, side_x, board_y + 1, canvas);
        let next_y = board_y + 1 + PIECE_SIZE as u16 + 1;
        canvas.text(side_x, next_y, "Next", LABEL);
        draw_piece(snap.following, side_x, next_y + 1, canvas);

        let mut footer_y = board_y + board_h + 2;
        if let Some(multi) = multiplayer {
            let panel_x = side_x + PIECE_SIZE as u16 * 2 + 4;
            draw_leaderboard(multi, panel_x, board_y, canvas);
            let boards_bottom = draw_remote_boards(multi, panel_x, board_y + 8, canvas);
            footer_y = footer_y.max(boards_bottom + 1);

            match overlay.chat_prompt {
                Some(prompt) => {
                    let end = canvas.text(1, footer_y, "> ", VALUE);
                    let end = canvas.text(end, footer_y, prompt, VALUE);
                    canvas.put(end, footer_y, AIM.glyph(' '));
                }
                None => {
                    if let Some(line) = &multi.chat {
                        canvas.text(1, footer_y, line, LABEL);
                    } else {
                        canvas.text(1, footer_y, "Press T to chat", LABEL.dim());
                    }
                }
            }
            footer_y += 1;
        }

        let status = match overlay.status {
            Some(status) => Some(status.to_string()),
            None if snap.is_over() => Some("GAME OVER".to_string()),
            None if !snap.playable() => match multiplayer {
                Some(multi) if multi.pieces_awaited > 0 => {
                    Some(format!("Waiting for {} piece(s)", multi.pieces_awaited))
                }
                _ => Some("Waiting to start".to_string()),
            },
            None => None,
        };
        if let Some(status) = status {
            canvas.text(1, footer_y, &status, VALUE);
        }
    }

    fn draw_hud(&self, snap: &GameSnapshot, overlay: &Overlay<'_>, canvas: &mut Canvas) {
        let mut x = canvas.text(1, 0, "TetrECS", VALUE);
        let high = overlay.high_score.max(snap.score);
        let fields: [(&str, String); 5] = [
            ("Score ", snap.score.to_string()),
            ("Level ", snap.level.to_string()),
            ("Lives ", snap.lives.max(0).to_string()),
            ("x", snap.multiplier.to_string()),
            ("Hi ", high.to_string()),
        ];
        for (label, value) in fields.iter() {
            x = canvas.text(x + 2, 0, label, LABEL);
            x = canvas.text(x, 0, value, VALUE);
        }
    }

    fn draw_board(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        origin_x: u16,
        origin_y: u16,
        canvas: &mut Canvas,
    ) {
        let (w, h) = self.board_extent(snap);
        draw_frame(canvas, origin_x, origin_y, w, h);

        for y in 0..snap.rows {
            for x in 0..snap.cols {
                let style = match block_color(snap.cell(x as i32, y as i32)) {
                    Some(color) => Style::new(color, color),
                    None => WELL,
                };
                let ch = if style == WELL { '·' } else { ' ' };
                self.fill_cell(canvas, origin_x, origin_y, x, y, style, ch);
            }
        }

        let Some((ax, ay)) = overlay.aim else {
            return;
        };
        if let Some(piece) = snap.current {
            for (dx, dy) in piece.occupied_offsets() {
                let (px, py) = (ax as i32 + dx, ay as i32 + dy);
                if px < 0 || py < 0 || px >= snap.cols as i32 || py >= snap.rows as i32 {
                    continue;
                }
                let style = if snap.cell(px, py) == 0 { AIM } else { AIM.dim() };
                self.fill_cell(canvas, origin_x, origin_y, px as u8, py as u8, style, '░');
            }
        }
        self.fill_cell(canvas, origin_x, origin_y, ax, ay, AIM, '▒');
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_cell(
        &self,
        canvas: &mut Canvas,
        origin_x: u16,
        origin_y: u16,
        x: u8,
        y: u8,
        style: Style,
        ch: char,
    ) {
        let px = origin_x + 1 + x as u16 * self.cell_w;
        let py = origin_y + 1 + y as u16 * self.cell_h;
        canvas.fill_rect(px, py, self.cell_w, self.cell_h, style.glyph(ch));
    }
}

fn draw_frame(canvas: &mut Canvas, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    let right = x + w - 1;
    let bottom = y + h - 1;
    canvas.put(x, y, FRAME.glyph('┌'));
    canvas.put(right, y, FRAME.glyph('┐'));
    canvas.put(x, bottom, FRAME.glyph('└'));
    canvas.put(right, bottom, FRAME.glyph('┘'));
    for xx in x + 1..right {
        canvas.put(xx, y, FRAME.glyph('─'));
        canvas.put(xx, bottom, FRAME.glyph('─'));
    }
    for yy in y + 1..bottom {
        canvas.put(x, yy, FRAME.glyph('│'));
        canvas.put(right, yy, FRAME.glyph('│'));
    }
}

fn draw_piece(piece: Option<GamePiece>, x: u16, y: u16, canvas: &mut Canvas) {
    let Some(piece) = piece else {
        canvas.fill_rect(x, y, PIECE_SIZE as u16 * 2, PIECE_SIZE as u16, WELL.glyph('·'));
        return;
    };
    let color = block_color(piece.value()).unwrap_or(Rgb::new(255, 255, 255));
    let filled = Style::new(color, color);
    for i in 0..PIECE_SIZE as u16 {
        for j in 0..PIECE_SIZE as u16 {
            let occupied = piece.is_occupied(i as i32 - 1, j as i32 - 1);
            let glyph = if occupied {
                filled.glyph(' ')
            } else {
                WELL.glyph('·')
            };
            canvas.fill_rect(x + i * 2, y + j, 2, 1, glyph);
        }
    }
    // Centre marker: pieces are placed by their middle cell.
    let centre = if piece.is_occupied(0, 0) {
        Style::new(Rgb::new(0, 0, 0), color).glyph('o')
    } else {
        WELL.glyph('o')
    };
    canvas.put(x + 2, y + 1, centre);
}

fn draw_timer(
    x: u16,
    y: u16,
    width: u16,
    snap: &GameSnapshot,
    overlay: &Overlay<'_>,
    canvas: &mut Canvas,
) {
    if !snap.playable() {
        return;
    }
    let fraction = overlay.timer_fraction.clamp(0.0, 1.0);
    let color = if fraction > 0.5 {
        Rgb::new(0, 200, 0)
    } else if fraction > 0.25 {
        Rgb::new(230, 200, 0)
    } else {
        Rgb::new(220, 0, 0)
    };
    let filled = (width as f32 * fraction).round() as u16;
    canvas.fill_rect(x, y, filled, 1, Style::new(color, color).glyph(' '));
}

fn draw_leaderboard(multi: &MultiplayerSnapshot, x: u16, y: u16, canvas: &mut Canvas) {
    canvas.text(x, y, "Leaderboard", LABEL);
    for (rank, entry) in multi.leaderboard.iter().enumerate() {
        let style = match entry.status {
            LifeStatus::Alive => VALUE,
            LifeStatus::Dead => LABEL.dim(),
        };
        let line = format!("{}. {:<12} {:>6}", rank + 1, entry.name, entry.score);
        canvas.text(x, y + 1 + rank as u16, &line, style);
    }
}

/// Mini grids, one cell per glyph pair. Returns the row below the last one drawn.
fn draw_remote_boards(multi: &MultiplayerSnapshot, x: u16, y: u16, canvas: &mut Canvas) -> u16 {
    let mut bottom = y;
    let mut col = x;
    for board in &multi.remote_boards {
        let grid = &board.grid;
        let w = grid.cols() as u16 * 2 + 2;
        let h = grid.rows() as u16 + 2;
        let name: String = board.name.chars().take(w as usize).collect();
        canvas.text(col, y, &name, LABEL);
        draw_frame(canvas, col, y + 1, w, h);
        for gy in 0..grid.rows() {
            for gx in 0..grid.cols() {
                let glyph = match block_color(grid.get(gx as i32, gy as i32)) {
                    Some(color) => Style::new(color, color).glyph(' '),
                    None => WELL.glyph(' '),
                };
                canvas.fill_rect(col + 1 + gx as u16 * 2, y + 2 + gy as u16, 2, 1, glyph);
            }
        }
        bottom = bottom.max(y + 1 + h);
        col += w + 2;
    }
    bottom
}

//! In-memory character canvas plus the block colour palette.

use crate::types::COLOR_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Block colours by cell value; 0 is the empty cell.
pub const BLOCK_PALETTE: [Rgb; COLOR_COUNT as usize] = [
    Rgb::new(0, 0, 0),
    Rgb::new(255, 105, 180),
    Rgb::new(255, 0, 0),
    Rgb::new(255, 140, 0),
    Rgb::new(255, 215, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(173, 255, 47),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 128, 0),
    Rgb::new(0, 100, 0),
    Rgb::new(0, 139, 139),
    Rgb::new(0, 255, 255),
    Rgb::new(135, 206, 250),
    Rgb::new(0, 0, 255),
    Rgb::new(75, 0, 130),
    Rgb::new(148, 0, 211),
];

/// Colour of a cell value, `None` for empty or invalid values.
pub fn block_color(value: i32) -> Option<Rgb> {
    if value <= 0 {
        return None;
    }
    BLOCK_PALETTE.get(value as usize).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        }
    }
}

impl Style {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn glyph(self, ch: char) -> Glyph {
        Glyph { ch, style: self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Default for Glyph {
    fn default() -> Self {
        Style::default().glyph(' ')
    }
}

/// Row-major grid of glyphs sized to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            glyphs: vec![Glyph::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.glyphs.clear();
        self.glyphs
            .resize(width as usize * height as usize, Glyph::default());
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.index(x, y).map(|i| self.glyphs[i])
    }

    /// Writes outside the canvas are dropped.
    pub fn put(&mut self, x: u16, y: u16, glyph: Glyph) {
        if let Some(i) = self.index(x, y) {
            self.glyphs[i] = glyph;
        }
    }

    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, glyph: Glyph) {
        for yy in y..y.saturating_add(h) {
            for xx in x..x.saturating_add(w) {
                self.put(xx, yy, glyph);
            }
        }
    }

    /// Writes `text` from `(x, y)`, clipped at the right edge. Returns the
    /// column after the last character written.
    pub fn text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            self.put(col, y, style.glyph(ch));
            col += 1;
        }
        col
    }

    /// Reads back a row as a string, mostly for tests.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|g| g.ch)
            .collect()
    }
}

//! Pieces module - the 15 block shapes and their rotation
//!
//! Every piece is a 3x3 occupancy pattern indexed `[x][y]`, centred on the
//! middle cell. A piece's colour value is `id + 1`, so value `0` stays free for
//! empty grid cells.
//!
//! Rotation is a pure transform of the instance's own pattern; the shape table
//! is `const` and never mutated.

use std::fmt;

use crate::types::{PIECE_COUNT, PIECE_SIZE};

/// Occupancy pattern, indexed `[x][y]`
pub type Pattern = [[bool; PIECE_SIZE]; PIECE_SIZE];

const X: bool = true;
const O: bool = false;

/// Name and spawn pattern for each piece id
const SHAPES: [(&str, Pattern); PIECE_COUNT as usize] = [
    ("Line", [[O, O, O], [X, X, X], [O, O, O]]),
    ("C", [[O, O, O], [X, X, X], [X, O, X]]),
    ("Plus", [[O, X, O], [X, X, X], [O, X, O]]),
    ("Dot", [[O, O, O], [O, X, O], [O, O, O]]),
    ("Square", [[X, X, O], [X, X, O], [O, O, O]]),
    ("L", [[O, O, O], [X, X, X], [O, O, X]]),
    ("J", [[O, O, X], [X, X, X], [O, O, O]]),
    ("S", [[O, O, O], [X, X, O], [O, X, X]]),
    ("Z", [[O, X, X], [X, X, O], [O, O, O]]),
    ("T", [[X, O, O], [X, X, O], [X, O, O]]),
    ("X", [[X, O, X], [O, X, O], [X, O, X]]),
    ("Corner", [[O, O, O], [X, X, O], [X, O, O]]),
    ("Inverse Corner", [[X, O, O], [X, X, O], [O, O, O]]),
    ("Double", [[O, X, O], [O, X, O], [O, O, O]]),
    ("Triple", [[O, X, O], [O, X, O], [O, X, O]]),
];

/// One spawned piece: id, colour value and its (possibly rotated) pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePiece {
    id: u8,
    pattern: Pattern,
}

impl GamePiece {
    /// Create a fresh piece in spawn orientation; `None` for ids `>= 15`
    pub fn create(id: u8) -> Option<Self> {
        SHAPES.get(id as usize).map(|&(_, pattern)| Self { id, pattern })
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        SHAPES[self.id as usize].0
    }

    /// Colour value written into the grid
    pub fn value(&self) -> i32 {
        self.id as i32 + 1
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Pattern as cell values: `value()` where occupied, `0` elsewhere
    pub fn blocks(&self) -> [[i32; PIECE_SIZE]; PIECE_SIZE] {
        let value = self.value();
        self.pattern
            .map(|column| column.map(|occupied| if occupied { value } else { 0 }))
    }

    /// Whether the pattern cell at offset `(dx, dy)` from the centre is set
    pub fn is_occupied(&self, dx: i32, dy: i32) -> bool {
        let (i, j) = (dx + 1, dy + 1);
        if !(0..PIECE_SIZE as i32).contains(&i) || !(0..PIECE_SIZE as i32).contains(&j) {
            return false;
        }
        self.pattern[i as usize][j as usize]
    }

    /// Offsets `(dx, dy)` in `-1..=1` of every occupied cell
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..PIECE_SIZE).flat_map(move |i| {
            (0..PIECE_SIZE)
                .filter(move |&j| self.pattern[i][j])
                .map(move |j| (i as i32 - 1, j as i32 - 1))
        })
    }

    pub fn block_count(&self) -> usize {
        self.pattern.iter().flatten().filter(|&&cell| cell).count()
    }

    /// Rotate clockwise by `steps` quarter turns; negative steps turn
    /// anticlockwise
    pub fn rotate(&mut self, steps: i32) {
        for _ in 0..steps.rem_euclid(4) {
            self.pattern = rotate_clockwise(&self.pattern);
        }
    }

    /// Rotated copy, leaving `self` untouched
    pub fn rotated(&self, steps: i32) -> Self {
        let mut piece = *self;
        piece.rotate(steps);
        piece
    }
}

impl fmt::Display for GamePiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One clockwise quarter turn: `new[i][j] = old[N-1-j][i]`
pub fn rotate_clockwise(pattern: &Pattern) -> Pattern {
    let mut rotated = [[false; PIECE_SIZE]; PIECE_SIZE];
    for (i, column) in rotated.iter_mut().enumerate() {
        for (j, cell) in column.iter_mut().enumerate() {
            *cell = pattern[PIECE_SIZE - 1 - j][i];
        }
    }
    rotated
}

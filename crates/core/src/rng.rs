//! RNG module - where pieces come from
//!
//! The engine draws pieces through the [`PieceSource`] trait so single-player
//! and multiplayer share one state machine:
//!
//! - [`RandomPieces`]: local, seeded, uniform over the 15 piece ids
//! - [`NetworkPieceQueue`]: FIFO fed by the server, one `PIECE` at a time
//!
//! Also provides a simple LCG for deterministic games and tests.

use std::collections::VecDeque;

use crate::pieces::GamePiece;
use crate::types::{INITIAL_PIECE_FILL, PIECE_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would make the first draws highly regular
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones
        (self.next_u32() >> 16) % max.max(1)
    }
}

/// Supplier of pieces for the engine
pub trait PieceSource {
    /// Take the next piece, or `None` if none is available yet
    fn draw(&mut self) -> Option<GamePiece>;

    /// Whether the engine may start drawing
    fn is_ready(&self) -> bool {
        true
    }
}

/// Uniformly random pieces from a seeded LCG
#[derive(Debug, Clone)]
pub struct RandomPieces {
    rng: SimpleRng,
}

impl RandomPieces {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Seed from the wall clock
    pub fn from_time() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
            .unwrap_or(1);
        Self::new(seed)
    }
}

impl PieceSource for RandomPieces {
    fn draw(&mut self) -> Option<GamePiece> {
        GamePiece::create(self.rng.next_range(PIECE_COUNT as u32) as u8)
    }
}

/// Server-fed piece queue
///
/// The network layer is the only producer and the engine the only consumer.
/// The queue reports ready once [`INITIAL_PIECE_FILL`] ids have arrived in
/// total, so current, following and one lookahead exist before the match
/// starts.
#[derive(Debug, Clone, Default)]
pub struct NetworkPieceQueue {
    queue: VecDeque<u8>,
    received: usize,
}

impl NetworkPieceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue pre-filled with `ids`, skipping invalid ones
    pub fn with_pieces<I: IntoIterator<Item = u8>>(ids: I) -> Self {
        let mut queue = Self::new();
        for id in ids {
            queue.push(id);
        }
        queue
    }

    /// Enqueue one piece id; returns false for ids outside `0..PIECE_COUNT`
    pub fn push(&mut self, id: u8) -> bool {
        if id >= PIECE_COUNT {
            return false;
        }
        self.queue.push_back(id);
        self.received += 1;
        true
    }

    /// Ids waiting to be drawn
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total ids accepted since creation
    pub fn received(&self) -> usize {
        self.received
    }
}

impl PieceSource for NetworkPieceQueue {
    fn draw(&mut self) -> Option<GamePiece> {
        self.queue.pop_front().and_then(GamePiece::create)
    }

    fn is_ready(&self) -> bool {
        self.received >= INITIAL_PIECE_FILL
    }
}

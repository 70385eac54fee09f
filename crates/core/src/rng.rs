//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomizer: each bag holds one of each piece
//! (I, O, T, L, J, S, Z), shuffled with Fisher-Yates. Pieces are handed out
//! first-in first-out; when the queue runs dry a fresh bag is appended.
//!
//! Also provides a simple LCG so tests can pin a sequence.

use std::collections::VecDeque;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state (usable as a seed to replay from here)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece supply
#[derive(Debug, Clone)]
pub struct PieceBag {
    queue: VecDeque<PieceKind>,
    rng: SimpleRng,
    seed: u32,
    bags_dealt: u64,
}

impl PieceBag {
    /// Create a bag with a fixed seed
    pub fn new(seed: u32) -> Self {
        Self {
            queue: VecDeque::with_capacity(PieceKind::ALL.len()),
            rng: SimpleRng::new(seed),
            seed,
            bags_dealt: 0,
        }
    }

    /// Create a bag seeded from the process-wide entropy source
    pub fn from_entropy() -> Self {
        Self::new(fastrand::u32(..))
    }

    fn shuffled_bag(rng: &mut SimpleRng) -> [PieceKind; 7] {
        let mut bag = PieceKind::ALL;
        rng.shuffle(&mut bag);
        bag
    }

    fn refill(&mut self) {
        let bag = Self::shuffled_bag(&mut self.rng);
        self.queue.extend(bag);
        self.bags_dealt += 1;
    }

    /// Draw the next piece, refilling with a new shuffled bag when empty
    pub fn draw_next(&mut self) -> PieceKind {
        if self.queue.is_empty() {
            self.refill();
        }

        match self.queue.pop_front() {
            Some(kind) => kind,
            // refill always pushes seven pieces
            None => PieceKind::ALL[0],
        }
    }

    /// Peek at the piece `draw_next` would return, without consuming it.
    ///
    /// When the queue is empty the next bag is previewed on a cloned RNG, so
    /// the preview always agrees with the following draw.
    pub fn peek(&self) -> PieceKind {
        if let Some(&kind) = self.queue.front() {
            return kind;
        }

        let mut preview_rng = self.rng.clone();
        Self::shuffled_bag(&mut preview_rng)[0]
    }

    /// Pieces left before the next refill
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Number of bags shuffled so far
    pub fn bags_dealt(&self) -> u64 {
        self.bags_dealt
    }

    /// Seed this bag was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Derive a seed for a follow-up game from this bag's RNG
    pub fn fork_seed(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}

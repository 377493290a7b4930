/// Shuffled order of formula indices. Every formula is shown once before any
/// repeats; the order is redrawn when the cursor runs off the end.
#[derive(Clone, Debug)]
pub struct PatternSequence {
    order: Vec<usize>,
    // None until the first advance after a reshuffle.
    cursor: Option<usize>,
}

impl PatternSequence {
    pub fn new(len: usize, rng: &mut fastrand::Rng) -> Self {
        let mut seq = Self {
            order: (0..len.max(1)).collect(),
            cursor: None,
        };
        seq.reshuffle(rng);
        seq
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn reshuffle(&mut self, rng: &mut fastrand::Rng) {
        self.order.sort_unstable();
        rng.shuffle(&mut self.order);
        self.cursor = None;
    }

    pub fn current(&self) -> Option<usize> {
        self.cursor.map(|c| self.order[c])
    }

    pub fn advance(&mut self, rng: &mut fastrand::Rng) -> usize {
        let mut next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.order.len() {
            self.reshuffle(rng);
            next = 0;
        }
        self.cursor = Some(next);
        self.order[next]
    }

    /// Steps back one position, wrapping to the end of the current order.
    /// Nothing has been shown from a fresh order yet, so this is a no-op
    /// returning `None` until the first `advance`.
    pub fn step_back(&mut self) -> Option<usize> {
        let c = self.cursor?;
        let prev = if c > 0 { c - 1 } else { self.order.len() - 1 };
        self.cursor = Some(prev);
        Some(self.order[prev])
    }
}

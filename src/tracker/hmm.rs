//! Hidden Markov model smoothing
//!
//! Raw strongest-signal picks flicker between neighbouring rooms. The forward
//! algorithm over a short observation window yields the most likely current
//! room given how pets usually move through the house.
//!
//! Hidden states and observations share the same index space:
//! rooms 0..=3 followed by outside at index 4.

use super::types::RoomCode;

/// Number of hidden (and observed) states
pub const NUM_STATES: usize = 5;

/// Only the most recent observations are used
pub const MAX_OBSERVATIONS: usize = 30;

type Matrix = [[f64; NUM_STATES]; NUM_STATES];

/// Forward-algorithm model: transitions `a`, emissions `b`, initial `pi`
#[derive(Debug, Clone)]
pub struct RoomModel {
    /// `a[i][j]`: probability of moving from state i to state j
    a: Matrix,
    /// `b[i][k]`: probability of observing k while truly in state i
    b: Matrix,
    pi: [f64; NUM_STATES],
}

impl Default for RoomModel {
    fn default() -> Self {
        Self {
            a: [
                [0.8, 0.12, 0.03, 0.045, 0.005],
                [0.12, 0.8, 0.03, 0.045, 0.005],
                [0.23, 0.14, 0.5, 0.11, 0.02],
                [0.4, 0.24, 0.05, 0.3, 0.01],
                [0.15, 0.02, 0.02, 0.01, 0.8],
            ],
            b: [
                [0.85, 0.02, 0.02, 0.1, 0.01],
                [0.15, 0.8, 0.0, 0.05, 0.0],
                [0.0625, 0.0, 0.9, 0.0375, 0.0],
                [0.025, 0.0, 0.013, 0.95, 0.012],
                [0.05, 0.0, 0.05, 0.0, 0.9],
            ],
            pi: [0.4, 0.4, 0.09, 0.1, 0.01],
        }
    }
}

impl RoomModel {
    /// Most likely room at the last step of `observations`
    ///
    /// Only the trailing [`MAX_OBSERVATIONS`] entries are considered.
    /// Returns `None` for an empty sequence.
    pub fn most_likely(&self, observations: &[RoomCode]) -> Option<RoomCode> {
        let start = observations.len().saturating_sub(MAX_OBSERVATIONS);
        let window = &observations[start..];
        let (first, rest) = window.split_first()?;

        let mut alpha = [0.0; NUM_STATES];
        let o = first.state_index();
        for (j, slot) in alpha.iter_mut().enumerate() {
            *slot = self.pi[j] * self.b[j][o];
        }

        for obs in rest {
            let o = obs.state_index();
            let prev = alpha;
            for (j, slot) in alpha.iter_mut().enumerate() {
                let incoming: f64 = (0..NUM_STATES).map(|i| prev[i] * self.a[i][j]).sum();
                *slot = self.b[j][o] * incoming;
            }
        }

        RoomCode::from_state_index(argmax(&alpha))
    }
}

/// Index of the largest value; the first one wins ties
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

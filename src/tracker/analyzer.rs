//! Room analysis
//!
//! Turns the latest report from every room into a room per pet:
//! 1. strongest signal across rooms wins (outside when no room hears the tag)
//! 2. the pick is smoothed by the HMM over the recent history
//! 3. the smoothed room is credited one time unit

use std::collections::HashMap;

use super::hmm::{RoomModel, MAX_OBSERVATIONS, NUM_STATES};
use super::report::ReportSet;
use super::types::{PetId, PetStatus, RoomCode, RoomTimeDistribution, INDOOR_ROOMS, TOTAL_PETS};

/// Result of one analysis step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Strongest-signal room per pet
    pub strongest: [RoomCode; TOTAL_PETS],
    /// HMM-smoothed room per pet
    pub smoothed: [RoomCode; TOTAL_PETS],
}

/// Stateful analyzer: observation history and time accounting per pet
#[derive(Debug, Clone)]
pub struct Analyzer {
    model: RoomModel,
    /// Lowercase Bluetooth address → pet
    tags: HashMap<String, PetId>,
    observations: [Vec<RoomCode>; TOTAL_PETS],
    time_spent: [[u64; NUM_STATES]; TOTAL_PETS],
    total_time: u64,
    last: [RoomCode; TOTAL_PETS],
}

impl Analyzer {
    /// Create an analyzer tracking the given tag addresses
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = (S, PetId)>,
        S: AsRef<str>,
    {
        Self {
            model: RoomModel::default(),
            tags: tags
                .into_iter()
                .map(|(addr, pet)| (addr.as_ref().to_ascii_lowercase(), pet))
                .collect(),
            observations: Default::default(),
            time_spent: [[0; NUM_STATES]; TOTAL_PETS],
            total_time: 0,
            last: [RoomCode::Outside; TOTAL_PETS],
        }
    }

    /// Strongest-signal room for every pet
    ///
    /// Earlier rooms win ties.
    pub fn strongest_rooms(&self, reports: &ReportSet) -> [RoomCode; TOTAL_PETS] {
        let mut rooms = [RoomCode::Outside; TOTAL_PETS];
        let mut best = [f64::NEG_INFINITY; TOTAL_PETS];

        for (room, report) in RoomCode::INDOOR.iter().zip(reports.iter()) {
            for (address, pet) in &self.tags {
                if let Some(rssi) = report.rssi(address) {
                    let idx = pet.index();
                    if rssi > best[idx] {
                        best[idx] = rssi;
                        rooms[idx] = *room;
                    }
                }
            }
        }

        rooms
    }

    /// Run one analysis step over the latest report set
    pub fn step(&mut self, reports: &ReportSet) -> StepResult {
        let strongest = self.strongest_rooms(reports);
        let mut smoothed = strongest;

        self.total_time += 1;
        for pet in PetId::ALL {
            let idx = pet.index();
            let history = &mut self.observations[idx];
            history.push(strongest[idx]);
            if history.len() > MAX_OBSERVATIONS {
                let excess = history.len() - MAX_OBSERVATIONS;
                history.drain(..excess);
            }

            smoothed[idx] = self.model.most_likely(history).unwrap_or(strongest[idx]);
            self.time_spent[idx][smoothed[idx].state_index()] += 1;
        }
        self.last = smoothed;

        tracing::debug!(
            total_time = self.total_time,
            ?strongest,
            ?smoothed,
            "Analysis step complete"
        );

        StepResult {
            strongest,
            smoothed,
        }
    }

    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    /// Percentage of analysis steps spent in each indoor room
    pub fn time_spent_percentage(&self, pet: PetId) -> RoomTimeDistribution {
        if self.total_time == 0 {
            return RoomTimeDistribution::empty();
        }
        let counts = &self.time_spent[pet.index()];
        let mut values = [0.0; INDOOR_ROOMS];
        for (room, value) in RoomCode::INDOOR.iter().zip(values.iter_mut()) {
            *value = counts[room.state_index()] as f64 / self.total_time as f64 * 100.0;
        }
        // Counts never exceed total_time, so every value is within 0..=100
        RoomTimeDistribution::new(&values).unwrap_or_default()
    }

    /// Current status of a pet
    pub fn status(&self, pet: PetId) -> PetStatus {
        PetStatus {
            room_located: self.last[pet.index()],
            time_spent_percentage: self.time_spent_percentage(pet),
        }
    }
}

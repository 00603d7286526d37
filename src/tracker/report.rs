//! Sensor report parsing
//!
//! A room sensor reports one `address,rssi` pair per line for every tag it
//! currently hears. Recordings used for evaluation concatenate such reports,
//! each preceded by a line holding only the room index.

use std::collections::HashMap;
use std::path::Path;

use super::error::{TrackerError, TrackerResult};
use super::types::{RoomCode, INDOOR_ROOMS};

/// Signal strengths heard by one room sensor, keyed by lowercase Bluetooth address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssiReport {
    readings: HashMap<String, f64>,
}

impl RssiReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a report body
    ///
    /// Blank lines are skipped; any other line must be `address,rssi`.
    pub fn parse(body: &str) -> TrackerResult<Self> {
        let mut report = Self::new();
        for (idx, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (address, rssi) = parse_reading(line, idx + 1)?;
            report.readings.insert(address, rssi);
        }
        Ok(report)
    }

    /// Builder method: add a reading
    pub fn reading(mut self, address: &str, rssi: f64) -> Self {
        self.readings.insert(address.to_ascii_lowercase(), rssi);
        self
    }

    /// RSSI heard for `address`, if any
    pub fn rssi(&self, address: &str) -> Option<f64> {
        self.readings.get(&address.to_ascii_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

fn parse_reading(line: &str, line_no: usize) -> TrackerResult<(String, f64)> {
    let malformed = |reason: &str| TrackerError::MalformedReport {
        line: line_no,
        reason: reason.to_string(),
    };

    let (address, rssi) = line
        .split_once(',')
        .ok_or_else(|| malformed("expected `address,rssi`"))?;
    let address = address.trim();
    if address.is_empty() {
        return Err(malformed("empty address"));
    }
    let rssi: f64 = rssi
        .trim()
        .parse()
        .map_err(|e| malformed(&format!("invalid rssi: {}", e)))?;
    if !rssi.is_finite() {
        return Err(malformed("rssi must be finite"));
    }

    Ok((address.to_ascii_lowercase(), rssi))
}

/// Latest report from every indoor room, indexed by room code
pub type ReportSet = [RssiReport; INDOOR_ROOMS];

/// Parse a recording into complete report sets
///
/// A set is closed once the block for the last indoor room ends. Whatever
/// is left at the end of the file forms a final set.
pub fn parse_recording(text: &str) -> TrackerResult<Vec<ReportSet>> {
    let mut sets = Vec::new();
    let mut current: ReportSet = Default::default();
    let mut room: Option<RoomCode> = None;
    let mut block = RssiReport::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(prev) = room {
                current[prev.state_index()] = std::mem::take(&mut block);
                if prev == RoomCode::Bathroom {
                    sets.push(std::mem::take(&mut current));
                }
            }
            let code: i32 = line.parse().map_err(|_| TrackerError::MalformedReport {
                line: line_no,
                reason: format!("invalid room index `{}`", line),
            })?;
            let next = RoomCode::try_from(code)?;
            if !next.is_indoor() {
                return Err(TrackerError::MalformedReport {
                    line: line_no,
                    reason: format!("room index {} is not an indoor room", code),
                });
            }
            room = Some(next);
        } else {
            if room.is_none() {
                return Err(TrackerError::MalformedReport {
                    line: line_no,
                    reason: "reading before any room index".to_string(),
                });
            }
            let (address, rssi) = parse_reading(line, line_no)?;
            block.readings.insert(address, rssi);
        }
    }

    if let Some(prev) = room {
        current[prev.state_index()] = block;
        sets.push(current);
    }

    Ok(sets)
}

/// Read and parse a recording file
pub fn read_recording(path: &Path) -> TrackerResult<Vec<ReportSet>> {
    let text = std::fs::read_to_string(path)?;
    parse_recording(&text)
}

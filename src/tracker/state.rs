//! Shared tracker state
//!
//! Holds the latest report from every room sensor and the analyzer.
//! Shared between the ingest listener (writer) and HTTP handlers (readers).

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::net::IpAddr;
use tokio::sync::RwLock;

use super::analyzer::{Analyzer, StepResult};
use super::error::{TrackerError, TrackerResult};
use super::report::{ReportSet, RssiReport};
use super::types::{PetId, RoomCode, TrackerSnapshot};

struct Inner {
    reports: ReportSet,
    analyzer: Analyzer,
    updated_at: Option<DateTime<Utc>>,
}

/// Latest reports plus analysis, behind an async lock
pub struct TrackerState {
    /// Sensor address → room it sits in
    sensors: HashMap<IpAddr, RoomCode>,
    inner: RwLock<Inner>,
}

impl TrackerState {
    pub fn new(sensors: HashMap<IpAddr, RoomCode>, analyzer: Analyzer) -> Self {
        Self {
            sensors,
            inner: RwLock::new(Inner {
                reports: Default::default(),
                analyzer,
                updated_at: None,
            }),
        }
    }

    /// Room whose sensor has address `addr`
    pub fn room_for_sensor(&self, addr: IpAddr) -> TrackerResult<RoomCode> {
        self.sensors
            .get(&addr)
            .copied()
            .ok_or(TrackerError::UnknownSensor(addr))
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Replace a room's latest report and run one analysis step
    pub async fn record(&self, room: RoomCode, report: RssiReport) -> TrackerResult<StepResult> {
        if !room.is_indoor() {
            return Err(TrackerError::UnknownRoomCode(room.code()));
        }

        let mut inner = self.inner.write().await;
        inner.reports[room.state_index()] = report;
        let Inner {
            reports, analyzer, ..
        } = &mut *inner;
        let result = analyzer.step(reports);
        inner.updated_at = Some(Utc::now());

        Ok(result)
    }

    /// Current rooms and time distributions
    pub async fn snapshot(&self) -> TrackerSnapshot {
        let inner = self.inner.read().await;
        TrackerSnapshot {
            pets: PetId::ALL.map(|pet| inner.analyzer.status(pet)),
            total_time: inner.analyzer.total_time(),
            updated_at: inner.updated_at,
        }
    }
}

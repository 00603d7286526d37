//! Core data types for pet tracking
//!
//! - `RoomCode`: the closed set of tracked locations and their fixed visual tables
//! - `PetId`: the two tracked pets and their element identifiers
//! - `RoomTimeDistribution`: per-room percentages shown in the pie chart
//! - `PetStatus` / `TrackerSnapshot`: what the dashboard is rendered from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{TrackerError, TrackerResult};

/// Number of indoor rooms (one sensor each)
pub const INDOOR_ROOMS: usize = 4;

/// Number of tracked pets
pub const TOTAL_PETS: usize = 2;

/// A tracked location
///
/// Serialized as its integer code: 0..=3 for the indoor rooms, -1 for outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum RoomCode {
    LivingRoom,
    SmallBedroom,
    LargeBedroom,
    Bathroom,
    /// Not seen by any sensor
    Outside,
}

impl RoomCode {
    /// Indoor rooms in display (and chart) order
    pub const INDOOR: [RoomCode; INDOOR_ROOMS] = [
        RoomCode::LivingRoom,
        RoomCode::SmallBedroom,
        RoomCode::LargeBedroom,
        RoomCode::Bathroom,
    ];

    /// Every room code, outside last
    pub const ALL: [RoomCode; 5] = [
        RoomCode::LivingRoom,
        RoomCode::SmallBedroom,
        RoomCode::LargeBedroom,
        RoomCode::Bathroom,
        RoomCode::Outside,
    ];

    /// Integer code used on the wire and in recordings
    pub fn code(self) -> i32 {
        match self {
            RoomCode::LivingRoom => 0,
            RoomCode::SmallBedroom => 1,
            RoomCode::LargeBedroom => 2,
            RoomCode::Bathroom => 3,
            RoomCode::Outside => -1,
        }
    }

    /// Style token placing a pet icon at this room on the floor plan
    pub fn position_class(self) -> &'static str {
        match self {
            RoomCode::LivingRoom => "pet-living-room",
            RoomCode::SmallBedroom => "pet-bedroom-small",
            RoomCode::LargeBedroom => "pet-bedroom-large",
            RoomCode::Bathroom => "pet-bathroom",
            RoomCode::Outside => "pet-outside",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RoomCode::LivingRoom => "Living Room",
            RoomCode::SmallBedroom => "Small Bedroom",
            RoomCode::LargeBedroom => "Large Bedroom",
            RoomCode::Bathroom => "Bathroom",
            RoomCode::Outside => "Outside",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RoomCode::LivingRoom => "#f4a261",
            RoomCode::SmallBedroom => "#2a9d8f",
            RoomCode::LargeBedroom => "#e9c46a",
            RoomCode::Bathroom => "#8ab6d6",
            RoomCode::Outside => "#9e9e9e",
        }
    }

    /// Row/column of this room in the hidden-state matrices (outside is last)
    pub fn state_index(self) -> usize {
        match self {
            RoomCode::LivingRoom => 0,
            RoomCode::SmallBedroom => 1,
            RoomCode::LargeBedroom => 2,
            RoomCode::Bathroom => 3,
            RoomCode::Outside => 4,
        }
    }

    /// Inverse of [`RoomCode::state_index`]
    pub fn from_state_index(index: usize) -> Option<RoomCode> {
        Self::ALL.get(index).copied()
    }

    pub fn is_indoor(self) -> bool {
        self != RoomCode::Outside
    }
}

impl TryFrom<i32> for RoomCode {
    type Error = TrackerError;

    fn try_from(code: i32) -> TrackerResult<Self> {
        match code {
            0 => Ok(RoomCode::LivingRoom),
            1 => Ok(RoomCode::SmallBedroom),
            2 => Ok(RoomCode::LargeBedroom),
            3 => Ok(RoomCode::Bathroom),
            -1 => Ok(RoomCode::Outside),
            other => Err(TrackerError::UnknownRoomCode(other)),
        }
    }
}

impl From<RoomCode> for i32 {
    fn from(room: RoomCode) -> i32 {
        room.code()
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One of the two tracked pets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetId {
    Pet0,
    Pet1,
}

impl PetId {
    pub const ALL: [PetId; TOTAL_PETS] = [PetId::Pet0, PetId::Pet1];

    pub fn index(self) -> usize {
        match self {
            PetId::Pet0 => 0,
            PetId::Pet1 => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<PetId> {
        Self::ALL.get(index).copied()
    }

    /// Identifier of the pet's image container on the page
    pub fn image_id(self) -> &'static str {
        match self {
            PetId::Pet0 => "pet0",
            PetId::Pet1 => "pet1",
        }
    }

    /// Identifier of the pet's pie chart on the page
    pub fn chart_id(self) -> &'static str {
        match self {
            PetId::Pet0 => "pet0-chart",
            PetId::Pet1 => "pet1-chart",
        }
    }
}

/// Percentage of time spent in each indoor room, in [`RoomCode::INDOOR`] order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct RoomTimeDistribution([f64; INDOOR_ROOMS]);

impl RoomTimeDistribution {
    /// Validate a raw percentage sequence
    ///
    /// The sequence must hold one finite, non-negative value per indoor room.
    pub fn new(values: &[f64]) -> TrackerResult<Self> {
        let malformed = || TrackerError::MalformedDistribution {
            expected: INDOOR_ROOMS,
            actual: values.to_vec(),
        };

        let arr: [f64; INDOOR_ROOMS] = values.try_into().map_err(|_| malformed())?;
        if arr.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(malformed());
        }
        Ok(Self(arr))
    }

    /// All-zero distribution (nothing observed yet)
    pub fn empty() -> Self {
        Self([0.0; INDOOR_ROOMS])
    }

    pub fn values(&self) -> &[f64; INDOOR_ROOMS] {
        &self.0
    }

    /// Values paired with their room, in display order
    pub fn iter(&self) -> impl Iterator<Item = (RoomCode, f64)> + '_ {
        RoomCode::INDOOR.iter().copied().zip(self.0.iter().copied())
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Default for RoomTimeDistribution {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Vec<f64>> for RoomTimeDistribution {
    type Error = TrackerError;

    fn try_from(values: Vec<f64>) -> TrackerResult<Self> {
        Self::new(&values)
    }
}

impl From<RoomTimeDistribution> for Vec<f64> {
    fn from(dist: RoomTimeDistribution) -> Vec<f64> {
        dist.0.to_vec()
    }
}

/// Current view of one pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetStatus {
    pub room_located: RoomCode,
    pub time_spent_percentage: RoomTimeDistribution,
}

impl Default for PetStatus {
    fn default() -> Self {
        Self {
            room_located: RoomCode::Outside,
            time_spent_percentage: RoomTimeDistribution::empty(),
        }
    }
}

/// Everything the dashboard needs, taken at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub pets: [PetStatus; TOTAL_PETS],
    /// Number of analysis steps so far
    pub total_time: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrackerSnapshot {
    pub fn pet(&self, pet: PetId) -> &PetStatus {
        &self.pets[pet.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_round_trip_through_integer() {
        for room in RoomCode::ALL {
            assert_eq!(RoomCode::try_from(room.code()).unwrap(), room);
        }
        assert!(matches!(
            RoomCode::try_from(4),
            Err(TrackerError::UnknownRoomCode(4))
        ));
        assert!(matches!(
            RoomCode::try_from(-2),
            Err(TrackerError::UnknownRoomCode(-2))
        ));
    }

    #[test]
    fn test_position_classes_are_distinct() {
        let mut classes: Vec<_> = RoomCode::ALL.iter().map(|r| r.position_class()).collect();
        classes.sort();
        classes.dedup();
        assert_eq!(classes.len(), RoomCode::ALL.len());
    }

    #[test]
    fn test_room_code_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&RoomCode::Outside).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&RoomCode::Bathroom).unwrap(), "3");
        let room: RoomCode = serde_json::from_str("1").unwrap();
        assert_eq!(room, RoomCode::SmallBedroom);
        assert!(serde_json::from_str::<RoomCode>("9").is_err());
    }

    #[test]
    fn test_state_index_inverse() {
        for room in RoomCode::ALL {
            assert_eq!(RoomCode::from_state_index(room.state_index()), Some(room));
        }
        assert_eq!(RoomCode::from_state_index(5), None);
    }

    #[test]
    fn test_distribution_validation() {
        let dist = RoomTimeDistribution::new(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(dist.total(), 100.0);

        assert!(matches!(
            RoomTimeDistribution::new(&[10.0, 20.0, 30.0]),
            Err(TrackerError::MalformedDistribution { expected: 4, .. })
        ));
        assert!(RoomTimeDistribution::new(&[10.0, 20.0, 30.0, 40.0, 0.0]).is_err());
        assert!(RoomTimeDistribution::new(&[-1.0, 20.0, 30.0, 40.0]).is_err());
        assert!(RoomTimeDistribution::new(&[f64::NAN, 20.0, 30.0, 40.0]).is_err());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = TrackerSnapshot::default();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["pets"][0]["room_located"], -1);
        assert_eq!(
            json["pets"][1]["time_spent_percentage"],
            serde_json::json!([0.0, 0.0, 0.0, 0.0])
        );
        assert_eq!(json["total_time"], 0);
    }
}

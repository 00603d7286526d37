//! Room layout reconciliation
//!
//! Keeps each pet icon's position class in step with the pet's room, and the
//! pair's layout class in step with whether both pets share a room.
//!
//! The reconciler owns the logical rooms; the visual containers live on a
//! [`Stage`]. Each container carries exactly one position class (one of
//! [`RoomCode::position_class`]) and exactly one layout class (`side` or
//! `middle`) once both pets have been placed.

use std::collections::HashMap;

use super::error::{DashboardError, DashboardResult};
use crate::tracker::{PetId, RoomCode, TOTAL_PETS};

/// Relative layout of the two pet icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// Different rooms: pet 0 left-aligned, pet 1 right-aligned
    SidePairing,
    /// Same room: icons drawn in the middle, on top of each other
    Overlapping,
}

impl LayoutState {
    pub const ALL: [LayoutState; 2] = [LayoutState::SidePairing, LayoutState::Overlapping];

    /// Layout implied by the two pets' rooms
    pub fn derive(rooms: [RoomCode; TOTAL_PETS]) -> Self {
        if rooms[0] == rooms[1] {
            LayoutState::Overlapping
        } else {
            LayoutState::SidePairing
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            LayoutState::SidePairing => "side",
            LayoutState::Overlapping => "middle",
        }
    }
}

/// Ordered set of class tokens with DOM `classList` semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a class
    pub fn with(mut self, class: &str) -> Self {
        self.add(class);
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.tokens.iter().any(|t| t == class)
    }

    /// Add `class` unless already present
    pub fn add(&mut self, class: &str) {
        if !self.contains(class) {
            self.tokens.push(class.to_string());
        }
    }

    pub fn remove(&mut self, class: &str) {
        self.tokens.retain(|t| t != class);
    }

    /// Replace `old` with `new` in place
    ///
    /// Returns false and leaves the list untouched when `old` is absent.
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        let Some(pos) = self.tokens.iter().position(|t| t == old) else {
            return false;
        };
        if old != new && self.contains(new) {
            self.tokens.remove(pos);
        } else {
            self.tokens[pos] = new.to_string();
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// Visual surface holding the pet containers
pub trait Stage {
    fn element(&self, id: &str) -> Option<&ClassList>;

    fn element_mut(&mut self, id: &str) -> Option<&mut ClassList>;
}

/// In-memory stage: element id → class list
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: HashMap<String, ClassList>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with both pet containers placed outside
    pub fn with_pets() -> Self {
        let mut doc = Self::new();
        for pet in PetId::ALL {
            doc.insert(
                pet.image_id(),
                ClassList::new().with("pet").with(RoomCode::Outside.position_class()),
            );
        }
        doc
    }

    pub fn insert(&mut self, id: &str, classes: ClassList) {
        self.elements.insert(id.to_string(), classes);
    }
}

impl Stage for Document {
    fn element(&self, id: &str) -> Option<&ClassList> {
        self.elements.get(id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut ClassList> {
        self.elements.get_mut(id)
    }
}

/// Owns both pets' rooms and keeps the stage consistent with them
#[derive(Debug, Clone)]
pub struct Reconciler {
    current: [RoomCode; TOTAL_PETS],
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    /// Both pets start outside
    pub fn new() -> Self {
        Self {
            current: [RoomCode::Outside; TOTAL_PETS],
        }
    }

    pub fn room(&self, pet: PetId) -> RoomCode {
        self.current[pet.index()]
    }

    pub fn rooms(&self) -> [RoomCode; TOTAL_PETS] {
        self.current
    }

    pub fn layout(&self) -> LayoutState {
        LayoutState::derive(self.current)
    }

    /// Move `pet` to `target` and update both containers
    ///
    /// Order is fixed: swap the position class, drop the layout class
    /// derived from the old rooms, commit, add the layout class derived
    /// from the new rooms. Both containers are resolved before anything is
    /// touched, so a missing element leaves the stage and rooms unchanged.
    pub fn set_pet_room<S: Stage + ?Sized>(
        &mut self,
        stage: &mut S,
        pet: PetId,
        target: RoomCode,
    ) -> DashboardResult<()> {
        for p in PetId::ALL {
            if stage.element(p.image_id()).is_none() {
                return Err(DashboardError::MissingElement(p.image_id().to_string()));
            }
        }

        let previous = self.current[pet.index()];
        let container = element_mut(stage, pet)?;
        if !container.replace(previous.position_class(), target.position_class()) {
            // Container was not in the expected state; rebuild its position
            for room in RoomCode::ALL {
                container.remove(room.position_class());
            }
            container.add(target.position_class());
        }

        let old_layout = LayoutState::derive(self.current);
        for p in PetId::ALL {
            let container = element_mut(stage, p)?;
            container.remove(old_layout.class());
            // Stray layout classes are dropped the same way as stray positions
            for layout in LayoutState::ALL {
                container.remove(layout.class());
            }
        }

        self.current[pet.index()] = target;

        let new_layout = LayoutState::derive(self.current);
        for p in PetId::ALL {
            element_mut(stage, p)?.add(new_layout.class());
        }

        tracing::debug!(
            pet = pet.index(),
            from = previous.code(),
            to = target.code(),
            layout = new_layout.class(),
            "Pet room reconciled"
        );

        Ok(())
    }

    /// Like [`Reconciler::set_pet_room`], from a raw integer room code
    pub fn set_pet_room_code<S: Stage + ?Sized>(
        &mut self,
        stage: &mut S,
        pet: PetId,
        code: i32,
    ) -> DashboardResult<()> {
        let target = RoomCode::try_from(code)?;
        self.set_pet_room(stage, pet, target)
    }
}

fn element_mut<S: Stage + ?Sized>(stage: &mut S, pet: PetId) -> DashboardResult<&mut ClassList> {
    stage
        .element_mut(pet.image_id())
        .ok_or_else(|| DashboardError::MissingElement(pet.image_id().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackerError;

    fn position_classes(classes: &ClassList) -> Vec<&str> {
        classes
            .iter()
            .filter(|c| RoomCode::ALL.iter().any(|r| r.position_class() == *c))
            .collect()
    }

    fn layout_classes(classes: &ClassList) -> Vec<&str> {
        classes
            .iter()
            .filter(|c| LayoutState::ALL.iter().any(|l| l.class() == *c))
            .collect()
    }

    fn assert_consistent(doc: &Document, reconciler: &Reconciler) {
        let expected_layout = reconciler.layout().class();
        for pet in PetId::ALL {
            let classes = doc.element(pet.image_id()).unwrap();
            assert_eq!(
                position_classes(classes),
                vec![reconciler.room(pet).position_class()],
                "position classes of {:?}: {}",
                pet,
                classes
            );
            assert_eq!(
                layout_classes(classes),
                vec![expected_layout],
                "layout classes of {:?}: {}",
                pet,
                classes
            );
        }
    }

    #[test]
    fn test_class_list_replace() {
        let mut list = ClassList::new().with("a").with("b");
        assert!(list.replace("a", "c"));
        assert_eq!(list.to_string(), "c b");

        assert!(!list.replace("zzz", "d"));
        assert_eq!(list.to_string(), "c b");

        // Replacing into an existing token collapses to one
        assert!(list.replace("c", "b"));
        assert_eq!(list.to_string(), "b");

        assert!(list.replace("b", "b"));
        assert_eq!(list.to_string(), "b");
    }

    #[test]
    fn test_class_list_add_is_set_like() {
        let mut list = ClassList::new();
        list.add("side");
        list.add("side");
        assert_eq!(list.len(), 1);
        list.remove("side");
        assert!(list.is_empty());
    }

    #[test]
    fn test_layout_derivation() {
        assert_eq!(
            LayoutState::derive([RoomCode::Outside, RoomCode::Outside]),
            LayoutState::Overlapping
        );
        assert_eq!(
            LayoutState::derive([RoomCode::LivingRoom, RoomCode::Bathroom]),
            LayoutState::SidePairing
        );
    }

    #[test]
    fn test_scenario_first_pet_moves_in() {
        let mut doc = Document::with_pets();
        let mut rec = Reconciler::new();

        rec.set_pet_room(&mut doc, PetId::Pet0, RoomCode::LivingRoom)
            .unwrap();

        assert_eq!(rec.room(PetId::Pet0), RoomCode::LivingRoom);
        assert_eq!(rec.layout(), LayoutState::SidePairing);
        assert!(doc.element("pet0").unwrap().contains("pet-living-room"));
        assert!(doc.element("pet1").unwrap().contains("pet-outside"));
        assert_consistent(&doc, &rec);
    }

    #[test]
    fn test_scenario_second_pet_joins() {
        let mut doc = Document::with_pets();
        let mut rec = Reconciler::new();

        rec.set_pet_room(&mut doc, PetId::Pet0, RoomCode::LivingRoom)
            .unwrap();
        rec.set_pet_room(&mut doc, PetId::Pet1, RoomCode::LivingRoom)
            .unwrap();

        assert_eq!(rec.layout(), LayoutState::Overlapping);
        let pet0 = doc.element("pet0").unwrap();
        assert!(pet0.contains("pet-living-room"));
        assert!(pet0.contains("middle"));
        assert!(!pet0.contains("side"));
        assert_consistent(&doc, &rec);
    }

    #[test]
    fn test_back_outside_clears_indoor_class() {
        let mut doc = Document::with_pets();
        let mut rec = Reconciler::new();

        rec.set_pet_room(&mut doc, PetId::Pet0, RoomCode::LargeBedroom)
            .unwrap();
        rec.set_pet_room(&mut doc, PetId::Pet0, RoomCode::Outside)
            .unwrap();

        let pet0 = doc.element("pet0").unwrap();
        assert!(!pet0.contains("pet-bedroom-large"));
        assert_eq!(position_classes(pet0), vec!["pet-outside"]);
        assert_consistent(&doc, &rec);
    }

    #[test]
    fn test_idempotent() {
        let mut once = Document::with_pets();
        let mut rec_once = Reconciler::new();
        rec_once
            .set_pet_room(&mut once, PetId::Pet1, RoomCode::Bathroom)
            .unwrap();

        let mut twice = Document::with_pets();
        let mut rec_twice = Reconciler::new();
        for _ in 0..2 {
            rec_twice
                .set_pet_room(&mut twice, PetId::Pet1, RoomCode::Bathroom)
                .unwrap();
        }

        assert_eq!(rec_once.rooms(), rec_twice.rooms());
        for pet in PetId::ALL {
            assert_eq!(once.element(pet.image_id()), twice.element(pet.image_id()));
        }
    }

    #[test]
    fn test_invariant_holds_for_every_transition() {
        let mut doc = Document::with_pets();
        let mut rec = Reconciler::new();

        // Walk every (pet, room) pair several times in a scrambled order
        for round in 0..3 {
            for (i, room) in RoomCode::ALL.iter().enumerate() {
                for pet in PetId::ALL {
                    let target = if (i + round + pet.index()) % 2 == 0 {
                        *room
                    } else {
                        RoomCode::ALL[(i + round) % RoomCode::ALL.len()]
                    };
                    rec.set_pet_room(&mut doc, pet, target).unwrap();
                    assert_consistent(&doc, &rec);
                }
            }
        }

        for a in RoomCode::ALL {
            for b in RoomCode::ALL {
                rec.set_pet_room(&mut doc, PetId::Pet0, a).unwrap();
                rec.set_pet_room(&mut doc, PetId::Pet1, b).unwrap();
                assert_consistent(&doc, &rec);
                let expected = if a == b { "middle" } else { "side" };
                assert!(doc.element("pet1").unwrap().contains(expected));
            }
        }
    }

    #[test]
    fn test_missing_element_is_fatal_and_leaves_state() {
        let mut doc = Document::new();
        doc.insert("pet0", ClassList::new().with("pet-outside"));
        let mut rec = Reconciler::new();

        let err = rec
            .set_pet_room(&mut doc, PetId::Pet0, RoomCode::Bathroom)
            .unwrap_err();
        assert!(matches!(err, DashboardError::MissingElement(ref id) if id == "pet1"));
        assert_eq!(rec.room(PetId::Pet0), RoomCode::Outside);
        assert!(doc.element("pet0").unwrap().contains("pet-outside"));
    }

    #[test]
    fn test_unknown_room_code() {
        let mut doc = Document::with_pets();
        let mut rec = Reconciler::new();

        let err = rec
            .set_pet_room_code(&mut doc, PetId::Pet0, 5)
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Tracker(TrackerError::UnknownRoomCode(5))
        ));

        rec.set_pet_room_code(&mut doc, PetId::Pet0, 2).unwrap();
        assert_eq!(rec.room(PetId::Pet0), RoomCode::LargeBedroom);
    }

    #[test]
    fn test_stray_position_class_is_replaced() {
        let mut doc = Document::new();
        doc.insert("pet0", ClassList::new().with("pet-bathroom"));
        doc.insert("pet1", ClassList::new().with("pet-outside"));
        let mut rec = Reconciler::new();

        rec.set_pet_room(&mut doc, PetId::Pet0, RoomCode::SmallBedroom)
            .unwrap();

        assert_eq!(
            position_classes(doc.element("pet0").unwrap()),
            vec!["pet-bedroom-small"]
        );
        assert_consistent(&doc, &rec);
    }

    #[test]
    fn test_stray_layout_class_is_dropped() {
        let mut doc = Document::new();
        doc.insert("pet0", ClassList::new().with("pet-outside").with("side"));
        doc.insert("pet1", ClassList::new().with("pet-outside"));
        let mut rec = Reconciler::new();

        rec.set_pet_room(&mut doc, PetId::Pet1, RoomCode::Outside)
            .unwrap();

        assert_eq!(rec.layout(), LayoutState::Overlapping);
        let pet0 = doc.element("pet0").unwrap();
        assert!(pet0.contains("middle"));
        assert!(!pet0.contains("side"));
        assert_consistent(&doc, &rec);
    }
}

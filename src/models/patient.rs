use serde::{Deserialize, Serialize};

use super::enums::Gender;
use super::EntityId;

/// A registered patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: EntityId,
    pub name: String,
    pub diseases: Vec<String>,
    pub allergies: Vec<String>,
    pub room_number: String,
    pub bed_number: String,
    pub floor_number: String,
    pub age: u32,
    pub gender: Gender,
    pub contact_info: String,
    pub emergency_contact: String,
}

/// Patient fields as submitted on create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub room_number: String,
    pub bed_number: String,
    pub floor_number: String,
    pub age: u32,
    pub gender: Gender,
    pub contact_info: String,
    pub emergency_contact: String,
}

impl NewPatient {
    pub fn with_id(self, id: EntityId) -> Patient {
        Patient {
            id,
            name: self.name,
            diseases: self.diseases,
            allergies: self.allergies,
            room_number: self.room_number,
            bed_number: self.bed_number,
            floor_number: self.floor_number,
            age: self.age,
            gender: self.gender,
            contact_info: self.contact_info,
            emergency_contact: self.emergency_contact,
        }
    }
}

impl Patient {
    /// "Room 101, Bed A" line of the patient list.
    pub fn location(&self) -> String {
        format!("Room {}, Bed {}", self.room_number, self.bed_number)
    }
}

use serde::{Deserialize, Serialize};

use super::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPersonnel {
    pub id: EntityId,
    pub name: String,
    pub contact_info: String,
    #[serde(default)]
    pub other_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeliveryPersonnel {
    pub name: String,
    pub contact_info: String,
    #[serde(default)]
    pub other_details: String,
}

impl NewDeliveryPersonnel {
    pub fn with_id(self, id: EntityId) -> DeliveryPersonnel {
        DeliveryPersonnel {
            id,
            name: self.name,
            contact_info: self.contact_info,
            other_details: self.other_details,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::enums::MealSlot;
use super::EntityId;

/// One meal of a diet chart as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(rename = "type")]
    pub slot: MealSlot,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

/// Ingredients and instructions for a single slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealEntry {
    pub ingredients: Vec<String>,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MealPlanError {
    #[error("Diet chart has no {0} meal")]
    MissingSlot(MealSlot),
    #[error("Diet chart has more than one {0} meal")]
    DuplicateSlot(MealSlot),
}

/// Exactly one meal per slot. Serialized as the `meals` list,
/// always in MORNING, EVENING, NIGHT order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Meal>", into = "Vec<Meal>")]
pub struct MealPlan {
    pub morning: MealEntry,
    pub evening: MealEntry,
    pub night: MealEntry,
}

impl MealPlan {
    pub fn get(&self, slot: MealSlot) -> &MealEntry {
        match slot {
            MealSlot::Morning => &self.morning,
            MealSlot::Evening => &self.evening,
            MealSlot::Night => &self.night,
        }
    }

    pub fn get_mut(&mut self, slot: MealSlot) -> &mut MealEntry {
        match slot {
            MealSlot::Morning => &mut self.morning,
            MealSlot::Evening => &mut self.evening,
            MealSlot::Night => &mut self.night,
        }
    }

    pub fn meals(&self) -> Vec<Meal> {
        MealSlot::ALL
            .iter()
            .map(|&slot| {
                let entry = self.get(slot);
                Meal {
                    slot,
                    ingredients: entry.ingredients.clone(),
                    instructions: entry.instructions.clone(),
                }
            })
            .collect()
    }
}

impl TryFrom<Vec<Meal>> for MealPlan {
    type Error = MealPlanError;

    fn try_from(meals: Vec<Meal>) -> Result<Self, Self::Error> {
        let mut slots: [Option<MealEntry>; 3] = [None, None, None];
        for meal in meals {
            let index = slot_index(meal.slot);
            if slots[index].is_some() {
                return Err(MealPlanError::DuplicateSlot(meal.slot));
            }
            slots[index] = Some(MealEntry {
                ingredients: meal.ingredients,
                instructions: meal.instructions,
            });
        }

        let [morning, evening, night] = slots;
        Ok(Self {
            morning: morning.ok_or(MealPlanError::MissingSlot(MealSlot::Morning))?,
            evening: evening.ok_or(MealPlanError::MissingSlot(MealSlot::Evening))?,
            night: night.ok_or(MealPlanError::MissingSlot(MealSlot::Night))?,
        })
    }
}

impl From<MealPlan> for Vec<Meal> {
    fn from(plan: MealPlan) -> Self {
        plan.meals()
    }
}

fn slot_index(slot: MealSlot) -> usize {
    match slot {
        MealSlot::Morning => 0,
        MealSlot::Evening => 1,
        MealSlot::Night => 2,
    }
}

/// A patient's diet chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietChart {
    pub id: EntityId,
    pub patient_id: EntityId,
    pub meals: MealPlan,
}

/// Body of `POST /diet-charts` and `PUT /diet-charts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDietChart {
    pub patient_id: EntityId,
    pub meals: MealPlan,
}

impl NewDietChart {
    pub fn with_id(self, id: EntityId) -> DietChart {
        DietChart {
            id,
            patient_id: self.patient_id,
            meals: self.meals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_meals_in_any_order() {
        let chart: NewDietChart = serde_json::from_value(json!({
            "patientId": 1,
            "meals": [
                { "type": "NIGHT", "ingredients": ["soup"], "instructions": "" },
                { "type": "MORNING", "ingredients": ["oatmeal", "banana"], "instructions": "no sugar" },
                { "type": "EVENING", "ingredients": [], "instructions": "light" }
            ]
        }))
        .unwrap();
        assert_eq!(chart.meals.morning.ingredients, vec!["oatmeal", "banana"]);
        assert_eq!(chart.meals.get(MealSlot::Night).ingredients, vec!["soup"]);
    }

    #[test]
    fn serializes_in_slot_order() {
        let mut plan = MealPlan::default();
        plan.get_mut(MealSlot::Evening).instructions = "light".into();
        let value = serde_json::to_value(&plan).unwrap();
        let types: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["type"].as_str().unwrap())
            .collect();
        assert_eq!(types, ["MORNING", "EVENING", "NIGHT"]);
        assert_eq!(value[1]["instructions"], "light");
    }

    #[test]
    fn rejects_missing_slot() {
        let meals = vec![Meal {
            slot: MealSlot::Morning,
            ingredients: vec![],
            instructions: String::new(),
        }];
        assert_eq!(
            MealPlan::try_from(meals).unwrap_err(),
            MealPlanError::MissingSlot(MealSlot::Evening)
        );
    }

    #[test]
    fn rejects_duplicate_slot() {
        let meal = Meal {
            slot: MealSlot::Night,
            ingredients: vec![],
            instructions: String::new(),
        };
        assert_eq!(
            MealPlan::try_from(vec![meal.clone(), meal]).unwrap_err(),
            MealPlanError::DuplicateSlot(MealSlot::Night)
        );
    }

    #[test]
    fn four_meals_do_not_deserialize() {
        let result = serde_json::from_value::<MealPlan>(json!([
            { "type": "MORNING", "ingredients": [], "instructions": "" },
            { "type": "EVENING", "ingredients": [], "instructions": "" },
            { "type": "NIGHT", "ingredients": [], "instructions": "" },
            { "type": "NIGHT", "ingredients": [], "instructions": "" }
        ]));
        assert!(result.is_err());
    }
}

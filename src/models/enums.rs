use serde::{Deserialize, Serialize};

/// A string that does not belong to an enumerated vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire form (serde) is the same string as `as_str`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every legal value, in display order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(PreparationStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
});

// Canonical delivery vocabulary. This is the only form sent to the backend.
str_enum!(DeliveryStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Delivered => "delivered",
});

// Manager-facing labels for the same delivery states.
str_enum!(DeliveryLabel {
    Pending => "PENDING",
    InProgress => "IN_PROGRESS",
    Completed => "COMPLETED",
});

str_enum!(MealSlot {
    Morning => "MORNING",
    Evening => "EVENING",
    Night => "NIGHT",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

impl PreparationStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl DeliveryStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Delivered => "Delivered",
        }
    }

    pub fn is_delivered(&self) -> bool {
        *self == Self::Delivered
    }
}

impl DeliveryLabel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl MealSlot {
    /// "Morning", as in the "Morning Meal" card title.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

impl From<DeliveryStatus> for DeliveryLabel {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Pending => Self::Pending,
            DeliveryStatus::InProgress => Self::InProgress,
            DeliveryStatus::Delivered => Self::Completed,
        }
    }
}

impl From<DeliveryLabel> for DeliveryStatus {
    fn from(label: DeliveryLabel) -> Self {
        match label {
            DeliveryLabel::Pending => Self::Pending,
            DeliveryLabel::InProgress => Self::InProgress,
            DeliveryLabel::Completed => Self::Delivered,
        }
    }
}

/// Status filter of the manager's delivery overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryFilter {
    #[default]
    All,
    Only(DeliveryLabel),
}

impl DeliveryFilter {
    pub fn matches(&self, status: DeliveryStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => DeliveryLabel::from(status) == *label,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Only(label) => label.as_str(),
        }
    }
}

impl std::str::FromStr for DeliveryFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(Self::All),
            other => other
                .parse::<DeliveryLabel>()
                .map(Self::Only)
                .map_err(|_| ParseEnumError {
                    field: "DeliveryFilter",
                    value: s.into(),
                }),
        }
    }
}

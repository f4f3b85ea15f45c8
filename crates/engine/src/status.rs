//! Closed vocabularies stored as text columns.
//!
//! Each enum round-trips through the exact strings the database and JSON
//! clients use (`"Received"`, `"income"`, `"Sewa Alat Berat"`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Generates a text-backed enum with `as_str`, `TryFrom<&str>`, `Display` and
/// serde impls going through the wire string.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = EngineError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(EngineError::Validation(format!(
                        concat!("invalid ", $label, ": {}"),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::try_from(raw.as_str()).map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum!(
    /// Lifecycle of a project income.
    IncomeStatus, "income status" {
        Received => "Received",
        Pending => "Pending",
        Planned => "Planned",
    }
);

wire_enum!(
    /// Lifecycle of a project expense.
    ExpenseStatus, "expense status" {
        Paid => "Paid",
        Unpaid => "Unpaid",
        Pending => "Pending",
    }
);

wire_enum!(
    LedgerKind, "ledger type" {
        Income => "income",
        Expense => "expense",
    }
);

wire_enum!(
    LedgerStatus, "ledger status" {
        Paid => "Paid",
        Unpaid => "Unpaid",
    }
);

wire_enum!(
    /// Who created a ledger row: a person, or the project mirror.
    LedgerSource, "ledger source" {
        Manual => "manual",
        Project => "project",
    }
);

wire_enum!(
    /// Known ledger categories.
    ///
    /// Ledger rows keep the category as free text because project categories
    /// are copied verbatim; this is the vocabulary accepted by category filters.
    LedgerCategory, "category" {
        Goods => "Barang",
        Services => "Jasa",
        EquipmentRental => "Sewa Alat Berat",
        Salary => "Gaji",
        MealAllowance => "Uang Makan",
        Kasbon => "Kasbon",
        Other => "Other",
    }
);

wire_enum!(
    ActivityKind, "activity type" {
        Income => "income",
        Expense => "expense",
        Member => "member",
        Update => "update",
    }
);

/// Status of a project record that can be mirrored into the ledger.
pub trait Settlement: Copy + PartialEq {
    /// Money has actually moved.
    const SETTLED: Self;
    /// Status a record falls back to when its ledger mirror is removed.
    const REVERTED: Self;

    fn is_settled(self) -> bool {
        self == Self::SETTLED
    }
}

impl Settlement for IncomeStatus {
    const SETTLED: Self = IncomeStatus::Received;
    const REVERTED: Self = IncomeStatus::Pending;
}

impl Settlement for ExpenseStatus {
    const SETTLED: Self = ExpenseStatus::Paid;
    const REVERTED: Self = ExpenseStatus::Unpaid;
}

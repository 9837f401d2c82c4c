//! Small shared value types for catalog views.

use serde::{Deserialize, Serialize};

/// Field an admin inventory listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventorySortField {
    Name,
    Price,
    Stock,
}

/// Direction toggle paired with [`InventorySortField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A complete inventory ordering choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySort {
    pub field: InventorySortField,
    pub direction: SortDirection,
}

impl InventorySort {
    pub fn new(field: InventorySortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for InventorySort {
    fn default() -> Self {
        Self {
            field: InventorySortField::Name,
            direction: SortDirection::Ascending,
        }
    }
}

//! Packer Model

use serde::{Deserialize, Serialize};

/// Packer entity (打包员)
///
/// `completed_orders` is derived from assignment history on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Packer {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub completed_orders: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create packer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackerCreate {
    pub name: String,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

/// Update packer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

/// Packer completion statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackerStats {
    pub total_assignments: i64,
    pub completed_assignments: i64,
    pub pending_assignments: i64,
    /// Percentage in `[0, 100]`, two decimals. Zero when there are no assignments.
    pub completion_rate: f64,
}

impl PackerStats {
    pub fn from_counts(completed: i64, pending: i64) -> Self {
        let total = completed + pending;
        let completion_rate = if total == 0 {
            0.0
        } else {
            let rate = completed as f64 * 100.0 / total as f64;
            (rate * 100.0).round() / 100.0
        };
        Self {
            total_assignments: total,
            completed_assignments: completed,
            pending_assignments: pending,
            completion_rate,
        }
    }
}

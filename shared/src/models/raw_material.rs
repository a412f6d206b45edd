//! Raw Material Model

use serde::{Deserialize, Serialize};

/// Raw material entity (原材料)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub initial_quantity: f64,
    pub processed_quantity: f64,
    pub usable_quantity: f64,
    pub low_stock_threshold: f64,
    pub supplier: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// UI classification of usable stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Optimal,
    Low,
    Critical,
}

impl RawMaterial {
    /// `initial − processed`, never stored
    pub fn wastage(&self) -> f64 {
        self.initial_quantity - self.processed_quantity
    }

    pub fn stock_status(&self) -> StockStatus {
        let usable = self.usable_quantity;
        if usable <= 0.0 || usable <= self.low_stock_threshold * 0.5 {
            StockStatus::Critical
        } else if usable <= self.low_stock_threshold {
            StockStatus::Low
        } else {
            StockStatus::Optimal
        }
    }
}

/// Raw material with derived fields, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialView {
    #[serde(flatten)]
    pub material: RawMaterial,
    pub wastage: f64,
    pub stock_status: StockStatus,
}

impl From<RawMaterial> for RawMaterialView {
    fn from(material: RawMaterial) -> Self {
        Self {
            wastage: material.wastage(),
            stock_status: material.stock_status(),
            material,
        }
    }
}

/// Create raw material payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialCreate {
    pub name: String,
    pub unit: String,
    pub initial_quantity: f64,
    #[serde(default)]
    pub processed_quantity: f64,
    /// Defaults to `processed_quantity`
    pub usable_quantity: Option<f64>,
    #[serde(default)]
    pub low_stock_threshold: f64,
    pub supplier: Option<String>,
}

/// Update raw material payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub initial_quantity: Option<f64>,
    pub processed_quantity: Option<f64>,
    pub usable_quantity: Option<f64>,
    pub low_stock_threshold: Option<f64>,
    pub supplier: Option<String>,
}

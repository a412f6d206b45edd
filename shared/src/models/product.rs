//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// Sellable variant (size / price / stock / barcode)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    pub size: Option<String>,
    pub price: f64,
    pub stock: f64,
    pub barcode: Option<String>,
}

/// Variant input (create / replace)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantInput {
    pub size: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: f64,
    pub barcode: Option<String>,
}

/// Create product payload
///
/// Accepts either `variants` or the flat `unitPrice` / `barcode` / `quantity`
/// shape, which becomes a single variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub variants: Option<Vec<ProductVariantInput>>,
    pub unit_price: Option<f64>,
    pub barcode: Option<String>,
    pub quantity: Option<f64>,
}

/// Update product payload. `variants`, when present, replaces all variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub is_active: Option<bool>,
    pub variants: Option<Vec<ProductVariantInput>>,
}

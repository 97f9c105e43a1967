use serde::{Deserialize, Serialize};

// === Receipt Models ===

/// Body of POST /receipts/process. Every field defaults so that missing
/// fields surface as validation errors rather than a JSON error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReceiptRequest {
    #[serde(default)]
    pub retailer: String,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default)]
    pub purchase_time: String,
    #[serde(default)]
    pub items: Vec<ItemRequest>,
    #[serde(default)]
    pub total: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub price: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessReceiptResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetPointsResponse {
    pub points: u64,
}

// === General Models ===

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_text: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorResponse {
    pub status_text: String,
    pub message: String,
    pub errors: Vec<FieldError>,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub patient_id: i64,
    pub date: String,
    pub diagnosis: String,
    pub prescription: String,
    pub doctor: String,
    pub price: f64,
}

/// Visit history row joined to the owning patient's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitListing {
    pub id: i64,
    pub patient_id: Option<i64>,
    /// "Unknown" when the patient row is gone.
    pub patient_name: String,
    pub date: String,
    pub diagnosis: String,
    pub prescription: String,
    pub doctor: String,
    pub price: f64,
}

impl VisitListing {
    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price)
    }
}

/// Unvalidated visit fields. `price: None` means the field was left blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitInput {
    pub patient_id: i64,
    pub date: String,
    pub diagnosis: String,
    pub prescription: String,
    pub doctor: String,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitFields {
    pub patient_id: i64,
    pub date: String,
    pub diagnosis: String,
    pub prescription: String,
    pub doctor: String,
    pub price: f64,
}

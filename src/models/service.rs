use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub tenant_id: String,
    pub personnel_id: String,
    pub name: String,
    pub price_cents: i64,
    pub duration_minutes: i64,
}

impl Service {
    pub fn price(&self) -> f64 {
        self.price_cents as f64 / 100.0
    }
}

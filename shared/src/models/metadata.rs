use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Metadata ---

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Metadata {
    pub id: Uuid,
    pub name: String,
    pub labels: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub generation: u16,
}

impl Metadata {
    pub fn named(name: &str) -> Self {
        Metadata {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        let id = Uuid::new_v4();
        Metadata {
            id,
            name: id.to_string(),
            labels: HashMap::new(),
            created_at: Utc::now(),
            generation: 0,
        }
    }
}

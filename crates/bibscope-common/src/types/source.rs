use serde::{Deserialize, Serialize};

/// Adapter catalog entry for `GET /data/sources` (spec §6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: String,
    pub name: String,
    pub rate_limit_s: f64,
    pub registered: bool,
}

// src/models/admin.rs
// DOCUMENTATION: Master administrator accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct MasterAdmin {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterAdminResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl MasterAdmin {
    pub fn to_response(&self) -> MasterAdminResponse {
        MasterAdminResponse {
            id: self.id,
            name: self.name.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// POST /api/auth/create-master-admin
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMasterAdminRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

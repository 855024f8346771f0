use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: String,
}

#[derive(Debug, Deserialize)]
pub struct NewContact {
    pub name: Option<String>,
    pub email: String,
    pub subject: String,
    pub message: String,
}

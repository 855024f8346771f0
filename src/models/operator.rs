use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Operator {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

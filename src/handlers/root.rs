use axum::Json;
use serde_json::{json, Value};

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Welcome to Kasho!" }))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ContactRequestId;

/// Row shape accepted by the `contact` store. Field names are the wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContactRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertContactResponse {
    pub id: ContactRequestId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequestRecord {
    pub id: ContactRequestId,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_phone_is_sent_as_explicit_null() {
        let request = NewContactRequest {
            full_name: "Ana Ruiz".into(),
            email: "ana@correo.com".into(),
            phone_number: None,
            subject: "Consulta".into(),
            message: "Hola".into(),
        };
        let value = serde_json::to_value(&request).expect("json");
        assert_eq!(value["full_name"], "Ana Ruiz");
        assert!(value.get("phone_number").expect("key present").is_null());
    }
}

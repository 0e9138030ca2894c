//! Success envelope

use serde::Serialize;

/// Success envelope: `success` plus exactly one payload key
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<T>,
}

impl<T> ApiResponse<T> {
    fn empty() -> Self {
        Self {
            success: true,
            data: None,
            created: None,
            updated: None,
            deleted: None,
        }
    }

    /// Result of a read
    pub fn data(payload: T) -> Self {
        Self {
            data: Some(payload),
            ..Self::empty()
        }
    }

    pub fn created(payload: T) -> Self {
        Self {
            created: Some(payload),
            ..Self::empty()
        }
    }

    pub fn updated(payload: T) -> Self {
        Self {
            updated: Some(payload),
            ..Self::empty()
        }
    }

    pub fn deleted(payload: T) -> Self {
        Self {
            deleted: Some(payload),
            ..Self::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_has_single_payload_key() {
        let value = serde_json::to_value(ApiResponse::deleted(7)).unwrap();
        assert_eq!(value, json!({ "success": true, "deleted": 7 }));

        let value = serde_json::to_value(ApiResponse::data(vec!["a"])).unwrap();
        assert_eq!(value, json!({ "success": true, "data": ["a"] }));
    }
}

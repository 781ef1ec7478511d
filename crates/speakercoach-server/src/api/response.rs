use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{"status": "success"|"error", "message"?: ..., "data"?: ...}`
#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Bare `{"status": "success"}`.
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_has_only_status() {
        let value = serde_json::to_value(ApiResponse::<()>::success()).unwrap();
        assert_eq!(value, json!({"status": "success"}));
    }

    #[test]
    fn test_error_shape() {
        let value = serde_json::to_value(ApiResponse::<()>::error("Invalid method")).unwrap();
        assert_eq!(value, json!({"status": "error", "message": "Invalid method"}));
    }

    #[test]
    fn test_ok_carries_data() {
        let value = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(value, json!({"status": "success", "data": [1, 2]}));
    }
}

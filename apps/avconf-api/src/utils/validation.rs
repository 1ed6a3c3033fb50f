//! 输入验证辅助函数
//!
//! 提供统一的输入验证函数：
//! - normalize_required：验证必填字段，去除空格并检查非空
//! - normalize_optional：验证可选字段，空白视为未提供
//! - ensure_path_matches：路径参数与请求体字段必须一致
//!
//! 失败返回 bad_request_error 响应（纯文本）。

use crate::utils::response::bad_request_error;
use axum::response::Response;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 验证可选字段，去除空格，空白字符串视为 None
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 路径参数与请求体字段必须一致
pub fn ensure_path_matches(path_value: &str, body_value: &str, field: &str) -> Result<(), Response> {
    if path_value != body_value {
        return Err(bad_request_error(format!(
            "{field} in the path ({path_value}) does not match the request body ({body_value})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn required_is_trimmed() {
        assert_eq!(normalize_required("  D1 ".to_string(), "name").ok(), Some("D1".to_string()));
        let response = normalize_required("   ".to_string(), "name").expect_err("empty");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_optional_is_none() {
        assert_eq!(normalize_optional(Some(" ".to_string())), None);
        assert_eq!(normalize_optional(Some("Left".to_string())), Some("Left".to_string()));
    }

    #[test]
    fn path_mismatch_is_bad_request() {
        assert!(ensure_path_matches("D1", "D1", "device").is_ok());
        let response = ensure_path_matches("D1", "D2", "device").expect_err("mismatch");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

//! Bearer token 声明解析
//!
//! 只做 base64url 解码 + JSON 解析，不校验签名：角色仅用于界面展示和
//! 路由守卫，所有管理操作都由服务端重新鉴权。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{AppError, AppResult};

/// 解码 JWT 的 payload 段
pub fn decode_claims(token: &str) -> AppResult<serde_json::Map<String, serde_json::Value>> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_), Some(payload)) if !payload.is_empty() => payload,
        _ => return Err(AppError::InvalidToken("missing payload segment".into())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::InvalidToken(format!("payload is not base64url: {}", e)))?;

    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(serde_json::Value::Object(claims)) => Ok(claims),
        Ok(_) => Err(AppError::InvalidToken("payload is not a JSON object".into())),
        Err(e) => Err(AppError::InvalidToken(format!("payload is not JSON: {}", e))),
    }
}

/// 读取 `role` 声明，声明缺失或不是字符串时返回 `None`
pub fn decode_role(token: &str) -> AppResult<Option<String>> {
    let claims = decode_claims(token)?;
    Ok(claims
        .get("role")
        .and_then(|role| role.as_str())
        .map(str::to_string))
}

#[cfg(test)]
pub(crate) fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

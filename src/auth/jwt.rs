//! JWT 校验（Supabase 签发的访问令牌）

use crate::{config::AppConfig, error::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT 声明
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,

    /// 受众（已登录用户为 "authenticated"）
    pub aud: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// 令牌对应的 Postgres 角色，不是业务角色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    pub iat: i64,

    pub exp: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    audience: String,
}

impl JwtService {
    /// 从配置创建 JWT 服务
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // HS256 密钥至少 32 字节
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience: config.security.jwt_audience.clone(),
        })
    }

    /// 签发与认证服务同结构的令牌（测试和本地工具使用）
    pub fn issue_token(
        &self,
        user_id: &Uuid,
        email: Option<&str>,
        ttl_secs: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            aud: self.audience.clone(),
            email: email.map(str::to_string),
            role: Some("authenticated".to_string()),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience.as_str()]);

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                AppError::Unauthorized
            })?
            .claims)
    }

    /// 验证令牌并从 `sub` 中取出用户 ID
    pub fn user_id(&self, token: &str) -> Result<(Uuid, Claims), AppError> {
        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
        Ok((user_id, claims))
    }
}

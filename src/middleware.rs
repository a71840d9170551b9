//! HTTP 中间件与应用状态

use axum::{extract::Request, http::HeaderMap, http::HeaderValue, middleware::Next, response::Response};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    access::AccessGuard,
    auth::JwtService,
    config::AppConfig,
    error::AppError,
    repository::{GrantStore, PgGrantRepository, PgResourceRepository, ResourceDirectory},
    services::{AccessService, GrantService, SessionService},
};

/// 应用状态
///
/// 服务以 Arc 共享，克隆只是指针拷贝。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: PgPool,
    pub jwt_service: Arc<JwtService>,
    pub sessions: Arc<SessionService>,
    pub access_service: Arc<AccessService>,
    pub grant_service: Arc<GrantService>,
}

impl AppState {
    /// 使用 Postgres 存储构建
    pub fn new(config: AppConfig, db: PgPool) -> Result<Self, AppError> {
        let grants: Arc<dyn GrantStore> = Arc::new(PgGrantRepository::new(db.clone()));
        let resources: Arc<dyn ResourceDirectory> = Arc::new(PgResourceRepository::new(db.clone()));
        Self::with_stores(config, db, grants, resources)
    }

    /// 注入任意存储实现（测试使用内存实现）
    pub fn with_stores(
        config: AppConfig,
        db: PgPool,
        grants: Arc<dyn GrantStore>,
        resources: Arc<dyn ResourceDirectory>,
    ) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config(&config)?);
        let sessions = Arc::new(SessionService::new(
            grants.clone(),
            Duration::from_secs(config.access.session_ttl_secs),
        ));
        let access_service = Arc::new(AccessService::new(
            sessions.clone(),
            resources,
            AccessGuard::from_config(&config.access),
        ));
        let grant_service = Arc::new(GrantService::new(grants, sessions.clone()));

        Ok(Self {
            config,
            db,
            jwt_service,
            sessions,
            access_service,
            grant_service,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let uri = req.uri().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            204 => "204",
            400 => "400",
            401 => "401",
            403 => "403",
            404 => "404",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{handlers, middleware::AppState};

fn cors_layer(state: &AppState) -> CorsLayer {
    let configured = state.config.security.allowed_origins.as_deref().unwrap_or_default();

    // "*" 不能放进来源列表（AllowOrigin::list 会 panic），单独映射为任意来源
    let allow_origin = if configured.iter().any(|o| o.trim() == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = configured
            .iter()
            .filter_map(|o| HeaderValue::from_str(o.trim()).ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .expose_headers([axum::http::header::LOCATION])
}

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 身份可选：匿名请求得到空授权集合
    let api_routes = Router::new()
        .route("/api/v1/access/capabilities", get(handlers::access::get_capabilities))
        .route("/api/v1/access/{kind}/{id}", get(handlers::access::probe_access))
        .route("/api/v1/resources/{kind}/{id}", get(handlers::access::get_resource))
        .route(
            "/api/v1/session",
            post(handlers::session::establish_session).delete(handlers::session::end_session),
        )
        .route(
            "/api/v1/users/{id}/permissions",
            get(handlers::permission::list_user_permissions)
                .post(handlers::permission::grant_permission),
        )
        .route(
            "/api/v1/users/{id}/permissions/{tag}",
            axum::routing::delete(handlers::permission::revoke_permission),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::identity_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(cors_layer(&state))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

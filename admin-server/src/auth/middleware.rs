//! Auth Middleware
//!
//! Axum middleware for JWT authentication and role checks.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;

/// Routes reachable without a token
fn is_public_api_route(path: &str) -> bool {
    path == "/api/auth/login" || path == "/api/health"
}

/// Authentication middleware
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// checks that the session it references is still live, and injects
/// [`CurrentUser`] into request extensions.
///
/// Skipped for OPTIONS requests (CORS preflight), non-`/api/` paths,
/// and public routes.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes fall through to their own 404
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token validation failed");
            return Err(match e {
                crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    let user = CurrentUser::from_claims(claims)
        .map_err(|_| AppError::invalid_token("Malformed token claims"))?;

    // A valid token without a live session is rejected (logged out or expired)
    if !state.sessions.is_live(user.session_id, user.id) {
        tracing::warn!(target: "security", user_id = user.id, "Session revoked or expired");
        return Err(AppError::new(shared::ErrorCode::SessionExpired));
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Admin middleware
///
/// Requires `CurrentUser.role == Admin`; 403 otherwise.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = user.id,
            email = %user.email,
            "Admin role required"
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

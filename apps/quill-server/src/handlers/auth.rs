//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{LoginRequest, RegisterRequest, SessionResponse};

use crate::middleware::error::{AppError, AppResult, INVALID_CREDENTIALS};
use crate::middleware::session::CurrentSession;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .credentials
        .register(&req.name, &req.email, &req.password)
        .await?
        .ok_or_else(|| AppError::Conflict("Email already registered".to_string()))?;

    Ok(HttpResponse::Created().json(SessionResponse::from(session)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .credentials
        .login(&req.email, &req.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    Ok(HttpResponse::Ok().json(SessionResponse::from(session)))
}

/// POST /api/auth/logout
pub async fn logout(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    state.credentials.logout().await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/session - Protected route
pub async fn session(session: CurrentSession) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SessionResponse::from(session.0)))
}

/// GET /api/accounts/{id}
pub async fn account_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let profile = state
        .credentials
        .find_account(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account with id {} not found", id)))?;

    Ok(HttpResponse::Ok().json(SessionResponse::from(profile)))
}

//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{PostPatch, PostQuery};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, PostListParams};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::CurrentSession;
use crate::state::AppState;

fn ensure_loaded(state: &AppState) -> AppResult<()> {
    if state.posts.is_loading() {
        return Err(AppError::Unavailable("Posts are still loading".to_string()));
    }
    Ok(())
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Post with id {} not found", id))
}

/// GET /api/posts?category=&q=
pub async fn list_posts(
    state: web::Data<AppState>,
    params: web::Query<PostListParams>,
) -> AppResult<HttpResponse> {
    ensure_loaded(&state)?;

    let query = PostQuery::from(params.into_inner());
    let posts = state.posts.search(&query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::list(posts)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    ensure_loaded(&state)?;
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(HttpResponse::Ok().json(post))
}

/// GET /api/posts/by-author/{author_id}
pub async fn posts_by_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    ensure_loaded(&state)?;

    let posts = state.posts.find_by_author(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(posts)))
}

/// POST /api/posts - Requires a session
pub async fn create_post(
    state: web::Data<AppState>,
    session: CurrentSession,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    ensure_loaded(&state)?;
    let req = body.into_inner();

    let missing = req.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::Validation(
            missing.into_iter().map(|f| format!("{} is required", f)).collect(),
        ));
    }

    let bad_image = req
        .image
        .as_deref()
        .is_some_and(|i| !i.is_empty() && !i.starts_with("data:"));
    if bad_image {
        return Err(AppError::Validation(vec![
            "image must be a data URI".to_string(),
        ]));
    }

    let post = state
        .posts
        .create(req.into_new_post().authored_by(&session.0))
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// PATCH /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostPatch>,
) -> AppResult<HttpResponse> {
    ensure_loaded(&state)?;
    let id = path.into_inner();

    let post = state
        .posts
        .update(&id, body.into_inner())
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    ensure_loaded(&state)?;
    let id = path.into_inner();

    if !state.posts.delete(&id).await? {
        return Err(not_found(&id));
    }

    Ok(HttpResponse::NoContent().finish())
}

//! Session extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;

use quill_core::domain::Session;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The current session; rejects the request with 401 when nobody is signed in.
///
/// ```ignore
/// async fn protected_route(session: CurrentSession) -> impl Responder {
///     format!("Hello, {}!", session.0.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl FromRequest for CurrentSession {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("Server configuration error".to_string()));
            };

            state
                .credentials
                .current_session()
                .await
                .map(CurrentSession)
                .ok_or_else(|| AppError::Unauthorized("Please login first".to_string()))
        })
    }
}

use crate::error::{AppError, Result};
use crate::model::{ShortenBody, ShortenResponse, UnshortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use minilink_core::{ShortCode, ShortenRequest};

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenBody>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(body) = payload.map_err(|rejection| AppError::BadRequest(rejection.to_string()))?;

    let code = state
        .shortener()
        .shorten(ShortenRequest {
            full_link: body.full_link,
            user_id: body.user_id,
            auth_token: body.auth_token,
        })
        .await?;

    Ok(Json(ShortenResponse {
        shortened: code.to_string(),
    }))
}

pub async fn unshorten_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UnshortenResponse>> {
    let code = ShortCode::new_unchecked(code);

    let response = match state.shortener().resolve(&code).await? {
        Some(resolved) => UnshortenResponse::Found {
            full_link: resolved.full_link,
            lookups: resolved.lookups,
        },
        None => UnshortenResponse::NotFound {
            error: "Link not Found",
        },
    };

    Ok(Json(response))
}

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = ShortCode::new_unchecked(code);

    match state.shortener().resolve_and_redirect(&code).await? {
        Some(full_link) => Ok(Redirect::temporary(&full_link).into_response()),
        None => Err(AppError::NotFound),
    }
}

use crate::dtos::FashionResponse;
use crate::models::FashionItem;
use crate::services::{DecodeError, StoreError};
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

pub const BANNER: &str = "This Web server is processed for MongoDB";

const LIST_ERROR: &str = "Error fetching data from MongoDB";
const GET_ERROR: &str = "Error fetching fashion item";
const SAVE_ERROR: &str = "Error saving fashion data";

pub async fn index() -> &'static str {
    BANNER
}

#[tracing::instrument(skip(state))]
pub async fn list_fashions(
    State(state): State<AppState>,
) -> Result<Json<Vec<FashionResponse>>, AppError> {
    let items = state
        .store
        .find_all()
        .await
        .map_err(|e| AppError::internal(LIST_ERROR, e))?;

    tracing::debug!(count = items.len(), "Listed fashion items");

    Ok(Json(items.into_iter().map(FashionResponse::from).collect()))
}

#[tracing::instrument(skip(state))]
pub async fn get_fashion(
    State(state): State<AppState>,
    Path(fashion_id): Path<String>,
) -> Result<Json<FashionResponse>, AppError> {
    match state.store.find_by_id(&fashion_id).await {
        Ok(Some(item)) => Ok(Json(FashionResponse::from(item))),
        Ok(None) => Err(AppError::NotFound(anyhow::anyhow!("Fashion item not found"))),
        Err(StoreError::InvalidIdentifier(_)) => {
            tracing::debug!(fashion_id = %fashion_id, "Rejected malformed fashion id");
            Err(AppError::BadRequest(anyhow::anyhow!("Invalid fashion id")))
        }
        Err(e) => Err(AppError::internal(GET_ERROR, e)),
    }
}

/// Stores a new item from a multipart form. The response echoes the record as
/// submitted; the assigned id is only exposed through `Location`.
#[tracing::instrument(skip_all)]
pub async fn create_fashion(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let multipart = multipart.map_err(|e| AppError::internal(SAVE_ERROR, anyhow::anyhow!(e)))?;

    let mut upload = state.decoder.decode(multipart).await.map_err(|e| match e {
        DecodeError::PayloadTooLarge { limit } => {
            tracing::warn!(limit, "Rejected oversized upload");
            AppError::PayloadTooLarge(anyhow::anyhow!("File too large (max {} bytes)", limit))
        }
        other => AppError::internal(SAVE_ERROR, other),
    })?;

    let item = FashionItem::new(
        upload.take_field("style"),
        upload.take_field("fashion_subject"),
        upload.take_field("fashion_detail"),
        upload.attachment.as_bytes(),
    );

    let id = state
        .store
        .insert(&item)
        .await
        .map_err(|e| AppError::internal(SAVE_ERROR, e))?;

    tracing::info!(
        fashion_id = %id,
        has_image = item.fashion_image.is_some(),
        "Fashion item created"
    );

    Ok((
        [(header::LOCATION, format!("/fashions/{}", id.to_hex()))],
        Json(FashionResponse::from(item)),
    ))
}

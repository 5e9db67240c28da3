use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{error, info, instrument};

use crate::{
    error::ApiError,
    list::{
        dto::{AddAnimeRequest, ListResponse, MessageResponse},
        repo::{self, AnimeMetadata},
    },
    session::Authenticated,
    state::AppState,
};

/// GET /api/list/:status
#[instrument(skip(state, auth))]
pub async fn list_by_status(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(status): Path<String>,
) -> Result<Json<ListResponse>, ApiError> {
    let animes = repo::list_by_status(&state.db, auth.user.user_id, &status).await?;
    Ok(Json(ListResponse {
        success: true,
        animes,
    }))
}

/// POST /api/add_anime. Caches the title metadata and upserts the list
/// entry in one transaction.
#[instrument(skip(state, auth, payload))]
pub async fn add_anime(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(payload): Json<AddAnimeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let required = || ApiError::Validation("ID do Anime e Status são obrigatórios.".into());
    let anime_id = payload.anime_id.ok_or_else(required)?;
    let status = payload.status.unwrap_or_default();
    let status = status.trim();
    if status.is_empty() {
        return Err(required());
    }

    let meta = AnimeMetadata {
        id: anime_id,
        title: payload
            .title
            .unwrap_or_else(|| format!("Anime ID {anime_id}")),
        genre: payload.genre.unwrap_or_else(|| "N/A".into()),
        year: payload.year.unwrap_or(0),
        platform: payload.platform.unwrap_or_else(|| "N/A".into()),
        synopsis: payload.synopsis.unwrap_or_default(),
    };
    let notes = payload.notes.unwrap_or_default();

    repo::add_or_update(&state.db, auth.user.user_id, &meta, status, &notes)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = auth.user.user_id, anime_id, "add_or_update failed");
            ApiError::StoreFailure("Não foi possível adicionar o anime à lista.".into())
        })?;
    info!(user_id = auth.user.user_id, anime_id, status, "list entry upserted");
    Ok(Json(MessageResponse {
        success: true,
        message: "Anime adicionado à lista com sucesso.".into(),
    }))
}

/// DELETE /api/list/:id_anime
#[instrument(skip(state, auth))]
pub async fn remove_anime(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let anime_id: i64 = raw_id
        .parse()
        .map_err(|_| ApiError::Validation("ID do Anime inválido.".into()))?;

    let removed = repo::delete(&state.db, auth.user.user_id, anime_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Anime não está na lista.".into()));
    }
    info!(user_id = auth.user.user_id, anime_id, "list entry removed");
    Ok(Json(MessageResponse {
        success: true,
        message: "Anime removido da lista.".into(),
    }))
}

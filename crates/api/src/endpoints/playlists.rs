//! Playlist endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use vidtube_common::{AppResult, Page};
use vidtube_core::{CreatePlaylistInput, PlaylistDetail, PlaylistSummary, UpdatePlaylistInput};
use vidtube_db::entities::playlist;

use crate::{
    extractors::{AuthUser, JsonBody, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/{user_id}", get(user_playlists))
        .route(
            "/{playlist_id}",
            get(get_playlist)
                .patch(update_playlist)
                .delete(delete_playlist),
        )
        .route("/add/{video_id}/{playlist_id}", patch(add_video))
        .route("/remove/{video_id}/{playlist_id}", patch(remove_video))
}

async fn create_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreatePlaylistInput>,
) -> AppResult<ApiResponse<playlist::Model>> {
    let playlist = state.playlist_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(playlist, "Playlist created"))
}

async fn user_playlists(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<PlaylistSummary>>> {
    let playlists = state.playlist_service.list_by_user(&user_id, page).await?;
    Ok(ApiResponse::ok(playlists, "Playlists fetched"))
}

async fn get_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<PlaylistDetail>> {
    let playlist = state.playlist_service.get(&user.id, &playlist_id).await?;
    Ok(ApiResponse::ok(playlist, "Playlist fetched"))
}

async fn update_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    JsonBody(input): JsonBody<UpdatePlaylistInput>,
) -> AppResult<ApiResponse<playlist::Model>> {
    let playlist = state
        .playlist_service
        .update(&user.id, &playlist_id, input)
        .await?;
    Ok(ApiResponse::ok(playlist, "Playlist updated"))
}

async fn delete_playlist(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<playlist::Model>> {
    let playlist = state.playlist_service.delete(&user.id, &playlist_id).await?;
    Ok(ApiResponse::ok(playlist, "Playlist deleted"))
}

async fn add_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PlaylistDetail>> {
    let playlist = state
        .playlist_service
        .add_video(&user.id, &video_id, &playlist_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video added to playlist"))
}

async fn remove_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PlaylistDetail>> {
    let playlist = state
        .playlist_service
        .remove_video(&user.id, &video_id, &playlist_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "Video removed from playlist"))
}

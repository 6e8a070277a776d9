//! Video endpoints.

use axum::{
    Router,
    extract::{Multipart, Path, State, multipart::Field},
    routing::{get, patch},
};
use vidtube_common::{AppError, AppResult, Page};
use vidtube_core::{MediaUpload, PublishVideoInput, UpdateVideoInput, VideoListQuery};
use vidtube_db::entities::video;

use crate::{
    extractors::{AuthUser, Pagination, QueryParams},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(publish_video))
        .route(
            "/{video_id}",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/toggle/publish/{video_id}", patch(toggle_publish))
}

/// Text fields and files of a video form.
#[derive(Debug, Default)]
struct VideoForm {
    title: Option<String>,
    description: Option<String>,
    is_published: Option<bool>,
    duration: Option<f64>,
    video_file: Option<MediaUpload>,
    thumbnail: Option<MediaUpload>,
}

impl VideoForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "videoFile" => form.video_file = Some(read_file(field).await?),
                "thumbnail" => form.thumbnail = Some(read_file(field).await?),
                "title" => form.title = Some(field.text().await.map_err(bad_form)?),
                "description" => {
                    form.description = Some(field.text().await.map_err(bad_form)?);
                }
                "isPublished" => {
                    let text = field.text().await.map_err(bad_form)?;
                    form.is_published = Some(parse_flag(&text)?);
                }
                "duration" => {
                    let text = field.text().await.map_err(bad_form)?;
                    if !text.trim().is_empty() {
                        let duration = text.trim().parse::<f64>().map_err(|_| {
                            AppError::InvalidArgument(format!("Invalid duration: {text}"))
                        })?;
                        form.duration = Some(duration);
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_file(field: Field<'_>) -> AppResult<MediaUpload> {
    let filename = field.file_name().map(ToString::to_string);
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field.bytes().await.map_err(bad_form)?.to_vec();

    Ok(MediaUpload {
        filename,
        content_type,
        data,
    })
}

fn parse_flag(text: &str) -> AppResult<bool> {
    match text.trim() {
        "" | "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(AppError::InvalidArgument(format!(
            "Invalid isPublished: {other}"
        ))),
    }
}

fn bad_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::InvalidArgument(e.body_text())
}

async fn list_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<VideoListQuery>,
    Pagination(page): Pagination,
) -> AppResult<ApiResponse<Page<video::Model>>> {
    let videos = state.video_service.list(&user.id, &query, page).await?;
    Ok(ApiResponse::ok(videos, "Videos fetched"))
}

async fn publish_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<video::Model>> {
    let form = VideoForm::read(multipart).await?;
    let input = PublishVideoInput {
        title: form.title.unwrap_or_default(),
        description: form.description.unwrap_or_default(),
        is_published: form.is_published.unwrap_or(true),
        duration: form.duration,
    };

    let video = state
        .video_service
        .publish(&user.id, input, form.video_file, form.thumbnail)
        .await?;
    Ok(ApiResponse::created(video, "Video published"))
}

async fn get_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<video::Model>> {
    let video = state.video_service.get(&user.id, &video_id).await?;
    Ok(ApiResponse::ok(video, "Video fetched"))
}

async fn update_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<video::Model>> {
    let form = VideoForm::read(multipart).await?;
    let input = UpdateVideoInput {
        title: form.title,
        description: form.description,
    };

    let video = state
        .video_service
        .update(&user.id, &video_id, input, form.thumbnail)
        .await?;
    Ok(ApiResponse::ok(video, "Video updated"))
}

async fn delete_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<video::Model>> {
    let video = state.video_service.delete(&user.id, &video_id).await?;
    Ok(ApiResponse::ok(video, "Video deleted"))
}

async fn toggle_publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<video::Model>> {
    let video = state.video_service.toggle_publish(&user.id, &video_id).await?;
    let message = if video.is_published {
        "Video published"
    } else {
        "Video unpublished"
    };
    Ok(ApiResponse::ok(video, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(matches!(parse_flag("true"), Ok(true)));
        assert!(matches!(parse_flag(""), Ok(true)));
        assert!(matches!(parse_flag("0"), Ok(false)));
        assert!(matches!(
            parse_flag("maybe"),
            Err(AppError::InvalidArgument(_))
        ));
    }
}

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    adapters::{
        dto::file_dto::{FileResponse, ListFilesQuery, RenameFileRequest, ViewFileQuery},
        middleware::resolve_owner_id,
        state::AppState,
    },
    application::error::ApplicationError,
};

pub struct FileController;

impl FileController {
    /// POST /api/v1/files
    /// Multipart body with a single "file" part; its filename and content
    /// type become the record's declared name and type.
    pub async fn upload_file(
        State(app_state): State<AppState>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<(StatusCode, Json<FileResponse>), ApplicationError> {
        let owner_id = resolve_owner_id(&app_state, &headers)?;

        let mut file_bytes: Option<Vec<u8>> = None;
        let mut filename: Option<String> = None;
        let mut content_type: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            ApplicationError::BadRequest("Invalid request format".to_string())
        })? {
            if field.name() != Some("file") {
                continue;
            }

            filename = field.file_name().map(|name| name.to_string());
            content_type = field.content_type().map(|mime| mime.to_string());
            file_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        warn!("Cannot read file bytes: {}", e);
                        ApplicationError::BadRequest("Invalid file data".to_string())
                    })?
                    .to_vec(),
            );
        }

        let file_bytes = file_bytes.ok_or_else(|| {
            warn!("Missing required 'file' part in upload");
            ApplicationError::BadRequest("Missing required field".to_string())
        })?;
        let filename = filename.ok_or_else(|| {
            warn!("Upload 'file' part carries no filename");
            ApplicationError::BadRequest("Missing filename".to_string())
        })?;

        info!(
            "Uploading {} ({} bytes) for owner {}",
            filename,
            file_bytes.len(),
            owner_id
        );

        let view = app_state
            .file_service
            .upload(file_bytes, &filename, content_type, &owner_id)
            .await?;

        Ok((StatusCode::CREATED, Json(FileResponse::from(view))))
    }

    /// GET /api/v1/files?name=
    pub async fn list_files(
        State(app_state): State<AppState>,
        headers: HeaderMap,
        Query(query): Query<ListFilesQuery>,
    ) -> Result<Json<Vec<FileResponse>>, ApplicationError> {
        let owner_id = resolve_owner_id(&app_state, &headers)?;

        let views = app_state
            .file_service
            .list(&owner_id, query.name.as_deref())
            .await?;

        Ok(Json(views.into_iter().map(FileResponse::from).collect()))
    }

    /// GET /api/v1/public/files
    pub async fn list_public_files(
        State(app_state): State<AppState>,
    ) -> Result<Json<Vec<FileResponse>>, ApplicationError> {
        let views = app_state.file_service.list_public().await?;
        Ok(Json(views.into_iter().map(FileResponse::from).collect()))
    }

    /// GET /api/v1/files/{id}
    pub async fn get_file_metadata(
        State(app_state): State<AppState>,
        Path(file_id): Path<Uuid>,
    ) -> Result<Json<FileResponse>, ApplicationError> {
        let view = app_state.file_service.get(file_id).await?;
        Ok(Json(FileResponse::from(view)))
    }

    /// GET /api/v1/files/{id}/view?download=
    pub async fn view_file(
        State(app_state): State<AppState>,
        Path(file_id): Path<Uuid>,
        Query(query): Query<ViewFileQuery>,
    ) -> Result<Response, ApplicationError> {
        let (view, content) = app_state.file_service.retrieve(file_id).await?;

        let content_type = view
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let disposition = if query.download { "attachment" } else { "inline" };

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, content.len())
            .header(
                header::CONTENT_DISPOSITION,
                format!("{}; filename=\"{}\"", disposition, view.name),
            )
            .body(Body::from(content))
            .map_err(|e| ApplicationError::BadRequest(e.to_string()))?;

        Ok(response)
    }

    /// PATCH /api/v1/files/{id}/toggle-public
    pub async fn toggle_public(
        State(app_state): State<AppState>,
        Path(file_id): Path<Uuid>,
    ) -> Result<Json<FileResponse>, ApplicationError> {
        let view = app_state.file_service.toggle_visibility(file_id).await?;
        info!("File {} visibility toggled to {}", file_id, view.is_public);
        Ok(Json(FileResponse::from(view)))
    }

    /// PATCH /api/v1/files/{id}/rename
    pub async fn rename_file(
        State(app_state): State<AppState>,
        Path(file_id): Path<Uuid>,
        Json(body): Json<RenameFileRequest>,
    ) -> Result<Json<FileResponse>, ApplicationError> {
        let view = app_state.file_service.rename(file_id, &body.name).await?;
        Ok(Json(FileResponse::from(view)))
    }

    /// DELETE /api/v1/files/{id}
    pub async fn delete_file(
        State(app_state): State<AppState>,
        Path(file_id): Path<Uuid>,
    ) -> Result<StatusCode, ApplicationError> {
        app_state.file_service.delete(file_id).await?;
        info!("File {} deleted", file_id);
        Ok(StatusCode::NO_CONTENT)
    }
}

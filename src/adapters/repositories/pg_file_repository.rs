use async_trait::async_trait;
use sqlx::{query_as, QueryBuilder};
use uuid::Uuid;

use crate::{
    application::{
        dto::file_record_dto::FileRecordDTO, error::ApplicationError,
        repositories::file_repository::FileRepository,
    },
    domain::models::file::FileRecord,
};

/// Postgres-backed metadata store over the `application.files` table:
/// id uuid primary key, name text, content_type text null, size bigint,
/// storage_key text unique, owner_id text, is_public boolean,
/// created_at timestamptz.
pub struct PgFileRepository {
    pool: sqlx::PgPool,
}

impl PgFileRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::RowNotFound => ApplicationError::NotFound,
        other => ApplicationError::DatabaseError(other.to_string()),
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn create(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
        let mut record = record;
        record.sanitize();
        // The repository assigns the id; it is unrelated to the storage key.
        record.id = Uuid::new_v4();

        let query = r#"
            INSERT INTO application.files (
                id, name, content_type, size, storage_key,
                owner_id, is_public, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        "#;

        let new_record: FileRecord = record.into();

        let created: FileRecordDTO = query_as::<_, FileRecordDTO>(query)
            .bind(new_record.id)
            .bind(&new_record.name)
            .bind(&new_record.content_type)
            .bind(new_record.size as i64)
            .bind(&new_record.storage_key)
            .bind(&new_record.owner_id)
            .bind(new_record.is_public)
            .bind(new_record.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(created.into())
    }

    async fn get(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        let query = "SELECT * FROM application.files WHERE id = $1";

        let fetched: FileRecordDTO = query_as::<_, FileRecordDTO>(query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(fetched.into())
    }

    async fn update(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
        let mut record = record;
        record.sanitize();

        // owner_id and created_at are write-once and never part of an update.
        if record.name.is_none()
            && record.content_type.is_none()
            && record.size.is_none()
            && record.storage_key.is_none()
            && record.is_public.is_none()
        {
            return self.get(record.id).await;
        }

        let mut builder = QueryBuilder::new("UPDATE application.files SET ");
        let mut separated = builder.separated(", ");

        if let Some(name) = &record.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(content_type) = &record.content_type {
            separated.push("content_type = ");
            separated.push_bind_unseparated(content_type);
        }
        if let Some(size) = record.size {
            separated.push("size = ");
            separated.push_bind_unseparated(size as i64);
        }
        if let Some(storage_key) = &record.storage_key {
            separated.push("storage_key = ");
            separated.push_bind_unseparated(storage_key);
        }
        if let Some(is_public) = record.is_public {
            separated.push("is_public = ");
            separated.push_bind_unseparated(is_public);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(record.id);
        builder.push(" RETURNING *");

        let query = builder.build_query_as::<FileRecordDTO>();

        let updated = query.fetch_one(&self.pool).await.map_err(map_db_error)?;

        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> Result<FileRecord, ApplicationError> {
        let query = "DELETE FROM application.files WHERE id = $1 RETURNING *";

        let deleted: FileRecordDTO = query_as::<_, FileRecordDTO>(query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(deleted.into())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<FileRecord>, ApplicationError> {
        let query = r#"
            SELECT * FROM application.files
            WHERE owner_id = $1
            ORDER BY created_at DESC
        "#;

        let rows: Vec<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|dto| dto.into()).collect())
    }

    async fn list_by_owner_and_name(
        &self,
        owner_id: &str,
        fragment: &str,
    ) -> Result<Vec<FileRecord>, ApplicationError> {
        let query = r#"
            SELECT * FROM application.files
            WHERE owner_id = $1 AND name ILIKE '%' || $2 || '%'
            ORDER BY created_at DESC
        "#;

        let rows: Vec<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .bind(owner_id)
            .bind(fragment)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|dto| dto.into()).collect())
    }

    async fn list_public(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        let query = r#"
            SELECT * FROM application.files
            WHERE is_public = TRUE
            ORDER BY created_at DESC
        "#;

        let rows: Vec<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|dto| dto.into()).collect())
    }
}

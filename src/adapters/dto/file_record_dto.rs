use sqlx::{postgres::PgRow, FromRow, Row};

use crate::application::dto::file_record_dto::FileRecordDTO;

impl FromRow<'_, PgRow> for FileRecordDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let size: i64 = row.try_get("size")?;

        Ok(FileRecordDTO {
            id: row.try_get("id")?,
            name: Some(row.try_get("name")?),
            content_type: row.try_get("content_type")?,
            size: Some(size as u64),
            storage_key: Some(row.try_get("storage_key")?),
            owner_id: Some(row.try_get("owner_id")?),
            is_public: Some(row.try_get("is_public")?),
            created_at: Some(row.try_get("created_at")?),
        })
    }
}

impl FileRecordDTO {
    pub fn sanitize(&mut self) {
        if let Some(size) = self.size {
            self.size = Some(std::cmp::min(size, i64::MAX as u64));
        }
    }
}

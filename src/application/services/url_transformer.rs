use uuid::Uuid;

use crate::domain::models::file::{FileRecord, FileView};

/// Derives the public retrieval URL for a record from its id alone.
///
/// Applied to every record before it leaves the file service, so the
/// physical `storage_key` never appears in a response.
#[derive(Debug, Clone)]
pub struct UrlTransformer {
    base_url: String,
}

impl UrlTransformer {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn view_url(&self, id: Uuid) -> String {
        format!("{}/api/v1/files/{}/view", self.base_url, id)
    }

    pub fn transform(&self, record: FileRecord) -> FileView {
        let url = self.view_url(record.id);
        FileView {
            id: record.id,
            name: record.name,
            content_type: record.content_type,
            size: record.size,
            owner_id: record.owner_id,
            is_public: record.is_public,
            created_at: record.created_at,
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn url_depends_on_id_only() {
        let transformer = UrlTransformer::new("http://localhost:8080/");
        let id = Uuid::new_v4();
        let record = FileRecord {
            id,
            name: "report.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            size: 42,
            storage_key: format!("{}_report.pdf", Uuid::new_v4()),
            owner_id: "owner-1".to_string(),
            is_public: false,
            created_at: Utc::now(),
        };

        let storage_key = record.storage_key.clone();
        let view = transformer.transform(record);

        assert_eq!(view.url, format!("http://localhost:8080/api/v1/files/{}/view", id));
        assert!(!view.url.contains(&storage_key));
        assert!(!view.url.contains("report.pdf"));
    }
}

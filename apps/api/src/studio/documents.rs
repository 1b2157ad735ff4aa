//! Studio documents.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::{ensure_owner, require_text, AppError};
use crate::models::document::StudioDocumentRow;

const MAX_TITLE_CHARS: usize = 200;
const MAX_CONTENT_CHARS: usize = 100_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    #[default]
    General,
    Email,
    LinkedinPost,
    Bio,
    Statement,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::General => "general",
            DocType::Email => "email",
            DocType::LinkedinPost => "linkedin_post",
            DocType::Bio => "bio",
            DocType::Statement => "statement",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub doc_type: DocType,
    #[serde(default)]
    pub content: String,
}

impl CreateDocumentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub doc_type: Option<DocType>,
    pub content: Option<String>,
}

impl UpdateDocumentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.is_none() && self.doc_type.is_none() && self.content.is_none() {
            return Err(AppError::Validation(
                "At least one of title, doc_type or content is required".to_string(),
            ));
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    require_text("title", title)?;
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "title exceeds {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), AppError> {
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::Validation(format!(
            "content exceeds {MAX_CONTENT_CHARS} characters"
        )));
    }
    Ok(())
}

pub async fn create_document(
    pool: &PgPool,
    user_email: &str,
    request: &CreateDocumentRequest,
) -> Result<StudioDocumentRow, AppError> {
    Ok(sqlx::query_as::<_, StudioDocumentRow>(
        r#"
        INSERT INTO studio_documents (user_email, title, doc_type, content)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_email)
    .bind(request.title.trim())
    .bind(request.doc_type.as_str())
    .bind(&request.content)
    .fetch_one(pool)
    .await?)
}

pub async fn list_documents(
    pool: &PgPool,
    user_email: &str,
) -> Result<Vec<StudioDocumentRow>, AppError> {
    Ok(sqlx::query_as::<_, StudioDocumentRow>(
        "SELECT * FROM studio_documents WHERE user_email = $1 ORDER BY updated_at DESC, id DESC",
    )
    .bind(user_email)
    .fetch_all(pool)
    .await?)
}

pub async fn load_owned_document(
    pool: &PgPool,
    id: i64,
    user_email: &str,
) -> Result<StudioDocumentRow, AppError> {
    let row = sqlx::query_as::<_, StudioDocumentRow>("SELECT * FROM studio_documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
    ensure_owner(&row.user_email, user_email)?;
    Ok(row)
}

pub async fn update_document(
    pool: &PgPool,
    id: i64,
    request: &UpdateDocumentRequest,
) -> Result<StudioDocumentRow, AppError> {
    Ok(sqlx::query_as::<_, StudioDocumentRow>(
        r#"
        UPDATE studio_documents
        SET title = COALESCE($1, title),
            doc_type = COALESCE($2, doc_type),
            content = COALESCE($3, content),
            updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(request.title.as_deref().map(str::trim))
    .bind(request.doc_type.map(|d| d.as_str()))
    .bind(request.content.as_deref())
    .bind(id)
    .fetch_one(pool)
    .await?)
}

pub async fn delete_document(pool: &PgPool, id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM studio_documents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let req: CreateDocumentRequest = serde_json::from_str(r#"{"title": "Bio draft"}"#).unwrap();
        assert_eq!(req.doc_type, DocType::General);
        assert!(req.content.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_doc_type_serde() {
        let req: CreateDocumentRequest =
            serde_json::from_str(r#"{"title": "Post", "doc_type": "linkedin_post"}"#).unwrap();
        assert_eq!(req.doc_type.as_str(), "linkedin_post");
    }

    #[test]
    fn test_title_limits() {
        let mut req = CreateDocumentRequest {
            title: " ".to_string(),
            doc_type: DocType::Email,
            content: String::new(),
        };
        assert!(req.validate().is_err());
        req.title = "t".repeat(MAX_TITLE_CHARS + 1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_update_rejected() {
        let req = UpdateDocumentRequest {
            title: None,
            doc_type: None,
            content: None,
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_content_only() {
        let req: UpdateDocumentRequest =
            serde_json::from_str(r#"{"content": "Dear hiring manager,"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_blank_title_rejected() {
        let req: UpdateDocumentRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }
}

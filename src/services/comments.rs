use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    auth::authorize_mutation,
    error::{AppError, Result},
    models::comment::{Comment, CommentView},
    pagination::Page,
};

#[derive(Clone)]
pub struct CommentService {
    db: SqlitePool,
}

impl CommentService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// The parent post must exist (and not be deleted) at creation time.
    pub async fn create(&self, actor_id: i64, post_id: i64, content: &str) -> Result<Comment> {
        self.ensure_post_exists(post_id).await?;

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (content, user_id, post_id, created_at) \
             VALUES (?, ?, ?, ?) \
             RETURNING id, content, user_id, post_id, created_at",
        )
        .bind(content)
        .bind(actor_id)
        .bind(post_id)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            user_id = actor_id,
            post_id,
            comment_id = comment.id,
            "comment created"
        );
        Ok(comment)
    }

    pub async fn get(&self, id: i64) -> Result<Comment> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))
    }

    pub async fn list_for_post(&self, post_id: i64, page: Page) -> Result<(Vec<CommentView>, i64)> {
        self.ensure_post_exists(post_id).await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE post_id = ? AND deleted_at IS NULL",
        )
        .bind(post_id)
        .fetch_one(&self.db)
        .await?;

        let comments = sqlx::query_as::<_, CommentView>(
            "SELECT c.id, c.content, c.user_id, u.username, c.created_at \
             FROM comments c JOIN users u ON u.id = c.user_id \
             WHERE c.post_id = ? AND c.deleted_at IS NULL \
             ORDER BY c.created_at DESC, c.id DESC \
             LIMIT ? OFFSET ?",
        )
        .bind(post_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((comments, total))
    }

    /// Owner-only soft delete.
    pub async fn delete(&self, actor_id: i64, id: i64) -> Result<()> {
        let comment = authorize_mutation(actor_id, self.find(id).await?)?;

        sqlx::query("UPDATE comments SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(Utc::now())
            .bind(comment.id)
            .execute(&self.db)
            .await?;

        tracing::info!(user_id = actor_id, comment_id = id, "comment deleted");
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, content, user_id, post_id, created_at \
             FROM comments WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(comment)
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<()> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(post_id)
        .fetch_one(&self.db)
        .await?;

        if count == 0 {
            tracing::warn!(post_id, "comment target post does not exist");
            return Err(AppError::NotFound("post not found".to_string()));
        }
        Ok(())
    }
}

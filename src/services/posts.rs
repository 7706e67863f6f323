use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    auth::authorize_mutation,
    error::{AppError, Result},
    models::{
        comment::CommentView,
        post::{Post, PostDetail, PostSummary},
    },
    pagination::Page,
};

#[derive(sqlx::FromRow)]
struct PostWithAuthor {
    #[sqlx(flatten)]
    post: Post,
    username: String,
}

#[derive(Clone)]
pub struct PostService {
    db: SqlitePool,
}

impl PostService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, actor_id: i64, title: &str, content: &str) -> Result<Post> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (title, content, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, title, content, user_id, created_at, updated_at",
        )
        .bind(title)
        .bind(content)
        .bind(actor_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = actor_id, post_id = post.id, "post created");
        Ok(post)
    }

    /// A post with its author and all of its live comments, oldest first.
    pub async fn get(&self, id: i64) -> Result<PostDetail> {
        let row = sqlx::query_as::<_, PostWithAuthor>(
            "SELECT p.id, p.title, p.content, p.user_id, p.created_at, p.updated_at, \
                    u.username \
             FROM posts p JOIN users u ON u.id = p.user_id \
             WHERE p.id = ? AND p.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        let Some(PostWithAuthor { post, username }) = row else {
            return Err(AppError::NotFound("post not found".to_string()));
        };

        let comments = sqlx::query_as::<_, CommentView>(
            "SELECT c.id, c.content, c.user_id, u.username, c.created_at \
             FROM comments c JOIN users u ON u.id = c.user_id \
             WHERE c.post_id = ? AND c.deleted_at IS NULL \
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(PostDetail {
            id: post.id,
            title: post.title,
            content: post.content,
            user_id: post.user_id,
            username,
            created_at: post.created_at,
            updated_at: post.updated_at,
            comments,
        })
    }

    pub async fn list(&self, page: Page) -> Result<(Vec<PostSummary>, i64)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE deleted_at IS NULL")
                .fetch_one(&self.db)
                .await?;

        let posts = sqlx::query_as::<_, PostSummary>(
            "SELECT p.id, p.title, p.user_id, u.username, p.created_at, p.updated_at \
             FROM posts p JOIN users u ON u.id = p.user_id \
             WHERE p.deleted_at IS NULL \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT ? OFFSET ?",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((posts, total))
    }

    pub async fn list_by_user(&self, user_id: i64, page: Page) -> Result<(Vec<PostSummary>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts WHERE user_id = ? AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let posts = sqlx::query_as::<_, PostSummary>(
            "SELECT p.id, p.title, p.user_id, u.username, p.created_at, p.updated_at \
             FROM posts p JOIN users u ON u.id = p.user_id \
             WHERE p.user_id = ? AND p.deleted_at IS NULL \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((posts, total))
    }

    /// Owner-only. Title and content are replaced; the owner never changes.
    pub async fn update(&self, actor_id: i64, id: i64, title: &str, content: &str) -> Result<Post> {
        let post = authorize_mutation(actor_id, self.find(id).await?)?;

        let updated = sqlx::query_as::<_, Post>(
            "UPDATE posts SET title = ?, content = ?, updated_at = ? \
             WHERE id = ? AND deleted_at IS NULL \
             RETURNING id, title, content, user_id, created_at, updated_at",
        )
        .bind(title)
        .bind(content)
        .bind(Utc::now())
        .bind(post.id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        tracing::info!(user_id = actor_id, post_id = id, "post updated");
        Ok(updated)
    }

    /// Owner-only soft delete.
    pub async fn delete(&self, actor_id: i64, id: i64) -> Result<()> {
        let post = authorize_mutation(actor_id, self.find(id).await?)?;

        sqlx::query("UPDATE posts SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(Utc::now())
            .bind(post.id)
            .execute(&self.db)
            .await?;

        tracing::info!(user_id = actor_id, post_id = id, "post deleted");
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, content, user_id, created_at, updated_at \
             FROM posts WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(post)
    }
}

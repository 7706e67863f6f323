use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::AuthUser,
    error::Result,
    handlers::{parse_id, ValidatedJson},
    models::{
        comment::{CommentListResponse, CommentPayload, CommentResponse},
        MessageResponse,
    },
    pagination::{PageQuery, Pagination, DEFAULT_COMMENT_PAGE_SIZE},
    AppState,
};

pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CommentListResponse>> {
    let post_id = parse_id(&post_id, "post")?;
    let page = query.resolve(DEFAULT_COMMENT_PAGE_SIZE);
    let (comments, total) = state.comments.list_for_post(post_id, page).await?;

    Ok(Json(CommentListResponse {
        comments,
        pagination: Pagination::new(page, total),
    }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CommentPayload>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    let post_id = parse_id(&post_id, "post")?;
    let comment = state
        .comments
        .create(auth.user_id, post_id, &payload.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "comment created".to_string(),
            comment,
        }),
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "comment")?;
    state.comments.delete(auth.user_id, id).await?;
    Ok(Json(MessageResponse::new("comment deleted")))
}

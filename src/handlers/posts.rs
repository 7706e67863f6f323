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
        post::{PostDetail, PostListResponse, PostPayload, PostResponse},
        MessageResponse,
    },
    pagination::{PageQuery, Pagination, DEFAULT_POST_PAGE_SIZE},
    AppState,
};

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostListResponse>> {
    let page = query.resolve(DEFAULT_POST_PAGE_SIZE);
    let (posts, total) = state.posts.list(page).await?;

    Ok(Json(PostListResponse {
        posts,
        pagination: Pagination::new(page, total),
    }))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostDetail>> {
    let id = parse_id(&id, "post")?;
    Ok(Json(state.posts.get(id).await?))
}

pub async fn list_user_posts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostListResponse>> {
    let user_id = parse_id(&user_id, "user")?;
    let page = query.resolve(DEFAULT_POST_PAGE_SIZE);
    let (posts, total) = state.posts.list_by_user(user_id, page).await?;

    Ok(Json(PostListResponse {
        posts,
        pagination: Pagination::new(page, total),
    }))
}

pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<PostPayload>,
) -> Result<(StatusCode, Json<PostResponse>)> {
    let post = state
        .posts
        .create(auth.user_id, &payload.title, &payload.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            message: "post created".to_string(),
            post,
        }),
    ))
}

pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PostPayload>,
) -> Result<Json<PostResponse>> {
    let id = parse_id(&id, "post")?;
    let post = state
        .posts
        .update(auth.user_id, id, &payload.title, &payload.content)
        .await?;

    Ok(Json(PostResponse {
        message: "post updated".to_string(),
        post,
    }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, "post")?;
    state.posts.delete(auth.user_id, id).await?;
    Ok(Json(MessageResponse::new("post deleted")))
}

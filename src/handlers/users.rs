use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::Result,
    handlers::{parse_id, ValidatedJson},
    models::user::{LoginPayload, LoginResponse, RegisterPayload, RegisterResponse, UserProfile},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterPayload>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let user = state
        .users
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered".to_string(),
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<Json<LoginResponse>> {
    let user = state.users.login(&payload.username, &payload.password).await?;
    let token = state.tokens.issue(user.id)?;

    Ok(Json(LoginResponse {
        message: "login successful".to_string(),
        token,
        user: user.into(),
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>> {
    let id = parse_id(&id, "user")?;
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user.into()))
}

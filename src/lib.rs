pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod rest;
pub mod services;

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    auth::TokenService,
    services::{CommentService, PostService, UserService},
};

pub use error::{AppError, Result};

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: SqlitePool, tokens: TokenService) -> Self {
        Self {
            users: UserService::new(db.clone()),
            posts: PostService::new(db.clone()),
            comments: CommentService::new(db),
            tokens: Arc::new(tokens),
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}

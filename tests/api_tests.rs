//! HTTP-level tests: full request/response cycles against an in-memory database.
mod common;

use axum::http::{Method, StatusCode};
use common::{create_test_app, register_and_login, send, TEST_SECRET};
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_ownership_flow() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "alice", "email": "a@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "alice", "email": "other@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username already exists");

    let (status, wrong_password) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "nobody", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let alice_id = body["user"]["id"].as_i64().unwrap();
    let alice_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some(&alice_token),
        Some(json!({ "title": "First post", "content": "Hello from alice!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post"]["user_id"].as_i64(), Some(alice_id));
    let post_id = body["post"]["id"].as_i64().unwrap();

    let (_, bob_token) = register_and_login(&app, "bob", "secret2").await;
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/posts/{post_id}"),
        Some(&bob_token),
        Some(json!({ "title": "Hijacked", "content": "bob was here, sorry" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/posts/{post_id}"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/posts/{post_id}"),
        Some(&alice_token),
        Some(json!({ "title": "First post, edited", "content": "Hello again from alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "First post, edited");
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = create_test_app().await;
    let post = json!({ "title": "Title", "content": "Some content here" });

    let (status, body) = send(&app, Method::POST, "/api/posts", None, Some(post.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some("not-a-jwt"),
        Some(post.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid authentication token");

    let foreign = blog_api::auth::TokenService::new(
        b"some-other-secret-entirely",
        std::time::Duration::from_secs(3600),
    )
    .issue(1)
    .unwrap();
    let (status, _) = send(&app, Method::POST, "/api/posts", Some(&foreign), Some(post.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::DELETE, "/api/comments/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let app = create_test_app().await;
    let (user_id, _) = register_and_login(&app, "carol", "secret3").await;

    let now = chrono::Utc::now().timestamp();
    let claims = blog_api::auth::Claims {
        sub: user_id.to_string(),
        iat: now - 7200,
        nbf: now - 7200,
        exp: now - 3600,
        iss: "blog-backend".to_string(),
    };
    let expired = encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET)).unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some(&expired),
        Some(json!({ "title": "Title", "content": "Some content here" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid authentication token");
}

#[tokio::test]
async fn test_missing_resources_are_not_found_not_forbidden() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "dave", "secret4").await;

    let (status, _) = send(&app, Method::DELETE, "/api/posts/4242", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/comments/4242", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/posts/4242", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/users/4242", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/posts-comments/4242/comments",
        Some(&token),
        Some(json!({ "content": "anyone home?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "post not found");
}

#[tokio::test]
async fn test_bad_input_is_rejected_with_400() {
    let app = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/posts/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid post id");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "ed", "email": "not-an-email", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/api/login", None, Some(json!({ "username": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, token) = register_and_login(&app, "erin", "secret5").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some(&token),
        Some(json!({ "title": "Hi", "content": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagination_clamps_instead_of_failing() {
    let app = create_test_app().await;
    let (user_id, token) = register_and_login(&app, "frank", "secret6").await;
    for i in 0..3 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": format!("Post {i}"), "content": "Some content here" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/posts?page_size=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["page_size"], 10);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["posts"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, Method::GET, "/api/posts?page_size=1000&page=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["page_size"], 100);
    assert_eq!(body["pagination"]["page"], 1);

    let (status, body) = send(&app, Method::GET, "/api/posts?page=2&page_size=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["pages"], 2);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/users-posts/{user_id}/posts?page_size=abc"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn test_comments_lifecycle() {
    let app = create_test_app().await;
    let (_, alice) = register_and_login(&app, "alice", "secret1").await;
    let (bob_id, bob) = register_and_login(&app, "bob", "secret2").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some(&alice),
        Some(json!({ "title": "Discuss", "content": "What do you all think?" })),
    )
    .await;
    let post_id = body["post"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/posts-comments/{post_id}/comments"),
        Some(&bob),
        Some(json!({ "content": "Looks good to me" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["user_id"].as_i64(), Some(bob_id));
    let comment_id = body["comment"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/posts/{post_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["comments"][0]["username"], "bob");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/posts-comments/{post_id}/comments"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["page_size"], 20);
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/comments/{comment_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/comments/{comment_id}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "comment deleted");

    let (_, body) = send(&app, Method::GET, &format!("/api/posts/{post_id}"), None, None).await;
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_deleted_post_disappears_from_reads() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "gina", "secret7").await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some(&token),
        Some(json!({ "title": "Ephemeral", "content": "Here today, gone soon" })),
    )
    .await;
    let post_id = body["post"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::DELETE, &format!("/api/posts/{post_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &format!("/api/posts/{post_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/posts", None, None).await;
    assert_eq!(body["pagination"]["total"], 0);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/posts-comments/{post_id}/comments"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_profile_and_unknown_route() {
    let app = create_test_app().await;
    let (user_id, _) = register_and_login(&app, "hank", "secret8").await;

    let (status, body) = send(&app, Method::GET, &format!("/api/users/{user_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "hank");
    assert_eq!(body["email"], "hank@example.com");
    assert!(body.get("password_hash").is_none());

    let (status, body) = send(&app, Method::GET, "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

//! Tests for comment handlers.

use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::PostDraft;
use crate::inbound::http::test_utils::{
    bearer, caller_for, demo_token, error_message, memory_state, sign_in, test_app,
};
use crate::outbound::memory::{MODERATOR_EMAIL, MODERATOR_PASSWORD};

macro_rules! comments_app {
    ($state:expr) => {
        test::init_service(test_app($state).service(web::scope("/api").service(scope()))).await
    };
}

async fn seeded_post(state: &HttpState, token: &str) -> Uuid {
    let caller = caller_for(state, token).await;
    state
        .posts
        .create(
            &caller,
            PostDraft {
                title: "Night trains".to_owned(),
                content: "Book the sleeper.".to_owned(),
                destination_id: None,
                images: None,
                rating: None,
                is_public: None,
            },
        )
        .await
        .expect("post created")
        .view
        .post
        .id
}

async fn comment_count(state: &HttpState, post_id: Uuid) -> u64 {
    state
        .posts
        .detail(None, post_id)
        .await
        .expect("post detail")
        .view
        .comment_count
}

async fn comment<S>(app: &S, token: &str, payload: Value) -> actix_web::dev::ServiceResponse
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/comments")
            .insert_header(bearer(token))
            .set_json(payload)
            .to_request(),
    )
    .await
}

#[actix_web::test]
async fn listing_requires_a_post_or_author() {
    let (state, _backend) = memory_state();
    let app = comments_app!(state);

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/comments").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        error_message(&body),
        Some("Missing query parameter: post_id or user_id is required")
    );
}

#[rstest]
#[case(json!({ "content": "Nice" }))]
#[case(json!({ "post_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "content": "" }))]
#[actix_web::test]
async fn create_requires_post_and_content(#[case] payload: Value) {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let app = comments_app!(state);

    let res = comment(&app, &token, payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        error_message(&body),
        Some("Missing required fields: post_id and content are required")
    );
}

#[actix_web::test]
async fn create_checks_post_and_parent_exist() {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let post_id = seeded_post(&state, &token).await;
    let app = comments_app!(state);

    let no_post = comment(
        &app,
        &token,
        json!({ "post_id": Uuid::new_v4(), "content": "Hello" }),
    )
    .await;
    assert_eq!(no_post.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(no_post).await;
    assert_eq!(error_message(&body), Some("Post not found"));

    let no_parent = comment(
        &app,
        &token,
        json!({ "post_id": post_id, "content": "Hello", "parent_comment_id": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(no_parent.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(no_parent).await;
    assert_eq!(error_message(&body), Some("Parent comment not found"));
}

#[actix_web::test]
async fn comment_count_follows_creates_and_deletes() {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let post_id = seeded_post(&state, &token).await;
    let app = comments_app!(state.clone());

    let first = comment(&app, &token, json!({ "post_id": post_id, "content": "First" })).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(first).await;
    assert!(body["users"]["name"].is_string());
    let first_id = body["id"].as_str().expect("comment id").to_owned();

    let reply = comment(
        &app,
        &token,
        json!({ "post_id": post_id, "content": "Reply", "parent_comment_id": first_id }),
    )
    .await;
    assert_eq!(reply.status(), StatusCode::CREATED);
    assert_eq!(comment_count(&state, post_id).await, 2);

    let listed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/comments?post_id={post_id}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(listed).await;
    assert_eq!(body["pagination"]["total"], 2);

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/comments/{first_id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: Value = test::read_body_json(deleted).await;
    assert_eq!(body["message"], "Comment deleted successfully");
    assert_eq!(comment_count(&state, post_id).await, 0);
}

#[actix_web::test]
async fn only_the_author_may_edit() {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let moderator = sign_in(&state, MODERATOR_EMAIL, MODERATOR_PASSWORD).await;
    let post_id = seeded_post(&state, &token).await;
    let app = comments_app!(state);

    let created = comment(&app, &token, json!({ "post_id": post_id, "content": "Draft" })).await;
    let body: Value = test::read_body_json(created).await;
    let uri = format!("/api/comments/{}", body["id"].as_str().expect("comment id"));

    let blank = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "content": "  " }))
            .to_request(),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(blank).await;
    assert_eq!(
        error_message(&body),
        Some("Missing required field: content is required")
    );

    let foreign = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&moderator))
            .set_json(json!({ "content": "Edited" }))
            .to_request(),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);

    let edited = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "content": "Final" }))
            .to_request(),
    )
    .await;
    assert_eq!(edited.status(), StatusCode::OK);
    let body: Value = test::read_body_json(edited).await;
    assert_eq!(body["content"], "Final");
    assert!(body["updated_at"].is_string());
}

#[actix_web::test]
async fn non_owner_travellers_cannot_delete() {
    let (state, _backend) = memory_state();
    let moderator = sign_in(&state, MODERATOR_EMAIL, MODERATOR_PASSWORD).await;
    let traveller = demo_token(&state).await;
    let post_id = seeded_post(&state, &moderator).await;
    let app = comments_app!(state);

    let created = comment(&app, &moderator, json!({ "post_id": post_id, "content": "Pinned" }))
        .await;
    let body: Value = test::read_body_json(created).await;
    let uri = format!("/api/comments/{}", body["id"].as_str().expect("comment id"));

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&traveller))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        error_message(&body),
        Some("Not authorized to delete this comment")
    );
}

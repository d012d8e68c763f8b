//! Store-side guarantees of the in-memory backend.

use chrono::Duration;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    AuthProvider, BookingRepository, CommentRepository, PostRepository, TripRepository,
    UserRepository,
};
use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp};
use crate::domain::{
    AccessScope, AccessToken, CounterColumn, Credentials, NewBooking, NewComment, NewPassword,
    NewPost, NewTrip, PageRequest, PostFilter, Registration,
};

#[fixture]
fn backend() -> InMemoryBackend {
    InMemoryBackend::seeded(fixture_clock())
}

fn scope() -> AccessScope {
    AccessScope::Anonymous
}

fn new_post(author: UserId, title: &str, minutes: i64) -> NewPost {
    NewPost {
        user_id: author,
        title: title.to_owned(),
        content: "Worth the detour".to_owned(),
        destination_id: None,
        images: Vec::new(),
        rating: None,
        is_public: true,
        created_at: fixture_timestamp() + Duration::minutes(minutes),
    }
}

fn new_comment(post_id: Uuid, author: UserId, parent: Option<Uuid>) -> NewComment {
    NewComment {
        post_id,
        user_id: author,
        parent_comment_id: parent,
        content: "Agreed".to_owned(),
        created_at: fixture_timestamp(),
    }
}

fn first_destination(backend: &InMemoryBackend) -> Uuid {
    backend
        .lock()
        .expect("lock")
        .destinations
        .first()
        .map(|destination| destination.id)
        .expect("seeded destination")
}

#[rstest]
#[tokio::test]
async fn demo_account_can_sign_in_and_resolve_token(backend: InMemoryBackend) {
    let credentials = Credentials::try_from_parts(DEMO_EMAIL, DEMO_PASSWORD).expect("creds");
    let session = backend.sign_in(&credentials).await.expect("sign in");

    assert_eq!(session.token_type, "bearer");
    assert_eq!(session.expires_in, Some(3600));
    let account = backend
        .current_user(&session.access_token)
        .await
        .expect("token resolves");
    assert_eq!(account.email, DEMO_EMAIL);

    backend
        .sign_out(&session.access_token)
        .await
        .expect("sign out");
    let err = backend
        .current_user(&session.access_token)
        .await
        .expect_err("revoked token");
    assert!(matches!(err, BackendError::Unauthorized { .. }));
}

#[rstest]
#[tokio::test]
async fn wrong_password_is_rejected(backend: InMemoryBackend) {
    let credentials = Credentials::try_from_parts(DEMO_EMAIL, "not-it").expect("creds");
    let err = backend.sign_in(&credentials).await.expect_err("bad password");
    assert_eq!(err.message(), "Invalid login credentials");
}

#[rstest]
#[tokio::test]
async fn duplicate_registration_is_rejected(backend: InMemoryBackend) {
    let registration =
        Registration::try_from_parts(DEMO_EMAIL, "another-secret", "Copycat").expect("valid");
    let err = backend
        .sign_up(&registration)
        .await
        .expect_err("email taken");
    assert!(matches!(err, BackendError::Rejected { .. }));
}

#[rstest]
#[tokio::test]
async fn updated_password_replaces_the_old_one(backend: InMemoryBackend) {
    let old = Credentials::try_from_parts(DEMO_EMAIL, DEMO_PASSWORD).expect("creds");
    let session = backend.sign_in(&old).await.expect("sign in");
    let fresh = NewPassword::new("brand-new-pass").expect("valid password");

    backend
        .update_password(&session.access_token, &fresh)
        .await
        .expect("update");

    assert!(backend.sign_in(&old).await.is_err());
    let new = Credentials::try_from_parts(DEMO_EMAIL, "brand-new-pass").expect("creds");
    assert!(backend.sign_in(&new).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn unknown_token_is_unauthorized(backend: InMemoryBackend) {
    let token = AccessToken::new("forged").expect("token");
    let err = backend.current_user(&token).await.expect_err("unknown");
    assert!(matches!(err, BackendError::Unauthorized { .. }));
}

#[rstest]
#[tokio::test]
async fn trip_with_unknown_destination_violates_foreign_key(backend: InMemoryBackend) {
    let trip = NewTrip {
        user_id: UserId::random(),
        destination_id: Uuid::new_v4(),
        start_date: fixture_timestamp(),
        end_date: fixture_timestamp() + Duration::days(3),
        budget: 0.0,
        notes: String::new(),
        is_public: false,
        created_at: fixture_timestamp(),
    };
    let err = TripRepository::insert(&backend, &scope(), &trip)
        .await
        .expect_err("dangling destination");
    assert!(err.message().contains("trips_destination_id_fkey"));
}

#[rstest]
#[tokio::test]
async fn deleting_a_post_removes_its_likes_and_comments(backend: InMemoryBackend) {
    let author = UserId::random();
    let post = PostRepository::insert(&backend, &scope(), &new_post(author, "Ramen", 0))
        .await
        .expect("post");
    backend
        .insert_like(&scope(), post.id, &author, fixture_timestamp())
        .await
        .expect("like");
    CommentRepository::insert(&backend, &scope(), &new_comment(post.id, author, None))
        .await
        .expect("comment");

    PostRepository::delete(&backend, &scope(), post.id)
        .await
        .expect("delete");

    assert_eq!(backend.count_likes(&scope(), post.id).await.expect("count"), 0);
    assert_eq!(
        backend.count_for_post(&scope(), post.id).await.expect("count"),
        0
    );
}

#[rstest]
#[tokio::test]
async fn liking_twice_violates_uniqueness(backend: InMemoryBackend) {
    let author = UserId::random();
    let post = PostRepository::insert(&backend, &scope(), &new_post(author, "Tram 28", 0))
        .await
        .expect("post");
    backend
        .insert_like(&scope(), post.id, &author, fixture_timestamp())
        .await
        .expect("first like");
    let err = backend
        .insert_like(&scope(), post.id, &author, fixture_timestamp())
        .await
        .expect_err("second like");
    assert!(err.message().contains("post_likes_post_id_user_id_key"));
}

#[rstest]
#[tokio::test]
async fn views_count_relations_not_stored_counters(backend: InMemoryBackend) {
    let author = UserId::random();
    let post = PostRepository::insert(&backend, &scope(), &new_post(author, "Geysir", 0))
        .await
        .expect("post");
    backend
        .set_counter(&scope(), post.id, CounterColumn::Likes, 99, None)
        .await
        .expect("counter");
    backend
        .insert_like(&scope(), post.id, &author, fixture_timestamp())
        .await
        .expect("like");

    let view = PostRepository::find_view(&backend, &scope(), post.id)
        .await
        .expect("read")
        .expect("present");
    assert_eq!(view.like_count, 1);
}

#[rstest]
#[tokio::test]
async fn popular_posts_follow_the_stored_like_counter(backend: InMemoryBackend) {
    let author = UserId::random();
    let quiet = PostRepository::insert(&backend, &scope(), &new_post(author, "Quiet", 10))
        .await
        .expect("post");
    let loved = PostRepository::insert(&backend, &scope(), &new_post(author, "Loved", 0))
        .await
        .expect("post");
    backend
        .set_counter(&scope(), loved.id, CounterColumn::Likes, 7, None)
        .await
        .expect("counter");

    let page = backend
        .popular(&scope(), PageRequest::default())
        .await
        .expect("popular");
    let titles: Vec<_> = page.data.iter().map(|view| view.post.title.as_str()).collect();
    assert_eq!(titles, ["Loved", "Quiet"]);
    assert_ne!(quiet.id, loved.id);
}

#[rstest]
#[tokio::test]
async fn post_listing_is_newest_first_with_exact_total(backend: InMemoryBackend) {
    let author = UserId::random();
    for (title, minutes) in [("Older", 0), ("Newest", 20), ("Middle", 10)] {
        PostRepository::insert(&backend, &scope(), &new_post(author, title, minutes))
            .await
            .expect("post");
    }
    let filter = PostFilter {
        destination_id: None,
        user_id: Some(author),
    };
    let window = PageRequest::new(Some(2), Some(0)).expect("page");

    let page = PostRepository::list(&backend, &scope(), &filter, window)
        .await
        .expect("list");

    assert_eq!(page.pagination.total, 3);
    let titles: Vec<_> = page.data.iter().map(|view| view.post.title.as_str()).collect();
    assert_eq!(titles, ["Newest", "Middle"]);
}

#[rstest]
#[tokio::test]
async fn deleting_a_comment_removes_its_replies(backend: InMemoryBackend) {
    let author = UserId::random();
    let post = PostRepository::insert(&backend, &scope(), &new_post(author, "Fado", 0))
        .await
        .expect("post");
    let root = CommentRepository::insert(&backend, &scope(), &new_comment(post.id, author, None))
        .await
        .expect("root");
    let reply = CommentRepository::insert(
        &backend,
        &scope(),
        &new_comment(post.id, author, Some(root.comment.id)),
    )
    .await
    .expect("reply");
    CommentRepository::insert(
        &backend,
        &scope(),
        &new_comment(post.id, author, Some(reply.comment.id)),
    )
    .await
    .expect("nested reply");
    CommentRepository::insert(&backend, &scope(), &new_comment(post.id, author, None))
        .await
        .expect("sibling");

    CommentRepository::delete(&backend, &scope(), root.comment.id)
        .await
        .expect("delete");

    assert_eq!(
        backend.count_for_post(&scope(), post.id).await.expect("count"),
        1
    );
}

#[rstest]
#[tokio::test]
async fn deleting_a_trip_removes_its_bookings(backend: InMemoryBackend) {
    let owner = UserId::random();
    let trip = TripRepository::insert(
        &backend,
        &scope(),
        &NewTrip {
            user_id: owner,
            destination_id: first_destination(&backend),
            start_date: fixture_timestamp(),
            end_date: fixture_timestamp() + Duration::days(5),
            budget: 800.0,
            notes: String::new(),
            is_public: true,
            created_at: fixture_timestamp(),
        },
    )
    .await
    .expect("trip");
    let type_id = backend
        .lock()
        .expect("lock")
        .booking_types
        .first()
        .map(|kind| kind.id)
        .expect("seeded booking type");
    let booking = NewBooking {
        user_id: owner,
        trip_id: trip.id,
        type_id,
        activity_id: None,
        provider_name: Some("Hotel Alfama".to_owned()),
        booking_reference: None,
        booking_date: fixture_timestamp(),
        start_date: None,
        end_date: None,
        amount: 320.0,
        currency: "EUR".to_owned(),
        status: "confirmed".to_owned(),
        notes: None,
        created_at: fixture_timestamp(),
    };
    BookingRepository::insert(&backend, &scope(), &booking)
        .await
        .expect("booking");

    TripRepository::delete(&backend, &scope(), trip.id)
        .await
        .expect("delete");

    assert!(backend.lock().expect("lock").bookings.is_empty());
}

#[rstest]
#[tokio::test]
async fn following_twice_violates_uniqueness(backend: InMemoryBackend) {
    let (follower, followed) = (UserId::random(), UserId::random());
    backend
        .insert_follow(&scope(), &follower, &followed, fixture_timestamp())
        .await
        .expect("follow");
    assert!(
        backend
            .insert_follow(&scope(), &follower, &followed, fixture_timestamp())
            .await
            .is_err()
    );
    assert_eq!(
        backend
            .list_followed(&scope(), &follower)
            .await
            .expect("followed"),
        vec![followed]
    );
}

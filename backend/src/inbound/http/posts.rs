//! Community post HTTP handlers: publishing, the follow feed and likes.
//!
//! ```text
//! GET /api/posts?destination_id=…
//! GET /api/posts/feed
//! GET /api/posts/{id}
//! POST /api/posts {"title":"Kyoto in spring","content":"…"}
//! PUT /api/posts/{id} {"rating":null}
//! DELETE /api/posts/{id}
//! POST /api/posts/{id}/like
//! ```

use actix_web::{HttpResponse, Scope, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::patch::double_option;
use crate::domain::{
    DEFAULT_PAGE_LIMIT, Error, LikeToggle, Page, PostChanges, PostDetail, PostDraft, PostFilter,
    PostView, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::{Authenticated, MaybeAuthenticated};
use crate::inbound::http::schemas::{
    ErrorSchema, LikeToggleSchema, MessageSchema, PostDetailSchema, PostPageSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, Numeric, page_request, parse_number, parse_optional_number, parse_optional_uuid,
    present,
};

const DESTINATION_ID: FieldName = FieldName::new("destination_id");
const RATING: FieldName = FieldName::new("rating");

/// Query parameters for `GET /api/posts`.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    /// Restrict to one destination.
    pub destination_id: Option<Uuid>,
    /// Restrict to one author.
    pub user_id: Option<UserId>,
    /// Page size.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// Query parameters for `GET /api/posts/feed`.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Page size.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// Request body for `POST /api/posts`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreatePostRequest {
    /// Headline.
    pub title: Option<String>,
    /// Body text.
    pub content: Option<String>,
    /// Destination the post is about.
    #[schema(format = Uuid)]
    pub destination_id: Option<String>,
    /// Image URLs.
    pub images: Option<Vec<String>>,
    /// Author's score.
    #[schema(value_type = Option<f64>)]
    pub rating: Option<Numeric>,
    /// Visibility, public when omitted.
    pub is_public: Option<bool>,
}

impl TryFrom<CreatePostRequest> for PostDraft {
    type Error = Error;

    fn try_from(value: CreatePostRequest) -> Result<Self, Self::Error> {
        let (Some(title), Some(content)) = (present(value.title), present(value.content)) else {
            return Err(Error::invalid_request(
                "Missing required fields: title and content are required",
            ));
        };
        Ok(Self {
            title,
            content,
            destination_id: parse_optional_uuid(value.destination_id, DESTINATION_ID)?,
            images: value.images,
            rating: parse_optional_number(value.rating, RATING)?,
            is_public: value.is_public,
        })
    }
}

/// Request body for `PUT /api/posts/{id}`.
///
/// Blank `title` and `content` are ignored. `destination_id` and `rating`
/// clear on `null`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePostRequest {
    /// New headline.
    pub title: Option<String>,
    /// New body text.
    pub content: Option<String>,
    /// Destination, or `null` to detach the post.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub destination_id: Option<Option<String>>,
    /// Replacement image list.
    pub images: Option<Vec<String>>,
    /// Score, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub rating: Option<Option<Numeric>>,
    /// Visibility.
    pub is_public: Option<bool>,
}

impl TryFrom<UpdatePostRequest> for PostChanges {
    type Error = Error;

    fn try_from(value: UpdatePostRequest) -> Result<Self, Self::Error> {
        let destination_id = match value.destination_id {
            None => None,
            Some(raw) => Some(parse_optional_uuid(raw, DESTINATION_ID)?),
        };
        let rating = match value.rating {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(parse_number(raw, RATING)?)),
        };
        Ok(Self {
            title: value.title,
            content: value.content,
            destination_id,
            images: value.images,
            rating,
            is_public: value.is_public,
            updated_at: None,
        })
    }
}

/// Routes under `/posts`. `feed` precedes `{id}`.
pub fn scope() -> Scope {
    web::scope("/posts")
        .service(list_posts)
        .service(post_feed)
        .service(get_post)
        .service(create_post)
        .service(update_post)
        .service(delete_post)
        .service(toggle_like)
}

/// Public posts, newest first.
#[utoipa::path(
    get,
    path = "/api/posts",
    params(
        ("destination_id" = Option<String>, Query, description = "Destination id", format = Uuid),
        ("user_id" = Option<String>, Query, description = "Author id", format = Uuid),
        ("limit" = Option<u32>, Query, description = "Page size, default 20, max 100"),
        ("offset" = Option<u32>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "Posts", body = PostPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    query: web::Query<ListPostsQuery>,
) -> ApiResult<web::Json<Page<PostView>>> {
    let query = query.into_inner();
    let page = page_request(query.limit, query.offset, DEFAULT_PAGE_LIMIT)?;
    let filter = PostFilter {
        destination_id: query.destination_id,
        user_id: query.user_id,
    };
    state.posts.list(&filter, page).await.map(web::Json)
}

/// Posts by followed members, or the most liked posts when there are none.
#[utoipa::path(
    get,
    path = "/api/posts/feed",
    params(
        ("limit" = Option<u32>, Query, description = "Page size, default 20, max 100"),
        ("offset" = Option<u32>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "Personal feed", body = PostPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "postFeed"
)]
#[get("/feed")]
pub async fn post_feed(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    query: web::Query<FeedQuery>,
) -> ApiResult<web::Json<Page<PostView>>> {
    let page = page_request(query.limit, query.offset, DEFAULT_PAGE_LIMIT)?;
    state.posts.feed(&caller, page).await.map(web::Json)
}

/// A post with comments and likes. Signed-in callers also learn whether
/// they liked it.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id", format = Uuid)),
    responses(
        (status = 200, description = "Post detail", body = PostDetailSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([], ("BearerAuth" = []))
)]
#[get("/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    MaybeAuthenticated(caller): MaybeAuthenticated,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<PostDetail>> {
    state
        .posts
        .detail(caller.as_ref(), path.into_inner())
        .await
        .map(web::Json)
}

/// Publish a post.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostDetailSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("")]
pub async fn create_post(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let draft = PostDraft::try_from(payload.into_inner())?;
    let detail = state.posts.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(detail))
}

/// Partially update one of the caller's posts.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id", format = Uuid)),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostDetailSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not owned or missing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostDetail>> {
    let changes = PostChanges::try_from(payload.into_inner())?;
    state
        .posts
        .update(&caller, path.into_inner(), changes)
        .await
        .map(web::Json)
}

/// Delete a post. Moderators and admins may delete any post.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id", format = Uuid)),
    responses(
        (status = 200, description = "Post deleted", body = MessageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.posts.delete(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Post deleted successfully" })))
}

/// Like a post, or withdraw the caller's like.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = String, Path, description = "Post id", format = Uuid)),
    responses(
        (status = 200, description = "New like state", body = LikeToggleSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "togglePostLike"
)]
#[post("/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<LikeToggle>> {
    state
        .posts
        .toggle_like(&caller, path.into_inner())
        .await
        .map(web::Json)
}

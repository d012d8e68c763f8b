//! Comment HTTP handlers.
//!
//! ```text
//! GET /api/comments?post_id=…
//! GET /api/comments/{id}
//! POST /api/comments {"post_id":"…","content":"Great tip"}
//! PUT /api/comments/{id} {"content":"Great tip, thanks"}
//! DELETE /api/comments/{id}
//! ```

use actix_web::{HttpResponse, Scope, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    CommentDraft, CommentFilter, CommentView, DEFAULT_PAGE_LIMIT, Error, Page, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Authenticated;
use crate::inbound::http::schemas::{
    CommentPageSchema, CommentSchema, ErrorSchema, MessageSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, page_request, parse_optional_uuid, parse_uuid, present,
};

/// Query parameters for `GET /api/comments`. One of `post_id` and
/// `user_id` is required.
#[derive(Debug, Default, Deserialize)]
pub struct ListCommentsQuery {
    /// Comments on this post.
    pub post_id: Option<Uuid>,
    /// Comments by this author.
    pub user_id: Option<UserId>,
    /// Page size.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// Request body for `POST /api/comments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateCommentRequest {
    /// Post commented on.
    #[schema(format = Uuid)]
    pub post_id: Option<String>,
    /// Body.
    pub content: Option<String>,
    /// Comment replied to.
    #[schema(format = Uuid)]
    pub parent_comment_id: Option<String>,
}

impl TryFrom<CreateCommentRequest> for CommentDraft {
    type Error = Error;

    fn try_from(value: CreateCommentRequest) -> Result<Self, Self::Error> {
        let (Some(post_id), Some(content)) = (present(value.post_id), present(value.content))
        else {
            return Err(Error::invalid_request(
                "Missing required fields: post_id and content are required",
            ));
        };
        Ok(Self {
            post_id: parse_uuid(&post_id, FieldName::new("post_id"))?,
            content,
            parent_comment_id: parse_optional_uuid(
                value.parent_comment_id,
                FieldName::new("parent_comment_id"),
            )?,
        })
    }
}

/// Request body for `PUT /api/comments/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCommentRequest {
    /// Replacement body.
    pub content: Option<String>,
}

/// Routes under `/comments`.
pub fn scope() -> Scope {
    web::scope("/comments")
        .service(list_comments)
        .service(get_comment)
        .service(create_comment)
        .service(update_comment)
        .service(delete_comment)
}

/// Comments on a post or by an author, newest first.
#[utoipa::path(
    get,
    path = "/api/comments",
    params(
        ("post_id" = Option<String>, Query, description = "Post id", format = Uuid),
        ("user_id" = Option<String>, Query, description = "Author id", format = Uuid),
        ("limit" = Option<u32>, Query, description = "Page size, default 20, max 100"),
        ("offset" = Option<u32>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "Comments", body = CommentPageSchema),
        (status = 400, description = "Neither post_id nor user_id given", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    query: web::Query<ListCommentsQuery>,
) -> ApiResult<web::Json<Page<CommentView>>> {
    let query = query.into_inner();
    let filter = CommentFilter {
        post_id: query.post_id,
        user_id: query.user_id,
    };
    let page = page_request(query.limit, query.offset, DEFAULT_PAGE_LIMIT)?;
    state.comments.list(&filter, page).await.map(web::Json)
}

/// One comment with its author.
#[utoipa::path(
    get,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment id", format = Uuid)),
    responses(
        (status = 200, description = "Comment", body = CommentSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown comment", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "getComment",
    security([])
)]
#[get("/{id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<CommentView>> {
    state
        .comments
        .detail(path.into_inner())
        .await
        .map(web::Json)
}

/// Comment on a post, optionally as a reply.
#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown post or parent comment", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let draft = CommentDraft::try_from(payload.into_inner())?;
    let comment = state.comments.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Edit one of the caller's comments.
#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment id", format = Uuid)),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = CommentSchema),
        (status = 400, description = "Missing content", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown comment", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateCommentRequest>,
) -> ApiResult<web::Json<CommentView>> {
    let content = present(payload.into_inner().content)
        .ok_or_else(|| Error::invalid_request("Missing required field: content is required"))?;
    state
        .comments
        .update(&caller, path.into_inner(), &content)
        .await
        .map(web::Json)
}

/// Delete a comment and its replies. Moderators and admins may delete any
/// comment.
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment id", format = Uuid)),
    responses(
        (status = 200, description = "Comment deleted", body = MessageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown comment", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    Authenticated(caller): Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.comments.delete(&caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Comment deleted successfully" })))
}

#[cfg(test)]
mod tests;

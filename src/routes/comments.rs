use actix_web::{delete, get, post, put, web, HttpResponse};
use diesel::pg::PgConnection;
use diesel::{ExpressionMethods, JoinOnDsl, OptionalExtension, QueryDsl, RunQueryDsl};
use serde::Deserialize;
use validator::Validate;

use crate::claims::user::UserClaim;
use crate::db::{get_conn, DbPool};
use crate::errors::ApiError;
use crate::helpers::ownership::ensure_owner;
use crate::models::{comment_with_author_fields, Comment, CommentWithAuthor, NewComment};
use crate::schema::{comments, users, videos};

fn fetch_comment_with_author(
    conn: &mut PgConnection,
    comment_id: i32,
) -> Result<CommentWithAuthor, ApiError> {
    comments::table
        .inner_join(users::table.on(users::id.eq(comments::user_id)))
        .filter(comments::id.eq(comment_id))
        .select(comment_with_author_fields())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))
}

#[get("/video/{video_id}")]
pub async fn list_comments(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let video_id = path.into_inner();
    let conn = &mut get_conn(&pool)?;

    let result: Vec<CommentWithAuthor> = comments::table
        .inner_join(users::table.on(users::id.eq(comments::user_id)))
        .filter(comments::video_id.eq(video_id))
        .order_by(comments::created_at.desc())
        .select(comment_with_author_fields())
        .load(conn)?;

    Ok(HttpResponse::Ok().json(result))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentBody {
    video_id: i32,
    #[validate(length(min = 1, max = 1000))]
    text: String,
}

#[post("")]
pub async fn create_comment(
    data: web::Json<CreateCommentBody>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    data.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let text = data.text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("Comment text is required".to_string()));
    }

    let conn = &mut get_conn(&pool)?;

    let video_exists = videos::table
        .find(data.video_id)
        .select(videos::id)
        .first::<i32>(conn)
        .optional()?;

    if video_exists.is_none() {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    let comment: Comment = diesel::insert_into(comments::table)
        .values(NewComment {
            video_id: data.video_id,
            user_id: user.id,
            text,
        })
        .get_result(conn)?;

    let result = fetch_comment_with_author(conn, comment.id)?;
    Ok(HttpResponse::Created().json(result))
}

#[derive(Deserialize, Validate)]
pub struct UpdateCommentBody {
    #[validate(length(min = 1, max = 1000))]
    text: String,
}

#[put("/{comment_id}")]
pub async fn update_comment(
    path: web::Path<i32>,
    data: web::Json<UpdateCommentBody>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    data.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let text = data.text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("Comment text is required".to_string()));
    }

    let comment_id = path.into_inner();
    let conn = &mut get_conn(&pool)?;

    let comment: Comment = comments::table
        .find(comment_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    ensure_owner(
        user.id,
        comment.user_id,
        "You can only update your own comments",
    )?;

    diesel::update(comments::table.find(comment_id))
        .set(comments::text.eq(text))
        .execute(conn)?;

    let result = fetch_comment_with_author(conn, comment_id)?;
    Ok(HttpResponse::Ok().json(result))
}

#[delete("/{comment_id}")]
pub async fn delete_comment(
    path: web::Path<i32>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let comment_id = path.into_inner();
    let conn = &mut get_conn(&pool)?;

    let comment: Comment = comments::table
        .find(comment_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    ensure_owner(
        user.id,
        comment.user_id,
        "You can only delete your own comments",
    )?;

    diesel::delete(comments::table.find(comment_id)).execute(conn)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Comment deleted successfully" })))
}

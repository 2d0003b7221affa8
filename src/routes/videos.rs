use actix_web::{delete, get, post, put, web, HttpResponse};
use diesel::pg::PgConnection;
use diesel::{
    BoolExpressionMethods, Connection, ExpressionMethods, JoinOnDsl, OptionalExtension, QueryDsl,
    RunQueryDsl, TextExpressionMethods,
};
use serde::Deserialize;
use tracing::warn;
use validator::Validate;

use crate::claims::user::UserClaim;
use crate::db::{get_conn, DbPool};
use crate::errors::ApiError;
use crate::helpers::ownership::ensure_owner;
use crate::helpers::reactions::{plan_toggle, MembershipChange, Reaction, ReactionSnapshot};
use crate::models::{
    video_detail_fields, Channel, NewVideo, NewVideoReaction, Video, VideoCategory,
    VideoReaction, VideoWithDetail,
};
use crate::schema::{channels, users, video_reactions, videos};

fn fetch_video_detail(conn: &mut PgConnection, video_id: i32) -> Result<VideoWithDetail, ApiError> {
    videos::table
        .inner_join(channels::table.on(channels::id.eq(videos::channel_id)))
        .inner_join(users::table.on(users::id.eq(videos::uploader_id)))
        .filter(videos::id.eq(video_id))
        .select(video_detail_fields())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))
}

#[derive(Deserialize)]
pub struct ListVideosQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[get("")]
pub async fn list_videos(
    query: web::Query<ListVideosQuery>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let conn = &mut get_conn(&pool)?;

    let mut q = videos::table
        .inner_join(channels::table.on(channels::id.eq(videos::channel_id)))
        .inner_join(users::table.on(users::id.eq(videos::uploader_id)))
        .select(video_detail_fields())
        .into_boxed();

    if let Some(term) = &query.search {
        if !term.is_empty() {
            q = q.filter(videos::title.like(format!("%{}%", term)));
        }
    }

    if let Some(cat) = &query.category {
        if cat != "All" {
            let category = VideoCategory::parse(cat)
                .ok_or_else(|| ApiError::Validation(format!("Unknown category: {}", cat)))?;
            q = q.filter(videos::category.eq(category.as_str().to_string()));
        }
    }

    let items: Vec<VideoWithDetail> = q.order_by(videos::created_at.desc()).load(conn)?;
    Ok(HttpResponse::Ok().json(items))
}

#[get("/{video_id}")]
pub async fn get_video(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let video_id = path.into_inner();
    let conn = &mut get_conn(&pool)?;

    // Fire-and-forget view bump; the fetch is served even if it fails.
    let bumped = diesel::update(videos::table.find(video_id))
        .set(videos::views.eq(videos::views + 1))
        .execute(conn);

    if let Err(e) = bumped {
        warn!("Failed to bump view count for video {}: {}", video_id, e);
    }

    let video = fetch_video_detail(conn, video_id)?;
    Ok(HttpResponse::Ok().json(video))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoBody {
    #[validate(length(min = 1, max = 200))]
    title: String,
    #[validate(length(max = 5000))]
    description: Option<String>,
    #[validate(length(min = 1))]
    video_url: String,
    #[validate(length(min = 1))]
    thumbnail_url: String,
    channel_id: i32,
    category: String,
}

#[post("")]
pub async fn create_video(
    data: web::Json<CreateVideoBody>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    data.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let category = VideoCategory::parse(&data.category)
        .ok_or_else(|| ApiError::Validation(format!("Unknown category: {}", data.category)))?;

    let conn = &mut get_conn(&pool)?;

    let channel: Channel = channels::table
        .find(data.channel_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    ensure_owner(
        user.id,
        channel.owner_id,
        "You can only add videos to your own channels",
    )?;

    let video: Video = diesel::insert_into(videos::table)
        .values(NewVideo {
            channel_id: channel.id,
            uploader_id: user.id,
            title: data.title.trim(),
            description: data.description.as_deref().unwrap_or(""),
            video_url: &data.video_url,
            thumbnail_url: &data.thumbnail_url,
            category: category.as_str(),
        })
        .get_result(conn)?;

    let detail = fetch_video_detail(conn, video.id)?;
    Ok(HttpResponse::Created().json(detail))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoBody {
    #[validate(length(min = 1, max = 200))]
    title: Option<String>,
    #[validate(length(max = 5000))]
    description: Option<String>,
    thumbnail_url: Option<String>,
    category: Option<String>,
}

#[put("/{video_id}")]
pub async fn update_video(
    path: web::Path<i32>,
    data: web::Json<UpdateVideoBody>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    data.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let video_id = path.into_inner();
    let conn = &mut get_conn(&pool)?;

    let video: Video = videos::table
        .find(video_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    ensure_owner(
        user.id,
        video.uploader_id,
        "You can only update your own videos",
    )?;

    if let Some(t) = &data.title {
        diesel::update(videos::table.find(video_id))
            .set(videos::title.eq(t.trim()))
            .execute(conn)?;
    }

    if let Some(d) = &data.description {
        diesel::update(videos::table.find(video_id))
            .set(videos::description.eq(d))
            .execute(conn)?;
    }

    if let Some(thumb) = &data.thumbnail_url {
        diesel::update(videos::table.find(video_id))
            .set(videos::thumbnail_url.eq(thumb))
            .execute(conn)?;
    }

    if let Some(cat) = &data.category {
        let category = VideoCategory::parse(cat)
            .ok_or_else(|| ApiError::Validation(format!("Unknown category: {}", cat)))?;
        diesel::update(videos::table.find(video_id))
            .set(videos::category.eq(category.as_str()))
            .execute(conn)?;
    }

    let detail = fetch_video_detail(conn, video_id)?;
    Ok(HttpResponse::Ok().json(detail))
}

#[delete("/{video_id}")]
pub async fn delete_video(
    path: web::Path<i32>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let video_id = path.into_inner();
    let conn = &mut get_conn(&pool)?;

    let video: Video = videos::table
        .find(video_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    ensure_owner(
        user.id,
        video.uploader_id,
        "You can only delete your own videos",
    )?;

    // Comments and reactions go with it via ON DELETE CASCADE.
    diesel::delete(videos::table.find(video_id)).execute(conn)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Video deleted successfully" })))
}

/// Applies one like/dislike toggle as a single transaction: the membership
/// row and both counters change together or not at all.
fn apply_reaction(
    conn: &mut PgConnection,
    video_id: i32,
    user_id: i32,
    requested: Reaction,
) -> Result<ReactionSnapshot, ApiError> {
    conn.transaction::<ReactionSnapshot, ApiError, _>(|conn| {
        // Row-lock the video so concurrent toggles on it serialize.
        let _video: Video = videos::table
            .find(video_id)
            .for_update()
            .first(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

        let existing: Option<VideoReaction> = video_reactions::table
            .filter(
                video_reactions::video_id
                    .eq(video_id)
                    .and(video_reactions::user_id.eq(user_id)),
            )
            .first(conn)
            .optional()?;

        let current = existing.as_ref().and_then(|r| Reaction::from_str(&r.reaction_type));
        let plan = plan_toggle(current, requested);

        match plan.membership {
            MembershipChange::Insert => {
                diesel::insert_into(video_reactions::table)
                    .values(NewVideoReaction {
                        video_id,
                        user_id,
                        reaction_type: requested.as_str(),
                    })
                    .execute(conn)?;
            }
            MembershipChange::Remove => {
                diesel::delete(
                    video_reactions::table.filter(
                        video_reactions::video_id
                            .eq(video_id)
                            .and(video_reactions::user_id.eq(user_id)),
                    ),
                )
                .execute(conn)?;
            }
            MembershipChange::Retype => {
                diesel::update(
                    video_reactions::table.filter(
                        video_reactions::video_id
                            .eq(video_id)
                            .and(video_reactions::user_id.eq(user_id)),
                    ),
                )
                .set(video_reactions::reaction_type.eq(requested.as_str()))
                .execute(conn)?;
            }
        }

        let updated: Video = diesel::update(videos::table.find(video_id))
            .set((
                videos::likes.eq(videos::likes + plan.like_delta),
                videos::dislikes.eq(videos::dislikes + plan.dislike_delta),
            ))
            .get_result(conn)?;

        Ok(ReactionSnapshot {
            likes: updated.likes,
            dislikes: updated.dislikes,
            is_liked: plan.is_liked,
            is_disliked: plan.is_disliked,
        })
    })
}

#[post("/{video_id}/like")]
pub async fn like_video(
    path: web::Path<i32>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let conn = &mut get_conn(&pool)?;
    let snapshot = apply_reaction(conn, path.into_inner(), user.id, Reaction::Like)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[post("/{video_id}/dislike")]
pub async fn dislike_video(
    path: web::Path<i32>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let conn = &mut get_conn(&pool)?;
    let snapshot = apply_reaction(conn, path.into_inner(), user.id, Reaction::Dislike)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_video_body_requires_core_fields() {
        let body = CreateVideoBody {
            title: String::new(),
            description: None,
            video_url: "https://example.com/v.mp4".to_string(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
            channel_id: 1,
            category: "Education".to_string(),
        };
        assert!(body.validate().is_err());

        let body = CreateVideoBody {
            title: "Learn React in 30 Minutes".to_string(),
            description: None,
            video_url: String::new(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
            channel_id: 1,
            category: "Education".to_string(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn create_video_body_accepts_valid_input() {
        let body = CreateVideoBody {
            title: "Learn React in 30 Minutes".to_string(),
            description: Some("A quick tutorial to get started with React.".to_string()),
            video_url: "https://example.com/v.mp4".to_string(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
            channel_id: 1,
            category: "Education".to_string(),
        };
        assert!(body.validate().is_ok());
        assert!(VideoCategory::parse(&body.category).is_some());
    }
}

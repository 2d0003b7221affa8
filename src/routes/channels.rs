use actix_web::{get, post, put, web, HttpResponse};
use diesel::{
    BoolExpressionMethods, ExpressionMethods, JoinOnDsl, OptionalExtension, QueryDsl, RunQueryDsl,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::claims::user::UserClaim;
use crate::db::{get_conn, DbPool};
use crate::errors::ApiError;
use crate::helpers::ownership::ensure_owner;
use crate::models::{
    channel_with_owner_fields, video_detail_fields, Channel, ChannelWithOwner, NewChannel,
    VideoWithDetail,
};
use crate::schema::{channels, users, videos};

const DEFAULT_BANNER: &str = "https://via.placeholder.com/1280x360";

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelBody {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(length(max = 1000))]
    description: Option<String>,
    banner_url: Option<String>,
}

#[post("")]
pub async fn create_channel(
    data: web::Json<CreateChannelBody>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    data.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let name = data.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Channel name is required".to_string()));
    }

    let conn = &mut get_conn(&pool)?;

    // One user cannot own two channels with the same name.
    let duplicate = channels::table
        .filter(channels::owner_id.eq(user.id).and(channels::name.eq(name)))
        .select(channels::id)
        .first::<i32>(conn)
        .optional()?;

    if duplicate.is_some() {
        return Err(ApiError::Validation(
            "You already have a channel with this name".to_string(),
        ));
    }

    let channel: Channel = diesel::insert_into(channels::table)
        .values(NewChannel {
            owner_id: user.id,
            name,
            description: data.description.as_deref().unwrap_or(""),
            banner_url: data.banner_url.as_deref().unwrap_or(DEFAULT_BANNER),
        })
        .get_result(conn)?;

    Ok(HttpResponse::Created().json(channel))
}

#[get("/my-channels")]
pub async fn my_channels(
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let conn = &mut get_conn(&pool)?;

    let result: Vec<Channel> = channels::table
        .filter(channels::owner_id.eq(user.id))
        .order_by(channels::created_at.desc())
        .load(conn)?;

    Ok(HttpResponse::Ok().json(result))
}

#[derive(Serialize)]
struct ChannelDetail {
    #[serde(flatten)]
    channel: ChannelWithOwner,
    videos: Vec<VideoWithDetail>,
}

#[get("/{channel_id}")]
pub async fn get_channel(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let channel_id = path.into_inner();
    let conn = &mut get_conn(&pool)?;

    let channel: ChannelWithOwner = channels::table
        .inner_join(users::table.on(users::id.eq(channels::owner_id)))
        .filter(channels::id.eq(channel_id))
        .select(channel_with_owner_fields())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    let channel_videos: Vec<VideoWithDetail> = videos::table
        .inner_join(channels::table.on(channels::id.eq(videos::channel_id)))
        .inner_join(users::table.on(users::id.eq(videos::uploader_id)))
        .filter(videos::channel_id.eq(channel_id))
        .order_by(videos::created_at.asc())
        .select(video_detail_fields())
        .load(conn)?;

    Ok(HttpResponse::Ok().json(ChannelDetail {
        channel,
        videos: channel_videos,
    }))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChannelBody {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    #[validate(length(max = 1000))]
    description: Option<String>,
    banner_url: Option<String>,
}

#[put("/{channel_id}")]
pub async fn update_channel(
    path: web::Path<i32>,
    data: web::Json<UpdateChannelBody>,
    user: UserClaim,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    data.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let channel_id = path.into_inner();
    let conn = &mut get_conn(&pool)?;

    let channel: Channel = channels::table
        .find(channel_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    ensure_owner(
        user.id,
        channel.owner_id,
        "You can only update your own channels",
    )?;

    if let Some(n) = &data.name {
        let name = n.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Channel name is required".to_string()));
        }

        let duplicate = channels::table
            .filter(
                channels::owner_id
                    .eq(user.id)
                    .and(channels::name.eq(name))
                    .and(channels::id.ne(channel_id)),
            )
            .select(channels::id)
            .first::<i32>(conn)
            .optional()?;

        if duplicate.is_some() {
            return Err(ApiError::Validation(
                "You already have a channel with this name".to_string(),
            ));
        }

        diesel::update(channels::table.find(channel_id))
            .set(channels::name.eq(name))
            .execute(conn)?;
    }

    if let Some(d) = &data.description {
        diesel::update(channels::table.find(channel_id))
            .set(channels::description.eq(d))
            .execute(conn)?;
    }

    if let Some(b) = &data.banner_url {
        diesel::update(channels::table.find(channel_id))
            .set(channels::banner_url.eq(b))
            .execute(conn)?;
    }

    let updated: Channel = channels::table.find(channel_id).first(conn)?;
    Ok(HttpResponse::Ok().json(updated))
}

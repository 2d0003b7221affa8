use std::time::SystemTime;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::channels;
use crate::schema::comments;
use crate::schema::users;
use crate::schema::video_reactions;
use crate::schema::videos;

#[derive(Queryable)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub email: String,
    pub avatar_url: String,
    pub created_at: SystemTime,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub avatar_url: &'a str,
}

/// The subset of a user that is safe to embed in responses.
#[derive(Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub avatar_url: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> UserSummary {
        UserSummary {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
        }
    }
}

pub fn user_summary_fields() -> (users::id, users::username, users::avatar_url) {
    (users::id, users::username, users::avatar_url)
}

#[derive(Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    pub banner_url: String,
    pub subscribers: i32,
    pub created_at: SystemTime,
}

#[derive(Insertable)]
#[diesel(table_name = channels)]
pub struct NewChannel<'a> {
    pub owner_id: i32,
    pub name: &'a str,
    pub description: &'a str,
    pub banner_url: &'a str,
}

#[derive(Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub id: i32,
    pub name: String,
    pub banner_url: String,
    pub subscribers: i32,
}

#[derive(Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelWithOwner {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub banner_url: String,
    pub subscribers: i32,
    pub created_at: SystemTime,
    pub owner: UserSummary,
}

pub fn channel_with_owner_fields() -> (
    channels::id,
    channels::name,
    channels::description,
    channels::banner_url,
    channels::subscribers,
    channels::created_at,
    (users::id, users::username, users::avatar_url),
) {
    (
        channels::id,
        channels::name,
        channels::description,
        channels::banner_url,
        channels::subscribers,
        channels::created_at,
        user_summary_fields(),
    )
}

#[derive(Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i32,
    pub channel_id: i32,
    pub uploader_id: i32,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub category: String,
    pub views: i32,
    pub likes: i32,
    pub dislikes: i32,
    pub created_at: SystemTime,
}

#[derive(Insertable)]
#[diesel(table_name = videos)]
pub struct NewVideo<'a> {
    pub channel_id: i32,
    pub uploader_id: i32,
    pub title: &'a str,
    pub description: &'a str,
    pub video_url: &'a str,
    pub thumbnail_url: &'a str,
    pub category: &'a str,
}

/// A video joined with its channel and uploader for card/detail rendering.
#[derive(Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWithDetail {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub category: String,
    pub views: i32,
    pub likes: i32,
    pub dislikes: i32,
    pub created_at: SystemTime,
    pub channel: ChannelSummary,
    pub uploader: UserSummary,
}

pub fn video_detail_fields() -> (
    videos::id,
    videos::title,
    videos::description,
    videos::video_url,
    videos::thumbnail_url,
    videos::category,
    videos::views,
    videos::likes,
    videos::dislikes,
    videos::created_at,
    (channels::id, channels::name, channels::banner_url, channels::subscribers),
    (users::id, users::username, users::avatar_url),
) {
    (
        videos::id,
        videos::title,
        videos::description,
        videos::video_url,
        videos::thumbnail_url,
        videos::category,
        videos::views,
        videos::likes,
        videos::dislikes,
        videos::created_at,
        (channels::id, channels::name, channels::banner_url, channels::subscribers),
        user_summary_fields(),
    )
}

#[derive(Queryable)]
pub struct VideoReaction {
    pub id: i32,
    pub video_id: i32,
    pub user_id: i32,
    pub reaction_type: String,
    pub created_at: SystemTime,
}

#[derive(Insertable)]
#[diesel(table_name = video_reactions)]
pub struct NewVideoReaction<'a> {
    pub video_id: i32,
    pub user_id: i32,
    pub reaction_type: &'a str,
}

#[derive(Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    pub video_id: i32,
    pub user_id: i32,
    pub text: String,
    pub created_at: SystemTime,
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment<'a> {
    pub video_id: i32,
    pub user_id: i32,
    pub text: &'a str,
}

#[derive(Queryable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    pub id: i32,
    pub video_id: i32,
    pub text: String,
    pub created_at: SystemTime,
    pub author: UserSummary,
}

pub fn comment_with_author_fields() -> (
    comments::id,
    comments::video_id,
    comments::text,
    comments::created_at,
    (users::id, users::username, users::avatar_url),
) {
    (
        comments::id,
        comments::video_id,
        comments::text,
        comments::created_at,
        user_summary_fields(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoCategory {
    Music,
    Gaming,
    Education,
    Entertainment,
    Sports,
    Technology,
    News,
    Travel,
    Food,
    Fashion,
    Science,
}

impl VideoCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoCategory::Music => "Music",
            VideoCategory::Gaming => "Gaming",
            VideoCategory::Education => "Education",
            VideoCategory::Entertainment => "Entertainment",
            VideoCategory::Sports => "Sports",
            VideoCategory::Technology => "Technology",
            VideoCategory::News => "News",
            VideoCategory::Travel => "Travel",
            VideoCategory::Food => "Food",
            VideoCategory::Fashion => "Fashion",
            VideoCategory::Science => "Science",
        }
    }

    pub fn parse(value: &str) -> Option<VideoCategory> {
        match value {
            "Music" => Some(VideoCategory::Music),
            "Gaming" => Some(VideoCategory::Gaming),
            "Education" => Some(VideoCategory::Education),
            "Entertainment" => Some(VideoCategory::Entertainment),
            "Sports" => Some(VideoCategory::Sports),
            "Technology" => Some(VideoCategory::Technology),
            "News" => Some(VideoCategory::News),
            "Travel" => Some(VideoCategory::Travel),
            "Food" => Some(VideoCategory::Food),
            "Fashion" => Some(VideoCategory::Fashion),
            "Science" => Some(VideoCategory::Science),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_round_trips() {
        for name in [
            "Music",
            "Gaming",
            "Education",
            "Entertainment",
            "Sports",
            "Technology",
            "News",
            "Travel",
            "Food",
            "Fashion",
            "Science",
        ] {
            let parsed = VideoCategory::parse(name).unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn category_parse_rejects_unknown() {
        assert_eq!(VideoCategory::parse("Cooking"), None);
        assert_eq!(VideoCategory::parse("music"), None);
        assert_eq!(VideoCategory::parse(""), None);
    }
}

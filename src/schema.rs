diesel::table! {
    channels (id) {
        id -> Int4,
        owner_id -> Int4,
        name -> Varchar,
        description -> Varchar,
        banner_url -> Varchar,
        subscribers -> Int4,
        created_at -> Timestamp,
    }
}

diesel::table! {
    comments (id) {
        id -> Int4,
        video_id -> Int4,
        user_id -> Int4,
        text -> Varchar,
        created_at -> Timestamp,
    }
}

diesel::table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        password -> Varchar,
        email -> Varchar,
        avatar_url -> Varchar,
        created_at -> Timestamp,
    }
}

diesel::table! {
    video_reactions (id) {
        id -> Int4,
        video_id -> Int4,
        user_id -> Int4,
        reaction_type -> Varchar,
        created_at -> Timestamp,
    }
}

diesel::table! {
    videos (id) {
        id -> Int4,
        channel_id -> Int4,
        uploader_id -> Int4,
        title -> Varchar,
        description -> Varchar,
        video_url -> Varchar,
        thumbnail_url -> Varchar,
        category -> Varchar,
        views -> Int4,
        likes -> Int4,
        dislikes -> Int4,
        created_at -> Timestamp,
    }
}

diesel::joinable!(channels -> users (owner_id));
diesel::joinable!(comments -> users (user_id));
diesel::joinable!(comments -> videos (video_id));
diesel::joinable!(video_reactions -> videos (video_id));
diesel::joinable!(videos -> channels (channel_id));

diesel::allow_tables_to_appear_in_same_query!(channels, comments, users, video_reactions, videos);

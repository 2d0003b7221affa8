use actix_web::{post, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use diesel::{BoolExpressionMethods, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::claims::user::UserClaim;
use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::errors::ApiError;
use crate::models::{NewUser, User, UserSummary};
use crate::schema::users;

const DEFAULT_AVATAR: &str = "https://via.placeholder.com/150";

#[derive(Serialize)]
struct SessionResponse {
    token: String,
    user: UserSummary,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    #[validate(length(min = 3, max = 32))]
    username: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
    avatar_url: Option<String>,
}

#[post("/register")]
pub async fn register(
    data: web::Json<RegisterBody>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    data.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let conn = &mut get_conn(&pool)?;

    let taken = users::table
        .filter(
            users::username
                .eq(&data.username)
                .or(users::email.eq(&data.email)),
        )
        .select(users::id)
        .first::<i32>(conn)
        .optional()?;

    if taken.is_some() {
        return Err(ApiError::Validation(
            "Username or email is already registered".to_string(),
        ));
    }

    let password_hash = hash(&data.password, DEFAULT_COST)?;
    let avatar = data.avatar_url.as_deref().unwrap_or(DEFAULT_AVATAR);

    let user: User = diesel::insert_into(users::table)
        .values(NewUser {
            username: &data.username,
            password: &password_hash,
            email: &data.email,
            avatar_url: avatar,
        })
        .get_result(conn)?;

    let token = UserClaim::new(user.id, &user.username)
        .encode(&config.jwt_secret)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(SessionResponse {
        token,
        user: user.into(),
    }))
}

#[derive(Deserialize, Validate)]
pub struct LoginBody {
    #[validate(email)]
    email: String,
    password: String,
}

#[post("/login")]
pub async fn login(
    data: web::Json<LoginBody>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let conn = &mut get_conn(&pool)?;

    let user: User = users::table
        .filter(users::email.eq(&data.email))
        .first(conn)
        .optional()?
        .ok_or(ApiError::Unauthorized)?;

    let valid = verify(&data.password, &user.password).unwrap_or(false);
    if !valid {
        return Err(ApiError::Unauthorized);
    }

    let token = UserClaim::new(user.id, &user.username)
        .encode(&config.jwt_secret)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_body_rejects_bad_input() {
        let body = RegisterBody {
            username: "ab".to_string(),
            email: "john@example.com".to_string(),
            password: "password123".to_string(),
            avatar_url: None,
        };
        assert!(body.validate().is_err());

        let body = RegisterBody {
            username: "JohnDoe".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            avatar_url: None,
        };
        assert!(body.validate().is_err());

        let body = RegisterBody {
            username: "JohnDoe".to_string(),
            email: "john@example.com".to_string(),
            password: "short".to_string(),
            avatar_url: None,
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn register_body_accepts_valid_input() {
        let body = RegisterBody {
            username: "JohnDoe".to_string(),
            email: "john@example.com".to_string(),
            password: "password123".to_string(),
            avatar_url: None,
        };
        assert!(body.validate().is_ok());
    }
}

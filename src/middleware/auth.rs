use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};

use crate::claims::user::UserClaim;
use crate::config::Config;
use crate::errors::ApiError;

/// Extracting `UserClaim` in a handler makes the route require a valid
/// `Authorization: Bearer <token>` header; anything else is a 401 before the
/// handler body runs.
impl FromRequest for UserClaim {
    type Error = ApiError;
    type Future = Ready<Result<UserClaim, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match authenticate(req) {
            Ok(claim) => ok(claim),
            Err(e) => err(e),
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<UserClaim, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| ApiError::Internal("Configuration missing from app data".to_string()))?;

    UserClaim::decode(token, &config.jwt_secret).map_err(|_| ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    fn test_config() -> web::Data<Config> {
        web::Data::new(Config {
            database_url: String::new(),
            bind_addr: String::new(),
            jwt_secret: "test-secret".to_string(),
        })
    }

    #[test]
    fn valid_bearer_token_yields_claims() {
        let token = UserClaim::new(7, "TechGuru").encode("test-secret").unwrap();
        let req = TestRequest::default()
            .app_data(test_config())
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let claim = authenticate(&req).unwrap();
        assert_eq!(claim.id, 7);
        assert_eq!(claim.username, "TechGuru");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let req = TestRequest::default().app_data(test_config()).to_http_request();
        assert!(matches!(authenticate(&req), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn non_bearer_scheme_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(test_config())
            .insert_header((header::AUTHORIZATION, "Basic am9objpwdw=="))
            .to_http_request();

        assert!(matches!(authenticate(&req), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(test_config())
            .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
            .to_http_request();

        assert!(matches!(authenticate(&req), Err(ApiError::Unauthorized)));
    }
}

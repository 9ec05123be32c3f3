use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::{ready, Ready};

use crate::error::{AppError, NO_INPUT_DATA};
use crate::models::User;

/// Request extension inserted by `IdentityMiddleware` once a session resolves.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The signed-in user. Extracting it on an anonymous request fails with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>() {
            Some(CurrentUser(user)) => ready(Ok(AuthenticatedUser(user.clone()))),
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

/// The signed-in user when there is one; never fails.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<User>);

impl FromRequest for OptionalUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<CurrentUser>().map(|c| c.0.clone());
        ready(Ok(OptionalUser(user)))
    }
}

/// JSON request body decoded into `T`.
///
/// Unlike `web::Json<T>`, an empty payload (`null`, `{}`, `[]`, `""`, `false`, `0`) is
/// reported as missing input rather than as a schema mismatch.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for JsonBody<T> {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move {
            let value = json.await?.into_inner();
            decode_body(value).map(JsonBody).map_err(Into::into)
        })
    }
}

pub fn decode_body<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    if is_empty_body(&value) {
        return Err(AppError::BadRequest(NO_INPUT_DATA.into()));
    }
    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid input: {}", e)))
}

fn is_empty_body(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Credentials {
        username: String,
    }

    #[::core::prelude::v1::test]
    fn test_empty_bodies_are_missing_input() {
        for value in [
            json!(null),
            json!({}),
            json!([]),
            json!(""),
            json!(false),
            json!(0),
        ] {
            match decode_body::<Credentials>(value.clone()) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, NO_INPUT_DATA, "{}", value),
                other => panic!("expected missing input for {}, got {:?}", value, other),
            }
        }
    }

    #[::core::prelude::v1::test]
    fn test_decode_body_reports_schema_mismatch() {
        match decode_body::<Credentials>(json!({ "password": "pw" })) {
            Err(AppError::BadRequest(msg)) => {
                assert!(msg.starts_with("Invalid input:"), "{}", msg)
            }
            other => panic!("expected schema error, got {:?}", other),
        }
        let decoded: Credentials = decode_body(json!({ "username": "erin" })).unwrap();
        assert_eq!(decoded.username, "erin");
    }

    fn sample_user() -> User {
        User {
            id: 123,
            username: "erin".into(),
            password_hash: String::new(),
            is_admin: false,
            created_at: chrono::Utc::now(),
        }
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(CurrentUser(sample_user()));

        let mut payload = Payload::None;
        let extracted = AuthenticatedUser::from_request(&req, &mut payload).await;
        assert_eq!(extracted.unwrap().0.id, 123);
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let err = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_optional_user_extractor() {
        let req = test::TestRequest::default().to_http_request();
        let mut payload = Payload::None;
        assert!(OptionalUser::from_request(&req, &mut payload)
            .await
            .unwrap()
            .0
            .is_none());

        req.extensions_mut().insert(CurrentUser(sample_user()));
        let extracted = OptionalUser::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(extracted.0.map(|u| u.username).as_deref(), Some("erin"));
    }
}

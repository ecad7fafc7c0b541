//! `Actor` extractor: builds the acting identity from request headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use catalog_core::error::AppError;
use catalog_core::types::actor::ActorContext;
use catalog_core::types::id::UserId;

use crate::error::ApiError;

/// Header carrying the acting user's id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the acting user's display value.
pub const ACTOR_EMAIL_HEADER: &str = "x-actor-email";

/// The identity a command is credited to.
///
/// Requests without either header act as the system. With only an id the
/// display is left blank and the ledger fills in the user's email.
#[derive(Debug, Clone)]
pub struct Actor(pub ActorContext);

impl std::ops::Deref for Actor {
    type Target = ActorContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, ACTOR_ID_HEADER)
            .map(|raw| {
                raw.parse::<UserId>().map_err(|_| {
                    AppError::validation(format!("Invalid {ACTOR_ID_HEADER} header: {raw}"))
                })
            })
            .transpose()?;
        let display = header(parts, ACTOR_EMAIL_HEADER);

        let actor = match (id, display) {
            (None, None) => ActorContext::system(),
            (id, display) => ActorContext::new(id, display.unwrap_or_default()),
        };
        Ok(Actor(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(builder: axum::http::request::Builder) -> Result<Actor, ApiError> {
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_headers_build_actor() {
        let actor = extract(
            Request::builder()
                .header(ACTOR_ID_HEADER, "7")
                .header(ACTOR_EMAIL_HEADER, "ada@example.com"),
        )
        .await
        .unwrap();
        assert_eq!(actor.current_actor_id(), Some(UserId(7)));
        assert_eq!(actor.current_actor_display(), "ada@example.com");
    }

    #[tokio::test]
    async fn test_no_headers_is_system() {
        let actor = extract(Request::builder()).await.unwrap();
        assert_eq!(actor.0, ActorContext::system());
    }

    #[tokio::test]
    async fn test_bad_id_is_rejected() {
        assert!(extract(Request::builder().header(ACTOR_ID_HEADER, "abc")).await.is_err());
    }
}

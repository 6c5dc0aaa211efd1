use super::{
    reply, required_fields, Credentials, Message, MessageResponse, SharedStore,
    MSG_INTERNAL_ERROR, MSG_PASSWORD_MISMATCH, MSG_SIGNIN_OK, MSG_SIGNUP_ERROR,
};
use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, error, info, instrument};

#[utoipa::path(
    post,
    path= "/signin",
    request_body = Credentials,
    responses (
        (status = 200, description = "Password matches the stored record", body = Message, content_type = "application/json"),
        (status = 400, description = "Body is not valid JSON, or is a bare JSON scalar", body = Message),
        (status = 403, description = "Missing username/password, or unknown username", body = Message),
        (status = 409, description = "Password does not match", body = Message),
        (status = 500, description = "Store failure", body = Message),
    ),
    tag= "auth"
)]
#[instrument(skip(store, headers, body))]
pub async fn signin(
    store: Extension<SharedStore>,
    headers: HeaderMap,
    body: Bytes,
) -> MessageResponse {
    let submitted = match required_fields(&headers, &body) {
        Ok(submitted) => submitted,
        Err(rejection) => {
            let status = rejection.0;
            debug!(%status, "signin rejected");
            return rejection;
        }
    };

    let record = match store.find_by_username(&submitted.username).await {
        Ok(Some(record)) => record,

        Ok(None) => {
            debug!("User not found");

            return reply(StatusCode::FORBIDDEN, MSG_SIGNUP_ERROR);
        }

        Err(e) => {
            error!("Error looking up credential: {:?}", e);

            return reply(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR);
        }
    };

    // Plain equality against the stored text; passwords are not hashed. A
    // number or `true` never equals a stored string.
    if !submitted.password_is_text || record.password != submitted.password {
        debug!(id = %record.id, "password mismatch");

        return reply(StatusCode::CONFLICT, MSG_PASSWORD_MISMATCH);
    }

    info!(id = %record.id, "user signed in");

    (
        StatusCode::OK,
        Json(Message::with_record(MSG_SIGNIN_OK, record)),
    )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{post_json, DecliningStore, FailingStore};
    use super::super::*;
    use crate::{
        api::router,
        store::{CredentialStore, MemoryCredentialStore, NewCredential},
    };
    use anyhow::Result;
    use std::sync::Arc;

    async fn store_with_alice() -> Result<Arc<MemoryCredentialStore>> {
        let store = Arc::new(MemoryCredentialStore::new());
        store.create(NewCredential::new("alice", "secret")).await?;
        Ok(store)
    }

    #[tokio::test]
    async fn signin_with_matching_password_echoes_record() -> Result<()> {
        let store = store_with_alice().await?;
        let stored = store.find_by_username("alice").await?;

        let (status, body) = post_json(
            router(store),
            "/signin",
            r#"{"username":"alice","password":"secret"}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);

        let body: Message = serde_json::from_slice(&body)?;
        assert_eq!(body.message, MSG_SIGNIN_OK);
        assert_eq!(body.response, stored);
        Ok(())
    }

    #[tokio::test]
    async fn signin_with_wrong_password_is_conflict() -> Result<()> {
        let (status, body) = post_json(
            router(store_with_alice().await?),
            "/signin",
            r#"{"username":"alice","password":"wrong"}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::CONFLICT);
        let body: Message = serde_json::from_slice(&body)?;
        assert_eq!(body, Message::new(MSG_PASSWORD_MISMATCH));
        Ok(())
    }

    #[tokio::test]
    async fn signin_password_comparison_is_exact() -> Result<()> {
        for attempt in ["Secret", "secret ", " secret"] {
            let payload = serde_json::json!({ "username": "alice", "password": attempt });
            let (status, _) = post_json(
                router(store_with_alice().await?),
                "/signin",
                &payload.to_string(),
            )
            .await?;
            assert_eq!(status, StatusCode::CONFLICT, "attempt: {attempt:?}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn signin_unknown_user_is_forbidden() -> Result<()> {
        let (status, body) = post_json(
            router(store_with_alice().await?),
            "/signin",
            r#"{"username":"mallory","password":"secret"}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let body: Message = serde_json::from_slice(&body)?;
        assert_eq!(body, Message::new(MSG_SIGNUP_ERROR));
        Ok(())
    }

    #[tokio::test]
    async fn signin_missing_fields_is_forbidden() -> Result<()> {
        for body in [
            r#"{"username":"alice"}"#,
            r#"{"password":"secret"}"#,
            r#"["alice","secret"]"#,
            "",
        ] {
            let (status, response) =
                post_json(router(store_with_alice().await?), "/signin", body).await?;
            assert_eq!(status, StatusCode::FORBIDDEN, "body: {body:?}");
            let response: Message = serde_json::from_slice(&response)?;
            assert_eq!(response, Message::new(MSG_FIELDS_REQUIRED));
        }
        Ok(())
    }

    #[tokio::test]
    async fn signin_non_text_password_never_matches() -> Result<()> {
        let store = Arc::new(MemoryCredentialStore::new());
        store.create(NewCredential::new("7", "7")).await?;

        let (status, body) = post_json(
            router(store.clone()),
            "/signin",
            r#"{"username":7,"password":7}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::CONFLICT);
        let body: Message = serde_json::from_slice(&body)?;
        assert_eq!(body, Message::new(MSG_PASSWORD_MISMATCH));

        let (status, _) = post_json(
            router(store),
            "/signin",
            r#"{"username":7,"password":"7"}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn signin_malformed_json_is_bad_request() -> Result<()> {
        let (status, body) = post_json(
            router(store_with_alice().await?),
            "/signin",
            r#"{"username":"alice""#,
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Message = serde_json::from_slice(&body)?;
        assert_eq!(body, Message::new(MSG_INVALID_JSON));
        Ok(())
    }

    #[tokio::test]
    async fn signin_against_empty_store_is_forbidden() -> Result<()> {
        let (status, _) = post_json(
            router(Arc::new(DecliningStore)),
            "/signin",
            r#"{"username":"alice","password":"secret"}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn signin_store_failure_is_internal_error() -> Result<()> {
        let (status, body) = post_json(
            router(Arc::new(FailingStore)),
            "/signin",
            r#"{"username":"alice","password":"secret"}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: Message = serde_json::from_slice(&body)?;
        assert_eq!(body, Message::new(MSG_INTERNAL_ERROR));
        Ok(())
    }

    #[tokio::test]
    async fn signin_uses_oldest_duplicate() -> Result<()> {
        let store = store_with_alice().await?;
        store.create(NewCredential::new("alice", "newer")).await?;

        let (status, _) = post_json(
            router(store.clone()),
            "/signin",
            r#"{"username":"alice","password":"secret"}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post_json(
            router(store),
            "/signin",
            r#"{"username":"alice","password":"newer"}"#,
        )
        .await?;
        assert_eq!(status, StatusCode::CONFLICT);
        Ok(())
    }
}

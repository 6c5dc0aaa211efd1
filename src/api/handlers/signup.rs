use super::{
    reply, required_fields, Credentials, Message, MessageResponse, SharedStore,
    MSG_INTERNAL_ERROR, MSG_SIGNUP_ERROR, MSG_SIGNUP_OK,
};
use crate::store::NewCredential;
use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, error, info, instrument, warn};

#[utoipa::path(
    post,
    path= "/signup",
    request_body = Credentials,
    responses (
        (status = 200, description = "Credential stored", body = Message, content_type = "application/json"),
        (status = 400, description = "Body is not valid JSON, or is a bare JSON scalar", body = Message),
        (status = 403, description = "Missing username/password, or the store declined the record", body = Message),
        (status = 500, description = "Store failure", body = Message),
    ),
    tag= "auth"
)]
#[instrument(skip(store, headers, body))]
pub async fn signup(
    store: Extension<SharedStore>,
    headers: HeaderMap,
    body: Bytes,
) -> MessageResponse {
    let submitted = match required_fields(&headers, &body) {
        Ok(submitted) => submitted,
        Err(rejection) => {
            let status = rejection.0;
            debug!(%status, "signup rejected");
            return rejection;
        }
    };

    match store
        .create(NewCredential::new(submitted.username, submitted.password))
        .await
    {
        Ok(Some(record)) => {
            info!(id = %record.id, store = store.kind(), "user signed up");

            (
                StatusCode::OK,
                Json(Message::with_record(MSG_SIGNUP_OK, record)),
            )
        }

        Ok(None) => {
            warn!(store = store.kind(), "store declined the signup record");

            reply(StatusCode::FORBIDDEN, MSG_SIGNUP_ERROR)
        }

        Err(e) => {
            error!("Error creating credential: {:?}", e);

            reply(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR)
        }
    }
}

pub const TEST_BODY: &str = "Test router";

#[utoipa::path(
    get,
    path= "/test",
    responses (
        (status = 200, description = "Service is reachable", body = String, content_type = "text/plain"),
    ),
    tag= "passgate"
)]
// axum handler for the liveness probe
pub async fn test() -> &'static str {
    TEST_BODY
}

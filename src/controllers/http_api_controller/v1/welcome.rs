use axum::Json;

pub(crate) struct WelcomeHttpApiController;

impl WelcomeHttpApiController {
    pub(crate) async fn handle_request() -> Json<&'static str> {
        Json("Welcome to grid validator")
    }
}

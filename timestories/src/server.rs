use anyhow::{anyhow, Result};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, routes, Build, Request, Rocket, State};
use serde_json::Value;

use common::ServerConfig;

use crate::model::ErrorBody;
use crate::stories::{StoriesError, StoryService};

pub const INDEX_TEXT: &str =
    "Service is active. Please use the /getTimeStories endpoint to get the latest articles.";
pub const NOT_FOUND_TEXT: &str =
    "Not found. Please use the /getTimeStories endpoint to get the latest articles.";

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub stories: StoryService,
}

#[get("/")]
async fn index() -> &'static str {
    INDEX_TEXT
}

/// Latest stories as a JSON array, or a `{"error": ...}` envelope.
#[get("/getTimeStories")]
async fn get_time_stories(state: &State<AppState>) -> (Status, Json<Value>) {
    let result = state.stories.latest().await.and_then(|stories| {
        serde_json::to_value(&stories)
            .map(|body| (stories.len(), body))
            .map_err(|e| StoriesError::Unexpected(format!("failed to serialize stories: {}", e)))
    });

    match result {
        Ok((count, body)) => {
            tracing::info!(count, "served latest stories");
            (Status::Ok, Json(body))
        }
        Err(e) => {
            let status = Status::from_code(e.status_code()).unwrap_or(Status::InternalServerError);
            if status == Status::InternalServerError {
                tracing::error!(error = %e, "stories request failed");
            } else {
                tracing::warn!(error = %e, status = status.code, "stories request failed");
            }
            (status, Json(error_value(e.to_string())))
        }
    }
}

#[catch(404)]
fn not_found() -> &'static str {
    NOT_FOUND_TEXT
}

#[catch(500)]
fn internal_error(req: &Request<'_>) -> Json<Value> {
    tracing::error!(uri = %req.uri(), "request failed with an internal error");
    Json(error_value("unexpected internal error".to_string()))
}

fn error_value(message: String) -> Value {
    serde_json::to_value(ErrorBody::new(message))
        .unwrap_or_else(|_| serde_json::json!({ "error": "unexpected internal error" }))
}

/// Build Rocket with managed state, routes and catchers, listening on `server.bind:server.port`.
pub fn build_rocket(state: AppState, server: &ServerConfig) -> Rocket<Build> {
    let fig = rocket::Config::figment()
        .merge(("address", server.bind.clone()))
        .merge(("port", server.port));

    rocket::custom(fig)
        .manage(state)
        .mount("/", routes![index, get_time_stories])
        .register("/", catchers![not_found, internal_error])
}

pub async fn launch_rocket(state: AppState, server: &ServerConfig) -> Result<()> {
    tracing::info!(bind = %server.bind, port = server.port, "Starting Rocket HTTP server");
    build_rocket(state, server)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}

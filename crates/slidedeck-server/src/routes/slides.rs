use axum::{
    Json,
    extract::{Path, State},
};
use slidedeck_store::{Slide, SlideId};
use tracing::debug;

use crate::{into_http::HttpError, startup::AppState};

#[tracing::instrument(name = "slides.list", skip(app))]
pub async fn list_slides(State(app): State<AppState>) -> Result<Json<Vec<Slide>>, HttpError> {
    let slides = app.store.list().await?;
    debug!(count = slides.len());

    Ok(Json(slides))
}

#[tracing::instrument(name = "slides.get", skip(app))]
pub async fn get_slide(
    Path(id): Path<String>,
    State(app): State<AppState>,
) -> Result<Json<Slide>, HttpError> {
    let id: SlideId = id.parse()?;

    app.store
        .get(&id)
        .await?
        .map(Json)
        .ok_or(HttpError::SlideNotFound)
}

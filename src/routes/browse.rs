use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ErrorResponse,
    routes::AppState,
    services::catalog::{self, CatalogRow, RowContents},
};

/// Lists the browse rows
pub async fn rows() -> Json<&'static [CatalogRow]> {
    Json(catalog::ROWS)
}

/// Handler for the titles of one browse row
pub async fn row(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RowContents>, ErrorResponse> {
    let contents = catalog::load_row(&state.gateway, &key)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(Json(contents))
}

use axum::{extract::Extension, response::Html};

use crate::server::app::AppState;
use crate::server::error::AppError;
use crate::server::templates::render_index;

/// Landing page with usage instructions
pub async fn index_handler(Extension(state): Extension<AppState>) -> Result<Html<String>, AppError> {
    let page = render_index(state.port, env!("CARGO_PKG_VERSION"))
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Html(page))
}

use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use planbook_core::{config::Config, io, paths};

#[derive(serde::Deserialize)]
pub struct InitBody {
    #[serde(default)]
    pub organization: Option<String>,
}

/// POST /api/init — create the store skeleton and config if missing.
pub async fn init_store(
    State(app): State<AppState>,
    Json(body): Json<InitBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let organization = body.organization.unwrap_or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "organization".to_string())
        });

        io::ensure_dir(&paths::districts_dir(&root))?;

        let created = if paths::config_path(&root).exists() {
            false
        } else {
            Config::new(&organization).save(&root)?;
            true
        };
        let config = Config::load(&root)?;

        Ok::<_, planbook_core::PlanbookError>(serde_json::json!({
            "organization": config.organization,
            "created": created,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

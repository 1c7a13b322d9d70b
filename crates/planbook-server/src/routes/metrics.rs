use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use planbook_core::metric::{Metric, SurveyPoint};
use planbook_core::types::MetricType;

fn metric_json(m: &Metric) -> serde_json::Value {
    serde_json::json!({
        "id": m.id,
        "goal_id": m.goal_id,
        "name": m.name,
        "metric_type": m.metric_type,
        "current_value": m.current_value,
        "target_value": m.target_value,
        "unit": m.unit,
        "display_order": m.display_order,
        "is_primary": m.is_primary,
        "narrative_text": m.narrative_text,
        "survey_data": m.survey_data,
        "created_at": m.created_at,
        "updated_at": m.updated_at,
    })
}

// ---------------------------------------------------------------------------
// Patch application shared by update and batch
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize, Default)]
pub struct MetricPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metric_type: Option<MetricType>,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_primary: Option<bool>,
    #[serde(default)]
    pub narrative_text: Option<String>,
    #[serde(default)]
    pub survey_data: Option<Vec<SurveyPoint>>,
}

fn apply_patch(metric: &mut Metric, patch: MetricPatch) {
    if let Some(name) = patch.name {
        metric.rename(name);
    }
    if let Some(metric_type) = patch.metric_type {
        metric.set_metric_type(metric_type);
    }
    if patch.current_value.is_some() || patch.target_value.is_some() {
        metric.set_values(
            patch.current_value.or(metric.current_value),
            patch.target_value.or(metric.target_value),
        );
    }
    if patch.unit.is_some() {
        metric.set_unit(patch.unit);
    }
    if let Some(is_primary) = patch.is_primary {
        metric.set_primary(is_primary);
    }
    if patch.narrative_text.is_some() {
        metric.set_narrative(patch.narrative_text);
    }
    if let Some(points) = patch.survey_data {
        metric.set_survey_data(points);
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct CreateMetricBody {
    pub goal_id: Uuid,
    pub name: String,
    pub metric_type: MetricType,
    #[serde(flatten)]
    pub patch: MetricPatch,
}

/// POST /api/districts/:slug/metrics — create a metric on a goal.
pub async fn create_metric(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CreateMetricBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut metric =
            Metric::create(&root, &slug, body.goal_id, body.name, body.metric_type)?;
        apply_patch(&mut metric, body.patch);
        metric.save(&root, &slug)?;
        Ok::<_, planbook_core::PlanbookError>(metric_json(&metric))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// PUT /api/districts/:slug/metrics/:id — partial update.
pub async fn update_metric(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, Uuid)>,
    Json(body): Json<MetricPatch>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut metric = Metric::load(&root, &slug, id)?;
        apply_patch(&mut metric, body);
        metric.save(&root, &slug)?;
        Ok::<_, planbook_core::PlanbookError>(metric_json(&metric))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/districts/:slug/metrics/:id
pub async fn delete_metric(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        Metric::delete(&root, &slug, id)?;
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!({ "deleted": id }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct ReorderBody {
    pub goal_id: Uuid,
    pub metric_ids: Vec<Uuid>,
}

/// PUT /api/districts/:slug/metrics/reorder — replace a goal's metric order.
pub async fn reorder_metrics(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        Metric::reorder(&root, &slug, body.goal_id, &body.metric_ids)?;
        let metrics = Metric::list_for_goal(&root, &slug, body.goal_id)?;
        let list: Vec<serde_json::Value> = metrics.iter().map(metric_json).collect();
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct BatchEntry {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub goal_id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metric_type: Option<MetricType>,
    #[serde(flatten)]
    pub patch: MetricPatch,
}

#[derive(serde::Deserialize)]
pub struct BatchBody {
    pub metrics: Vec<BatchEntry>,
}

/// POST /api/districts/:slug/metrics/batch — upsert a list of metrics in one
/// call (the builder UI's "save all"). Entries with an id update; the rest
/// create and need goal_id, name, and metric_type.
pub async fn batch_upsert(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<BatchBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut updated = 0usize;
        let mut created = 0usize;
        for entry in body.metrics {
            match entry.id {
                Some(id) => {
                    let mut metric = Metric::load(&root, &slug, id)?;
                    // name/metric_type land on the entry, not the flattened
                    // patch; fold them back in so batch renames stick.
                    let mut patch = entry.patch;
                    patch.name = patch.name.or(entry.name);
                    patch.metric_type = patch.metric_type.or(entry.metric_type);
                    apply_patch(&mut metric, patch);
                    metric.save(&root, &slug)?;
                    updated += 1;
                }
                None => {
                    let (Some(goal_id), Some(name), Some(metric_type)) =
                        (entry.goal_id, entry.name, entry.metric_type)
                    else {
                        return Err(AppError::bad_request(
                            "batch entry without id needs goal_id, name, and metric_type",
                        ));
                    };
                    let mut metric = Metric::create(&root, &slug, goal_id, name, metric_type)?;
                    apply_patch(&mut metric, entry.patch);
                    metric.save(&root, &slug)?;
                    created += 1;
                }
            }
        }
        Ok::<_, AppError>(serde_json::json!({
            "updated": updated,
            "created": created,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

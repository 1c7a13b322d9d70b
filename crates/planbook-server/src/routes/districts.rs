use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use planbook_core::district::District;
use planbook_core::hierarchy::{self, GoalNode};
use planbook_core::metric::Metric;
use planbook_core::status;
use planbook_core::summary;

// ---------------------------------------------------------------------------
// JSON shaping
// ---------------------------------------------------------------------------

fn district_json(d: &District) -> serde_json::Value {
    serde_json::json!({
        "id": d.id,
        "slug": d.slug,
        "name": d.name,
        "primary_color": d.primary_color,
        "secondary_color": d.secondary_color,
        "logo_url": d.logo_url,
        "admin_email": d.admin_email,
        "is_public": d.is_public,
        "created_at": d.created_at,
        "updated_at": d.updated_at,
    })
}

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
        "status": status::metric_status(m),
        "progress": status::metric_progress(m),
        "updated_at": m.updated_at,
    })
}

/// Serialize one tree node with per-metric and subtree status labels attached.
pub(crate) fn node_json(node: &GoalNode) -> serde_json::Value {
    serde_json::json!({
        "id": node.goal.id,
        "parent_id": node.goal.parent_id,
        "goal_number": node.goal.goal_number,
        "title": node.goal.title,
        "description": node.goal.description,
        "level": node.goal.level,
        "order_position": node.goal.order_position,
        "status": status::subtree_status(node),
        "metrics": node.metrics.iter().map(metric_json).collect::<Vec<_>>(),
        "children": node.children.iter().map(node_json).collect::<Vec<_>>(),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/districts — list all districts.
pub async fn list_districts(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let districts = District::list(&root)?;
        let list: Vec<serde_json::Value> = districts.iter().map(district_json).collect();
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/districts/with-summaries — listing with headline counts.
pub async fn list_with_summaries(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let districts = District::list(&root)?;
        let mut list = Vec::with_capacity(districts.len());
        for d in &districts {
            let s = summary::district_summary(&root, &d.slug)?;
            let mut entry = district_json(d);
            entry["summary"] = serde_json::json!(s);
            list.push(entry);
        }
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateDistrictBody {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// POST /api/districts — create a district with config-default branding.
pub async fn create_district(
    State(app): State<AppState>,
    Json(body): Json<CreateDistrictBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut district = District::create(&root, body.slug, body.name)?;
        if let Some(color) = body.primary_color {
            district.set_primary_color(color);
        }
        if body.secondary_color.is_some() {
            district.set_secondary_color(body.secondary_color);
        }
        if body.logo_url.is_some() {
            district.set_logo_url(body.logo_url);
        }
        if body.admin_email.is_some() {
            district.set_admin_email(body.admin_email);
        }
        if let Some(is_public) = body.is_public {
            district.set_public(is_public);
        }
        district.save(&root)?;
        Ok::<_, planbook_core::PlanbookError>(district_json(&district))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/districts/:slug — district detail with its full goal tree.
pub async fn get_district(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let district = District::load(&root, &slug)?;
        let tree = hierarchy::district_tree(&root, &slug)?;
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!({
            "district": district_json(&district),
            "goals": tree.iter().map(node_json).collect::<Vec<_>>(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateDistrictBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// PUT /api/districts/:slug — partial branding/metadata update.
pub async fn update_district(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<UpdateDistrictBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut district = District::load(&root, &slug)?;
        if let Some(name) = body.name {
            district.update_name(name);
        }
        if let Some(color) = body.primary_color {
            district.set_primary_color(color);
        }
        if body.secondary_color.is_some() {
            district.set_secondary_color(body.secondary_color);
        }
        if body.logo_url.is_some() {
            district.set_logo_url(body.logo_url);
        }
        if body.admin_email.is_some() {
            district.set_admin_email(body.admin_email);
        }
        if let Some(is_public) = body.is_public {
            district.set_public(is_public);
        }
        district.save(&root)?;
        Ok::<_, planbook_core::PlanbookError>(district_json(&district))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct DeleteDistrictQuery {
    #[serde(default)]
    pub cascade: bool,
}

/// DELETE /api/districts/:slug — refuses non-empty districts unless cascade.
pub async fn delete_district(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<DeleteDistrictQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        District::delete(&root, &slug, query.cascade)?;
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!({ "deleted": slug }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/districts/:slug/tree — the dashboard payload: branding header
/// plus the status-annotated goal tree.
pub async fn get_tree(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let district = District::load(&root, &slug)?;
        let tree = hierarchy::district_tree(&root, &slug)?;
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!({
            "district": {
                "slug": district.slug,
                "name": district.name,
                "primary_color": district.primary_color,
                "secondary_color": district.secondary_color,
                "logo_url": district.logo_url,
                "is_public": district.is_public,
            },
            "goals": tree.iter().map(node_json).collect::<Vec<_>>(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

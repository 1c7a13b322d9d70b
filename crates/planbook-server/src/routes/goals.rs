use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use planbook_core::goal::Goal;
use planbook_core::numbering;

fn goal_json(g: &Goal) -> serde_json::Value {
    serde_json::json!({
        "id": g.id,
        "district_id": g.district_id,
        "parent_id": g.parent_id,
        "goal_number": g.goal_number,
        "title": g.title,
        "description": g.description,
        "level": g.level,
        "order_position": g.order_position,
        "created_at": g.created_at,
        "updated_at": g.updated_at,
    })
}

/// GET /api/districts/:slug/goals — flat list ordered by goal number.
pub async fn list_goals(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        planbook_core::district::District::load(&root, &slug)?;
        let goals = Goal::list(&root, &slug)?;
        let list: Vec<serde_json::Value> = goals.iter().map(goal_json).collect();
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateGoalBody {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/districts/:slug/goals — create a goal; the number and level are
/// computed server-side from the parent.
pub async fn create_goal(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<CreateGoalBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let goal = Goal::create_with_description(
            &root,
            &slug,
            body.parent_id,
            body.title,
            body.description,
        )?;
        Ok::<_, planbook_core::PlanbookError>(goal_json(&goal))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct NextNumberQuery {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// GET /api/districts/:slug/goals/next-number — preview the number the next
/// create would assign. Purely advisory; create recomputes.
pub async fn next_number(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<NextNumberQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        planbook_core::district::District::load(&root, &slug)?;
        let number = numbering::next_goal_number(&root, &slug, query.parent_id)?;
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!({ "goal_number": number }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateGoalBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order_position: Option<u32>,
}

/// PUT /api/districts/:slug/goals/:id — partial update.
pub async fn update_goal(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, Uuid)>,
    Json(body): Json<UpdateGoalBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut goal = Goal::load(&root, &slug, id)?;
        if let Some(title) = body.title {
            goal.update_title(title);
        }
        if let Some(description) = body.description {
            goal.set_description(description);
        }
        if let Some(position) = body.order_position {
            goal.set_order_position(position);
        }
        goal.save(&root, &slug)?;
        Ok::<_, planbook_core::PlanbookError>(goal_json(&goal))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/districts/:slug/goals/:id — cascades to descendants and
/// their metrics.
pub async fn delete_goal(
    State(app): State<AppState>,
    Path((slug, id)): Path<(String, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        Goal::delete(&root, &slug, id)?;
        Ok::<_, planbook_core::PlanbookError>(serde_json::json!({ "deleted": id }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::state::{
    actor::StateHandle,
    character::CharacterChannel,
    document::{AppDocument, EntryKind, JournalEntry, Mode, Task},
};

use super::error::ApiError;

/// Everything a request handler needs: the state actor façade plus the read side of the
/// character channel.
#[derive(Clone)]
pub struct ApiState {
    pub state: StateHandle,
    pub character: CharacterChannel,
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Touchgrass API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": [
            "GET /api/status - Get character state and points",
            "GET /api/data - Get all app data",
            "POST /api/data - Save all app data",
            "POST /api/mode - Set current mode",
            "GET /api/tasks - Get all tasks",
            "POST /api/tasks - Add a task",
            "PATCH /api/tasks/{id} - Toggle task completion",
            "DELETE /api/tasks/{id} - Delete a task",
            "POST /api/sentiment - Add sentiment entry",
            "POST /api/food - Add food entry",
            "POST /api/comfort - Add comfort item",
            "POST /api/points - Update focus points",
            "POST /api/goal - Set daily goal",
        ],
    }))
}

pub async fn status(State(api): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let character_state = api.character.read().await;
    let snapshot = api.state.snapshot().await?;
    Ok(Json(json!({
        "character_state": character_state,
        "focus_points": snapshot.focus_points,
        "current_mode": snapshot.current_mode,
    })))
}

pub async fn get_data(State(api): State<ApiState>) -> Result<Json<AppDocument>, ApiError> {
    Ok(Json(api.state.snapshot().await?))
}

pub async fn replace_data(
    State(api): State<ApiState>,
    Json(document): Json<AppDocument>,
) -> Result<Json<Value>, ApiError> {
    api.state.replace(document).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ModeBody {
    #[serde(default = "default_mode")]
    mode: String,
}

fn default_mode() -> String {
    "selection".into()
}

pub async fn set_mode(
    State(api): State<ApiState>,
    Json(body): Json<ModeBody>,
) -> Result<Json<Value>, ApiError> {
    let mode = Mode::parse(&body.mode)?;
    let mode = api.state.set_mode(mode).await?;
    Ok(Json(json!({ "success": true, "mode": mode })))
}

pub async fn list_tasks(State(api): State<ApiState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(api.state.snapshot().await?.tasks))
}

#[derive(Debug, Deserialize)]
pub struct AddTaskBody {
    #[serde(default)]
    text: String,
}

pub async fn add_task(
    State(api): State<ApiState>,
    Json(body): Json<AddTaskBody>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(api.state.add_task(body.text).await?))
}

pub async fn toggle_task(
    State(api): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let toggle = api.state.toggle_task(id).await?;
    Ok(Json(json!({
        "success": true,
        "focus_points": toggle.focus_points,
    })))
}

pub async fn delete_task(
    State(api): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    api.state.delete_task(id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn log_sentiment(
    State(api): State<ApiState>,
    Json(entry): Json<JournalEntry>,
) -> Result<Json<Value>, ApiError> {
    log_entry(api, EntryKind::Sentiment, entry).await
}

pub async fn log_food(
    State(api): State<ApiState>,
    Json(entry): Json<JournalEntry>,
) -> Result<Json<Value>, ApiError> {
    log_entry(api, EntryKind::Food, entry).await
}

pub async fn log_comfort(
    State(api): State<ApiState>,
    Json(entry): Json<JournalEntry>,
) -> Result<Json<Value>, ApiError> {
    log_entry(api, EntryKind::Comfort, entry).await
}

async fn log_entry(
    api: ApiState,
    kind: EntryKind,
    entry: JournalEntry,
) -> Result<Json<Value>, ApiError> {
    let points_earned = api.state.log_entry(kind, entry).await?;
    Ok(Json(json!({
        "success": true,
        "points_earned": points_earned,
    })))
}

#[derive(Debug, Deserialize)]
pub struct PointsBody {
    #[serde(default)]
    change: i64,
}

pub async fn adjust_points(
    State(api): State<ApiState>,
    Json(body): Json<PointsBody>,
) -> Result<Json<Value>, ApiError> {
    let focus_points = api.state.adjust_points(body.change).await?;
    Ok(Json(json!({ "focus_points": focus_points })))
}

#[derive(Debug, Deserialize)]
pub struct GoalBody {
    #[serde(default)]
    goal: String,
    #[serde(default)]
    completed: bool,
}

pub async fn set_goal(
    State(api): State<ApiState>,
    Json(body): Json<GoalBody>,
) -> Result<Json<Value>, ApiError> {
    api.state.set_goal(body.goal, body.completed).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use serde_json::json;
    use tempfile::{TempDir, tempdir};
    use tokio::sync::mpsc;

    use crate::{
        state::{
            actor::{DocumentActor, StateHandle},
            character::{CharacterChannel, CharacterState},
            document::Mode,
            store::DocumentStore,
        },
        utils::clock::DefaultClock,
    };

    use super::{
        AddTaskBody, ApiState, GoalBody, ModeBody, PointsBody, add_task, adjust_points,
        delete_task, get_data, list_tasks, log_food, log_sentiment, replace_data, set_goal,
        set_mode, status, toggle_task,
    };

    async fn api_state(dir: &TempDir) -> Result<ApiState> {
        let store = DocumentStore::new(dir.path().join("app_data.json"));
        let (sender, receiver) = mpsc::channel(8);
        let actor = DocumentActor::load(store, receiver, Box::new(DefaultClock)).await?;
        tokio::spawn(async move {
            actor.run().await.unwrap();
        });
        Ok(ApiState {
            state: StateHandle::new(sender),
            character: CharacterChannel::new(dir.path().join("character_state.txt")),
        })
    }

    #[tokio::test]
    async fn status_combines_channel_and_document() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;
        api.character.publish(CharacterState::Happy).await?;
        api.state.adjust_points(7).await?;
        api.state.set_mode(Mode::Work).await?;

        let Json(payload) = status(State(api)).await?;
        assert_eq!(payload["character_state"], "happy");
        assert_eq!(payload["focus_points"], 7);
        assert_eq!(payload["current_mode"], "work");
        Ok(())
    }

    #[tokio::test]
    async fn status_without_a_channel_file_reads_idle() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;
        let Json(payload) = status(State(api)).await?;
        assert_eq!(payload["character_state"], "idle");
        Ok(())
    }

    #[tokio::test]
    async fn added_tasks_show_up_in_the_listing() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;

        let Json(task) = add_task(
            State(api.clone()),
            Json(AddTaskBody {
                text: "buy milk".into(),
            }),
        )
        .await?;
        assert_eq!(task.id, 0);
        assert!(!task.completed);

        let Json(tasks) = list_tasks(State(api)).await?;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "buy milk");
        Ok(())
    }

    #[tokio::test]
    async fn empty_task_text_is_a_bad_request() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;

        let error = add_task(State(api), Json(AddTaskBody { text: String::new() }))
            .await
            .unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn deleting_any_id_is_a_success() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;
        add_task(
            State(api.clone()),
            Json(AddTaskBody {
                text: "buy milk".into(),
            }),
        )
        .await?;

        let Json(payload) = delete_task(State(api.clone()), Path(0)).await?;
        assert_eq!(payload["success"], true);
        // Deleting an id that no longer exists is still a success, not an error.
        let Json(payload) = delete_task(State(api.clone()), Path(0)).await?;
        assert_eq!(payload["success"], true);

        let Json(tasks) = list_tasks(State(api)).await?;
        assert!(tasks.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn toggling_an_unknown_task_is_not_found() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;

        let error = toggle_task(State(api), Path(9)).await.unwrap_err();
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn toggling_awards_task_points() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;
        add_task(
            State(api.clone()),
            Json(AddTaskBody {
                text: "water plants".into(),
            }),
        )
        .await?;

        let Json(payload) = toggle_task(State(api), Path(0)).await?;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["focus_points"], 10);
        Ok(())
    }

    #[tokio::test]
    async fn journal_endpoints_award_their_bonuses() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;

        let Json(payload) = log_sentiment(
            State(api.clone()),
            Json(json!({"mood": "calm"}).as_object().unwrap().clone()),
        )
        .await?;
        assert_eq!(payload["points_earned"], 15);

        let Json(payload) = log_food(
            State(api.clone()),
            Json(json!({"meal": "lunch"}).as_object().unwrap().clone()),
        )
        .await?;
        assert_eq!(payload["points_earned"], 5);

        let snapshot = api.state.snapshot().await?;
        assert_eq!(snapshot.focus_points, 20);
        assert_eq!(snapshot.sentiment_entries.len(), 1);
        assert_eq!(snapshot.food_entries.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_modes_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;

        let error = set_mode(
            State(api.clone()),
            Json(ModeBody {
                mode: "destress".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);

        let Json(payload) = set_mode(
            State(api),
            Json(ModeBody {
                mode: "chill".into(),
            }),
        )
        .await?;
        assert_eq!(payload["mode"], "chill");
        Ok(())
    }

    #[tokio::test]
    async fn document_replacement_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;

        let Json(mut document) = get_data(State(api.clone())).await?;
        document.adjust_points(42);
        document.set_goal("touch grass".into(), true);
        replace_data(State(api.clone()), Json(document.clone())).await?;

        let Json(reloaded) = get_data(State(api)).await?;
        assert_eq!(reloaded, document);
        Ok(())
    }

    #[tokio::test]
    async fn point_and_goal_endpoints_mutate_the_document() -> Result<()> {
        let dir = tempdir()?;
        let api = api_state(&dir).await?;

        let Json(payload) = adjust_points(State(api.clone()), Json(PointsBody { change: -3 })).await?;
        assert_eq!(payload["focus_points"], -3);

        set_goal(
            State(api.clone()),
            Json(GoalBody {
                goal: "read a chapter".into(),
                completed: false,
            }),
        )
        .await?;

        let snapshot = api.state.snapshot().await?;
        assert_eq!(snapshot.daily_goal, "read a chapter");
        assert!(!snapshot.daily_goal_completed);
        Ok(())
    }
}

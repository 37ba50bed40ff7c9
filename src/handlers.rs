use crate::calculator::{CalculatorForm, HistoryEntry};
use crate::errors::AppError;
use crate::models::{TipCalculation, TipCalculationDraft};
use crate::state::AppState;
use crate::storage::RECENT_LIMIT;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
};
use tracing::{error, info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let history: Vec<HistoryEntry> = match state.store.list_recent(RECENT_LIMIT).await {
        Ok(records) => records.into_iter().map(HistoryEntry::from).collect(),
        Err(err) => {
            error!("failed to load history: {err}");
            Vec::new()
        }
    };
    Html(render_index(&CalculatorForm::default(), &history))
}

pub async fn list_tip_calculations(
    State(state): State<AppState>,
) -> Result<Json<Vec<TipCalculation>>, AppError> {
    let records = state
        .store
        .list_recent(RECENT_LIMIT)
        .await
        .map_err(|err| AppError::internal("Failed to fetch tip calculations", err))?;
    Ok(Json(records))
}

pub async fn create_tip_calculation(
    State(state): State<AppState>,
    payload: Result<Json<TipCalculationDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<TipCalculation>), AppError> {
    let Json(draft) = payload.map_err(|rejection| {
        warn!("rejected tip calculation body: {rejection}");
        AppError::bad_request("Invalid request body")
    })?;
    validate_draft(&draft)?;

    let record = state
        .store
        .insert(draft)
        .await
        .map_err(|err| AppError::internal("Failed to create tip calculation", err))?;

    info!(id = %record.id, "created tip calculation");
    Ok((StatusCode::CREATED, Json(record)))
}

fn validate_draft(draft: &TipCalculationDraft) -> Result<(), AppError> {
    let present = |value: &Option<String>| value.as_deref().is_some_and(|text| !text.is_empty());
    let positive_bill = draft
        .bill_amount
        .is_some_and(|bill| bill.is_finite() && bill > 0.0);

    if !present(&draft.customer_name) || !present(&draft.mobile_number) || !positive_bill {
        return Err(AppError::bad_request("Missing required fields"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::storage::{FileStore, TipCalculationStore};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Arc;

    struct UnavailableStore;

    #[async_trait]
    impl TipCalculationStore for UnavailableStore {
        async fn insert(&self, _: TipCalculationDraft) -> Result<TipCalculation, StoreError> {
            Err(StoreError::Connection("connection refused".to_string()))
        }

        async fn list_recent(&self, _: usize) -> Result<Vec<TipCalculation>, StoreError> {
            Err(StoreError::Connection("connection refused".to_string()))
        }
    }

    fn file_state(tag: &str) -> (AppState, PathBuf) {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "tipmate_handlers_{tag}_{}_{}.json",
            std::process::id(),
            uuid::Uuid::new_v4().simple()
        ));
        (AppState::new(Arc::new(FileStore::new(&path))), path)
    }

    fn valid_draft() -> TipCalculationDraft {
        TipCalculationDraft {
            customer_name: Some("Dev".to_string()),
            mobile_number: Some("9123456780".to_string()),
            bill_amount: Some(200.0),
            tip_amount: Some(36.0),
            total_amount: Some(236.0),
            tip_percentage: Some(18),
            date: None,
        }
    }

    #[tokio::test]
    async fn create_returns_201_with_assigned_fields() {
        let (state, path) = file_state("create");

        let (status, Json(record)) =
            create_tip_calculation(State(state.clone()), Ok(Json(valid_draft())))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(!record.id.is_empty());
        assert_eq!(record.total_amount, 236.0);

        let Json(listed) = list_tip_calculations(State(state)).await.unwrap();
        assert_eq!(listed, vec![record]);

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn invalid_drafts_are_rejected_without_writing() {
        let (state, path) = file_state("invalid");
        let invalid = [
            TipCalculationDraft {
                customer_name: Some(String::new()),
                ..valid_draft()
            },
            TipCalculationDraft {
                mobile_number: None,
                ..valid_draft()
            },
            TipCalculationDraft {
                bill_amount: Some(0.0),
                ..valid_draft()
            },
            TipCalculationDraft {
                bill_amount: Some(-12.5),
                ..valid_draft()
            },
            TipCalculationDraft {
                bill_amount: None,
                ..valid_draft()
            },
        ];

        for draft in invalid {
            let err = create_tip_calculation(State(state.clone()), Ok(Json(draft)))
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "Missing required fields");
        }

        let Json(listed) = list_tip_calculations(State(state)).await.unwrap();
        assert!(listed.is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn missing_schema_field_is_a_server_error() {
        let (state, path) = file_state("schema");
        let draft = TipCalculationDraft {
            tip_percentage: None,
            ..valid_draft()
        };

        let err = create_tip_calculation(State(state), Ok(Json(draft)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to create tip calculation");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn store_failures_become_generic_500s() {
        let state = AppState::new(Arc::new(UnavailableStore));

        let err = list_tip_calculations(State(state.clone())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to fetch tip calculations");

        let err = create_tip_calculation(State(state), Ok(Json(valid_draft())))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("refused"));
    }

    #[tokio::test]
    async fn index_renders_without_history_when_store_is_down() {
        let state = AppState::new(Arc::new(UnavailableStore));
        let Html(page) = index(State(state)).await;
        assert!(page.contains("TipMate"));
        assert!(page.contains("No calculations yet"));
    }
}

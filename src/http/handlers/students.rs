use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use super::with_store;
use crate::http::error::{ok, ApiError};
use crate::http::types::{AppState, Envelope};
use crate::model::{NewStudent, StudentRecord};

type Reply<T> = Result<Json<Envelope<T>>, ApiError>;

fn body(payload: Result<Json<NewStudent>, JsonRejection>) -> Result<NewStudent, ApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

pub async fn list(State(state): State<AppState>) -> Reply<Vec<StudentRecord>> {
    let rows = with_store(&state, |store| store.list()).await?;
    Ok(ok("All students data fetched Successfully !!", rows))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> Reply<StudentRecord> {
    let record = with_store(&state, move |store| store.get(&id)).await?;
    Ok(ok("Student data fetched Successfully !!", record))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Reply<StudentRecord> {
    let input = body(payload)?;
    let record = with_store(&state, move |store| store.create(&input)).await?;
    tracing::info!(st_id = %record.st_id, class = %record.class, "student added");
    Ok(ok("Student Added Successfully !!", record))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> Reply<StudentRecord> {
    let input = body(payload)?;
    let record = with_store(&state, move |store| store.update(&id, &input)).await?;
    tracing::info!(st_id = %record.st_id, "student updated");
    Ok(ok("Updated Successfully !!", record))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Reply<StudentRecord> {
    let record = with_store(&state, move |store| store.delete(&id)).await?;
    tracing::info!(st_id = %record.st_id, "student deleted");
    Ok(ok("Student deleted successfully", record))
}

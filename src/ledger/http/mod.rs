use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::{
    http_err::{ApiError, ApiResponse, ErrorRep},
    ledger::{
        balance::AdjustBalanceError,
        domain::{Expense, LedgerEntry, Revenue},
        services::{LedgerError, LedgerService},
    },
    server::AppState,
};

use self::reps::OwnerQuery;

pub mod reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expense",
            get(list_entries::<Expense>).post(create_entry::<Expense>),
        )
        .route(
            "/expense/:entry_id",
            get(get_entry::<Expense>)
                .put(update_entry::<Expense>)
                .delete(delete_entry::<Expense>),
        )
        .route(
            "/revenue",
            get(list_entries::<Revenue>).post(create_entry::<Revenue>),
        )
        .route(
            "/revenue/:entry_id",
            get(get_entry::<Revenue>)
                .put(update_entry::<Revenue>)
                .delete(delete_entry::<Revenue>),
        )
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::InvalidEntry(context) => {
                ApiError::BadRequest(ErrorRep::new(reps::entry_validation_message(context)))
            }
            LedgerError::EntryNotFound(id) => {
                ApiError::NotFound(ErrorRep::new(format!("Entry {} not found.", id)))
            }
            LedgerError::AnotherUsersEntry => {
                ApiError::NotFound(ErrorRep::new("Attempting to access another user's entry."))
            }
            LedgerError::AdjustBalance(AdjustBalanceError::UserNotFound(id)) => {
                ApiError::NotFound(ErrorRep::new(format!("User {} not found.", id)))
            }
            LedgerError::AdjustBalance(AdjustBalanceError::Other(error))
            | LedgerError::Other(error) => error.into(),
        }
    }
}

async fn list_entries<E: LedgerEntry>(
    State(service): State<LedgerService<E>>,
    Query(query): Query<OwnerQuery>,
) -> ApiResponse<Json<Vec<E>>> {
    Ok(Json(service.list(&query.user_id).await?))
}

async fn get_entry<E: LedgerEntry>(
    State(service): State<LedgerService<E>>,
    Path(entry_id): Path<i64>,
    Query(query): Query<OwnerQuery>,
) -> ApiResponse<Json<E>> {
    Ok(Json(service.get(entry_id, &query.user_id).await?))
}

async fn create_entry<E: LedgerEntry>(
    State(service): State<LedgerService<E>>,
    Json(entry): Json<E>,
) -> ApiResponse<(StatusCode, Json<E>)> {
    let stored = service.create(entry).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

async fn update_entry<E: LedgerEntry>(
    State(service): State<LedgerService<E>>,
    Path(entry_id): Path<i64>,
    Json(entry): Json<E>,
) -> ApiResponse<Json<E>> {
    Ok(Json(service.update(entry_id, entry).await?))
}

async fn delete_entry<E: LedgerEntry>(
    State(service): State<LedgerService<E>>,
    Path(entry_id): Path<i64>,
    Query(query): Query<OwnerQuery>,
) -> ApiResponse<Json<E>> {
    Ok(Json(service.delete(entry_id, &query.user_id).await?))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::{
    http_err::{ApiError, ApiResponse, ErrorRep},
    identities::{
        domain::users::User,
        services::{UserError, UserService},
    },
    server::AppState,
};

pub mod reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_users).post(register_user))
        .route("/user/login", post(login))
        .route(
            "/user/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::InvalidUser(context) => {
                ApiError::BadRequest(ErrorRep::new(reps::user_validation_message(context)))
            }
            UserError::DuplicateId(id) => {
                ApiError::BadRequest(ErrorRep::new(format!("User id {} already exists.", id)))
            }
            UserError::NotFound(subject) => {
                ApiError::NotFound(ErrorRep::new(format!("User {} not found.", subject)))
            }
            UserError::InvalidCredential => {
                ApiError::BadRequest(ErrorRep::new("Incorrect password."))
            }
            UserError::Other(error) => error.into(),
        }
    }
}

async fn list_users(State(service): State<UserService>) -> ApiResponse<Json<Vec<User>>> {
    Ok(Json(service.list().await?))
}

async fn register_user(
    State(service): State<UserService>,
    Json(user): Json<User>,
) -> ApiResponse<(StatusCode, Json<User>)> {
    let stored = service.register(user).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

async fn login(
    State(service): State<UserService>,
    Json(request): Json<reps::LoginRequest>,
) -> ApiResponse<Json<User>> {
    let user = service.login(&request.email, &request.password).await?;

    Ok(Json(user))
}

async fn get_user(
    State(service): State<UserService>,
    Path(user_id): Path<String>,
) -> ApiResponse<Json<User>> {
    Ok(Json(service.get(&user_id).await?))
}

async fn update_user(
    State(service): State<UserService>,
    Path(user_id): Path<String>,
    Json(user): Json<User>,
) -> ApiResponse<Json<User>> {
    Ok(Json(service.update(&user_id, user).await?))
}

async fn delete_user(
    State(service): State<UserService>,
    Path(user_id): Path<String>,
) -> ApiResponse<Json<User>> {
    Ok(Json(service.delete(&user_id).await?))
}

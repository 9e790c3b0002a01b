use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod calendar;
mod group;
mod memberships;
mod server;
mod shift;
mod user;

pub mod types {
    pub mod group {
        pub use api_types::group::{
            GroupDetail, GroupNew, GroupView, PermissionResponse, UserGroupView,
            UserGroupsResponse,
        };
    }

    pub mod membership {
        pub use api_types::membership::{MemberAdd, MemberView, MembersResponse, MembershipRole};
    }

    pub mod shift {
        pub use api_types::shift::{
            ShiftAssign, ShiftCreated, ShiftDetail, ShiftNew, ShiftView, ShiftsResponse,
        };
    }

    pub mod user {
        pub use api_types::user::{MeResponse, UserFind, UserUpdate, UserView};
    }

    pub mod calendar {
        pub use api_types::calendar::{CalendarQuery, CalendarResponse, DayCellView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidName(_) | EngineError::InvalidRange(_) | EngineError::InvalidRole(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;
use vaultly_repo::category_repo::CategoryRepoError;
use vaultly_repo::session_repo::SessionRepoError;
use vaultly_repo::transaction_repo::TransactionRepoError;
use vaultly_repo::user_repo::UserRepoError;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Signups are disabled")]
    SignupsDisabled,
    #[error(transparent)]
    TransactionRepo(#[from] TransactionRepoError),
    #[error(transparent)]
    CategoryRepo(#[from] CategoryRepoError),
    #[error(transparent)]
    UserRepo(#[from] UserRepoError),
    #[error(transparent)]
    SessionRepo(#[from] SessionRepoError),
    #[error("Unable to process password")]
    Password(#[from] argon2::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) => StatusCode::BAD_REQUEST,
            HandlerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            HandlerError::SignupsDisabled => StatusCode::FORBIDDEN,
            HandlerError::TransactionRepo(TransactionRepoError::TransactionNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            HandlerError::CategoryRepo(CategoryRepoError::CategoryNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            HandlerError::CategoryRepo(CategoryRepoError::CategoryAlreadyExists(_)) => {
                StatusCode::CONFLICT
            }
            HandlerError::UserRepo(UserRepoError::UserNotFound(_)) => StatusCode::NOT_FOUND,
            HandlerError::UserRepo(UserRepoError::UserAlreadyExists(_)) => StatusCode::CONFLICT,
            HandlerError::SessionRepo(SessionRepoError::SessionNotFound) => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            return HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Internal server error" }));
        }
        HttpResponse::build(status).json(serde_json::json!({ "error": self.to_string() }))
    }
}

use actix_web::web::Data;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vaultly_repo::category_repo::CategoryRepo;
use vaultly_repo::session_repo::SessionRepoError;
use vaultly_repo::user_repo::{User, UserRepo, UserRepoError};

use crate::auth::session::SessionAuth;
use crate::auth::{
    extract_session_token, password, removal_cookie, session_cookie, CookieSettings,
    SignupSettings,
};
use crate::category::default_categories;
use crate::error::HandlerError;
use crate::user::models::UserResponse;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub session: SessionInfo,
}

#[derive(Serialize, Deserialize)]
pub struct SessionInfo {
    pub expires_at: DateTime<Utc>,
}

#[post("/signup")]
pub async fn signup(
    user_repo: Data<Arc<dyn UserRepo>>,
    category_repo: Data<Arc<dyn CategoryRepo>>,
    session_auth: Data<SessionAuth>,
    signup_settings: Data<SignupSettings>,
    cookie_settings: Data<CookieSettings>,
    request: web::Json<SignupRequest>,
) -> Result<impl Responder, HandlerError> {
    if !signup_settings.enabled {
        return Err(HandlerError::SignupsDisabled);
    }
    let request = request.into_inner();
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(HandlerError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if request.email.is_empty() || !request.email.contains('@') {
        return Err(HandlerError::Validation(
            "A valid email address is required".to_owned(),
        ));
    }

    let password_hash = password::encode_password(request.password)?;
    let user = User::new(
        Uuid::new_v4().to_string(),
        request.name,
        request.email,
        password_hash,
    );
    user_repo.create_user(user.clone()).await?;

    for new_category in default_categories() {
        if let Err(e) = category_repo.create_category(&user.id, new_category).await {
            warn!(user_id = %user.id, error = %e, "Unable to seed category");
        }
    }

    let session = session_auth.open_session(user.id.clone()).await?;
    info!(user_id = %user.id, "User signed up");

    let cookie = session_cookie(session.id.clone(), &cookie_settings);
    Ok(HttpResponse::Ok().cookie(cookie).json(SessionResponse {
        user: user.into(),
        session: SessionInfo {
            expires_at: session.expires_at,
        },
    }))
}

#[post("/login")]
pub async fn login(
    user_repo: Data<Arc<dyn UserRepo>>,
    session_auth: Data<SessionAuth>,
    cookie_settings: Data<CookieSettings>,
    credentials: web::Json<LoginRequest>,
) -> Result<impl Responder, HandlerError> {
    let credentials = credentials.into_inner();

    // An unknown email and a wrong password produce the same response.
    let user = match user_repo.get_user_by_email(&credentials.email).await {
        Ok(user) => user,
        Err(UserRepoError::UserNotFound(_)) => return Err(HandlerError::InvalidCredentials),
        Err(e) => return Err(e.into()),
    };
    let matched = password::verify_password(credentials.password, user.password_hash.clone())?;
    if !matched {
        return Err(HandlerError::InvalidCredentials);
    }

    let session = session_auth.open_session(user.id.clone()).await?;
    info!(user_id = %user.id, "User logged in");

    let cookie = session_cookie(session.id.clone(), &cookie_settings);
    Ok(HttpResponse::Ok().cookie(cookie).json(SessionResponse {
        user: user.into(),
        session: SessionInfo {
            expires_at: session.expires_at,
        },
    }))
}

#[post("/logout")]
pub async fn logout(
    session_auth: Data<SessionAuth>,
    cookie_settings: Data<CookieSettings>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    if let Some(token) = extract_session_token(&req) {
        match session_auth.close_session(&token).await {
            Ok(()) | Err(SessionRepoError::SessionNotFound) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&cookie_settings))
        .finish())
}

#[get("/session")]
pub async fn get_session(
    session_auth: Data<SessionAuth>,
    user_repo: Data<Arc<dyn UserRepo>>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    let Some(token) = extract_session_token(&req) else {
        return Err(HandlerError::InvalidCredentials);
    };
    let session = session_auth.validate(&token).await?;
    let user = user_repo.get_user(&session.user_id).await?;
    Ok(HttpResponse::Ok().json(SessionResponse {
        user: user.into(),
        session: SessionInfo {
            expires_at: session.expires_at,
        },
    }))
}

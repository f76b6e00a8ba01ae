use actix_web::web::Data;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use tracing::info;
use vaultly_repo::user_repo::UserRepo;

use crate::auth::session::SessionAuth;
use crate::auth::{extract_session_token, password, removal_cookie, CookieSettings};
use crate::error::HandlerError;
use crate::user::models::{PasswordChangeRequest, UpdateProfileRequest, UserResponse};
use crate::user::UserId;

#[get("")]
pub async fn get_profile(
    user_repo: Data<Arc<dyn UserRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user = user_repo.get_user(&user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[put("")]
pub async fn update_profile(
    user_repo: Data<Arc<dyn UserRepo>>,
    user_id: web::ReqData<UserId>,
    update: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, HandlerError> {
    let update = update.into_inner();
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(HandlerError::Validation("Name must not be empty".to_owned()));
        }
    }
    let user = user_repo
        .update_profile(&user_id.into_inner(), update.name, update.image)
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[put("/password")]
pub async fn update_password(
    user_repo: Data<Arc<dyn UserRepo>>,
    session_auth: Data<SessionAuth>,
    user_id: web::ReqData<UserId>,
    change: web::Json<PasswordChangeRequest>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let change = change.into_inner();

    let user = user_repo.get_user(&user_id).await?;
    let matched = password::verify_password(change.current_password, user.password_hash)?;
    if !matched {
        return Err(HandlerError::InvalidCredentials);
    }
    if change.new_password.len() < 8 {
        return Err(HandlerError::Validation(
            "Password must be at least 8 characters".to_owned(),
        ));
    }

    let password_hash = password::encode_password(change.new_password)?;
    user_repo
        .update_password_hash(&user_id, &password_hash)
        .await?;

    // Other sessions are stale after a password change.
    match extract_session_token(&req) {
        Some(token) => session_auth.close_other_sessions(&user_id, &token).await?,
        None => session_auth.close_all_sessions(&user_id).await?,
    }
    info!(%user_id, "Password updated");

    Ok(HttpResponse::Ok().finish())
}

#[delete("")]
pub async fn delete_user(
    user_repo: Data<Arc<dyn UserRepo>>,
    session_auth: Data<SessionAuth>,
    cookie_settings: Data<CookieSettings>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();

    session_auth.close_all_sessions(&user_id).await?;
    user_repo.delete_user(&user_id).await?;
    info!(%user_id, "User deleted");

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&cookie_settings))
        .finish())
}

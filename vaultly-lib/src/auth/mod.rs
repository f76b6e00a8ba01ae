use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{web, Error, HttpMessage, HttpRequest, Scope};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use tracing_actix_web::RootSpan;

use crate::error::HandlerError;
use crate::user::UserId;
use session::SessionAuth;

pub mod handlers;
pub mod password;
pub mod session;

pub const SESSION_COOKIE: &str = "vaultly.session_token";

/// Cookie attributes for the deployment; see [Config](crate::config::Config).
#[derive(Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
}

#[derive(Clone, Copy)]
pub struct SignupSettings {
    pub enabled: bool,
}

pub fn auth_service(signups_enabled: bool) -> Scope {
    web::scope("/auth")
        .app_data(Data::new(SignupSettings {
            enabled: signups_enabled,
        }))
        .service(handlers::signup)
        .service(handlers::login)
        .service(handlers::logout)
        .service(handlers::get_session)
}

pub fn session_cookie(token: String, settings: &CookieSettings) -> Cookie<'static> {
    let builder = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::days(30));
    let builder = if settings.secure {
        builder.secure(true).same_site(SameSite::None)
    } else {
        builder.same_site(SameSite::Lax)
    };
    builder.finish()
}

pub fn removal_cookie(settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), settings);
    cookie.make_removal();
    cookie
}

/// Pulls the session token from the session cookie, falling back to an
/// `Authorization: Bearer` header for non-browser clients.
pub fn extract_session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_owned());
    }
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.to_owned())
}

/// Middleware resolving the session token to a [UserId], injected into
/// request extensions and recorded on the tracing root span. Requests
/// without a live session are rejected with 401.
pub struct SessionAuthentication;

impl<S, B> Transform<S, ServiceRequest> for SessionAuthentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionAuthenticationMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthenticationMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionAuthenticationMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let session_auth = req
                .app_data::<Data<SessionAuth>>()
                .expect("SessionAuth should be registered as app data")
                .clone();

            let Some(token) = extract_session_token(req.request()) else {
                return Err(HandlerError::InvalidCredentials.into());
            };
            let session = session_auth
                .validate(&token)
                .await
                .map_err(HandlerError::from)?;

            if let Some(root_span) = req.extensions().get::<RootSpan>() {
                root_span.record("user_id", session.user_id.as_str());
            }
            req.extensions_mut().insert::<UserId>(session.user_id);

            service.call(req).await
        })
    }
}

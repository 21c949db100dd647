//! JWT extraction middleware
//!
//! Wraps the protected `/api` scope. Reads `Authorization: Bearer <token>`,
//! verifies it and stores `BackendClaims` in request extensions. Requests
//! without a valid token are answered here with a problem+json 401.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::BackendClaims;
use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

fn authenticate(req: &ServiceRequest) -> Result<BackendClaims, AppError> {
    let token = extract_bearer_from_header(req.headers().get(header::AUTHORIZATION))?;
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let claims = verify_access_token(&token, &state.security)?;
    Ok(BackendClaims {
        user_id: claims.user_id()?,
        username: claims.username,
        exp: claims.exp,
    })
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(claims) => {
                // Store claims in request extensions BEFORE calling the service
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            // Render inside the future so the trace context is in scope
            Err(err) => Box::pin(async move {
                let response = err.error_response();
                Ok(req.into_response(response).map_into_right_body())
            }),
        }
    }
}

fn extract_bearer_from_header(header_value: Option<&HeaderValue>) -> Result<String, AppError> {
    let auth_str = header_value
        .ok_or_else(AppError::unauthorized_missing_bearer)?
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let mut parts = auth_str.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("Bearer") => {
            Ok(token.to_string())
        }
        _ => Err(AppError::unauthorized_missing_bearer()),
    }
}

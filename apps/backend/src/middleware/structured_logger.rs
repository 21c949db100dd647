//! Access log: one `request_completed` event per request.
//!
//! Besides method, path, status and latency the event carries the
//! authenticated `user_id` (when `JwtExtract` accepted a bearer) and the
//! `game_id` of game-scoped routes, so a table's traffic can be followed in
//! the JSON logs.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_trace::TraceId;
use super::trace_span::game_id_from_path;
use crate::auth::claims::BackendClaims;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// Fields of one access-log line.
struct Completed {
    method: String,
    path: String,
    game_id: Option<i64>,
    trace_id: String,
    user_id: Option<i64>,
    status: StatusCode,
    duration_us: u64,
}

impl Completed {
    fn emit(&self) {
        let status_code = self.status.as_u16();
        let game_id = self.game_id.unwrap_or_default();
        let user_id = self.user_id.unwrap_or_default();
        let (method, path, trace_id, duration_us) =
            (&self.method, &self.path, &self.trace_id, self.duration_us);

        if self.status.is_server_error() {
            error!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, game_id, user_id, trace_id = %trace_id, message = "request_completed");
        } else if self.status.is_client_error() {
            warn!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, game_id, user_id, trace_id = %trace_id, message = "request_completed");
        } else {
            info!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, game_id, user_id, trace_id = %trace_id, message = "request_completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let game_id = game_id_from_path(&path);

        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            // Claims are only present once JwtExtract ran inside this layer
            let (status, user_id) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request()
                        .extensions()
                        .get::<BackendClaims>()
                        .map(|c| c.user_id),
                ),
                Err(err) => (err.as_response_error().status_code(), None),
            };

            Completed {
                method,
                path,
                game_id,
                trace_id,
                user_id,
                status,
                duration_us: start.elapsed().as_micros() as u64,
            }
            .emit();

            result
        })
    }
}

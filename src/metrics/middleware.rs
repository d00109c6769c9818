//! Request instrumentation middleware.
//!
//! Starts a timer when a request arrives and records the counter and the
//! latency histogram once the response body has been fully sent. A body
//! dropped half-way (client went away) is not recorded.

use std::{
    pin::Pin,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use actix_web::{
    body::{BodySize, BoxBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{Method, StatusCode},
    web::Bytes,
    Error,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use super::HttpMetrics;
use crate::config::RouteLabel;

/// Middleware factory; `.wrap()` it as the outermost layer.
#[derive(Clone)]
pub struct RequestMetrics {
    metrics: Arc<HttpMetrics>,
    route_label: RouteLabel,
}

impl RequestMetrics {
    pub fn new(metrics: Arc<HttpMetrics>, route_label: RouteLabel) -> Self {
        RequestMetrics {
            metrics,
            route_label,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<MetricsBody>;
    type Error = Error;
    type Transform = RequestMetricsMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestMetricsMiddleware {
            service: Rc::new(service),
            metrics: self.metrics.clone(),
            route_label: self.route_label,
        }))
    }
}

pub struct RequestMetricsMiddleware<S> {
    service: Rc<S>,
    metrics: Arc<HttpMetrics>,
    route_label: RouteLabel,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<MetricsBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let metrics = self.metrics.clone();
        let route_label = self.route_label;

        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    // The pattern is only known once routing has happened.
                    let route = match route_label {
                        RouteLabel::Path => path,
                        RouteLabel::Pattern => res.request().match_pattern().unwrap_or(path),
                    };
                    let status = res.status();
                    let pending = Pending {
                        metrics,
                        method,
                        route,
                        status,
                        start,
                    };
                    Ok(res.map_body(move |_, body| MetricsBody::new(body.boxed(), pending)))
                }
                Err(err) => {
                    // No body will follow; the error becomes the response right away.
                    let status = err.as_response_error().status_code();
                    metrics.observe(
                        method.as_str(),
                        &path,
                        status.as_u16(),
                        start.elapsed().as_secs_f64(),
                    );
                    Err(err)
                }
            }
        })
    }
}

/// Everything needed to record a request once its response is finished.
struct Pending {
    metrics: Arc<HttpMetrics>,
    method: Method,
    route: String,
    status: StatusCode,
    start: Instant,
}

impl Pending {
    fn record(self) {
        self.metrics.observe(
            self.method.as_str(),
            &self.route,
            self.status.as_u16(),
            self.start.elapsed().as_secs_f64(),
        );
    }

    /// True when the server will never poll the body: HEAD responses and
    /// statuses that forbid a payload.
    fn bodiless(&self) -> bool {
        self.method == Method::HEAD
            || self.status.is_informational()
            || self.status == StatusCode::NO_CONTENT
            || self.status == StatusCode::NOT_MODIFIED
    }
}

/// Response body wrapper that fires the completion hook exactly once.
pub struct MetricsBody {
    body: BoxBody,
    pending: Option<Pending>,
}

impl MetricsBody {
    fn new(body: BoxBody, pending: Pending) -> Self {
        MetricsBody {
            body,
            pending: Some(pending),
        }
    }

    fn finish(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.record();
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self.body.size(), BodySize::None | BodySize::Sized(0))
    }
}

impl MessageBody for MetricsBody {
    type Error = Box<dyn std::error::Error>;

    fn size(&self) -> BodySize {
        self.body.size()
    }

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Bytes, Self::Error>>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.body).poll_next(cx);
        if let Poll::Ready(None) = poll {
            this.finish();
        }
        poll
    }
}

impl Drop for MetricsBody {
    fn drop(&mut self) {
        // Bodies with nothing to stream are complete as soon as the head is out.
        let complete = self.is_empty() || self.pending.as_ref().is_some_and(Pending::bodiless);
        if complete {
            self.finish();
        }
    }
}

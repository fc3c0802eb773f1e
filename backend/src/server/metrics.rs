//! Optional Prometheus metrics middleware wrapper.
//!
//! Request counters and latency histograms are exported on `/metrics` under
//! the `tripshare` namespace. When metrics are not configured the layer only
//! boxes the response body so both arms produce the same service type.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;

const NAMESPACE: &str = "tripshare";
const ENDPOINT: &str = "/metrics";

/// Build the Prometheus middleware and its scrape endpoint.
///
/// # Errors
/// Returns [`std::io::Error`] when metric registration fails.
pub(crate) fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint(ENDPOINT)
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        match metrics {
            Some(metrics) => Self::Enabled(Arc::new(metrics)),
            None => Self::Disabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self.clone() {
            MetricsLayer::Enabled(metrics) => {
                let fut = Compat::new((*metrics).clone()).new_transform(service);
                Box::pin(async move {
                    let svc = fut.await?;
                    Ok(boxed::service(svc))
                })
            }
            MetricsLayer::Disabled => Box::pin(async move {
                let svc = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Ok(boxed::service(svc))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, web};
    use rstest::rstest;

    use super::*;

    async fn pong() -> HttpResponse {
        HttpResponse::Ok().body("pong")
    }

    #[rstest]
    #[case(true, StatusCode::OK)]
    #[case(false, StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn scrape_endpoint_follows_the_layer(
        #[case] enabled: bool,
        #[case] scrape_status: StatusCode,
    ) {
        let metrics = if enabled {
            Some(build_metrics().expect("metrics build"))
        } else {
            None
        };
        let app = actix_test::init_service(
            App::new()
                .wrap(MetricsLayer::from_option(metrics))
                .route("/ping", web::get().to(pong)),
        )
        .await;

        let ping = actix_test::TestRequest::get().uri("/ping").to_request();
        assert_eq!(
            actix_test::call_service(&app, ping).await.status(),
            StatusCode::OK
        );
        let scrape = actix_test::TestRequest::get().uri(ENDPOINT).to_request();
        assert_eq!(
            actix_test::call_service(&app, scrape).await.status(),
            scrape_status
        );
    }
}

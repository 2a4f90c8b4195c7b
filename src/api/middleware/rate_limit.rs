//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type PeerIpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter for the public redirect endpoint.
///
/// # Limits
///
/// - **Rate**: 50 requests per second
/// - **Burst**: 200 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Limits are
/// keyed by the socket peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn layer() -> PeerIpGovernorLayer {
    build(50, 200)
}

/// Creates a stricter rate limiter for the admin endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure_layer() -> PeerIpGovernorLayer {
    build(1, 10)
}

fn build(per_second: u64, burst_size: u32) -> PeerIpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("rate limit period and burst size are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

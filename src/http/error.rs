use warp::reply::{Reply, Response};
use warp::Rejection;

use crate::sso::SsoResponse;

/// Carries an interceptor response out of the filter chain.
#[derive(Debug)]
pub struct SsoRejection(pub SsoResponse);

impl warp::reject::Reject for SsoRejection {}

pub fn intercept(response: SsoResponse) -> Rejection {
    warp::reject::custom(SsoRejection(response))
}

pub async fn handle_reject(err: Rejection) -> Result<Response, Rejection> {
    match err.find::<SsoRejection>() {
        Some(SsoRejection(response)) => Ok(response.clone().into_response()),
        None => Err(err),
    }
}

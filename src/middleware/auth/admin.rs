//! Admin gate: access middleware の内側で role を確認する
//!
//! - access::apply より内側 (先に追加) に置くこと。CurrentUser が無ければ 401、admin でなければ 403

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{CurrentUser, policy};
use crate::state::AppState;

pub fn apply(router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn(admin_gate))
}

async fn admin_gate(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let current = req.extensions().get::<CurrentUser>();

    if let Err(err) = policy::require_admin(current) {
        tracing::warn!(
            user_id = ?current.map(|c| c.0.id),
            path = %req.uri().path(),
            "admin route refused"
        );
        return Err(err.into());
    }

    Ok(next.run(req).await)
}

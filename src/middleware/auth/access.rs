//! Bearer token 検証 → CurrentUser を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を IdentityLoader に渡す (署名 / iss / exp の検証 + user 再取得)
//! - role などの属性は毎リクエスト store から読み直す (token には載せない)
//! - 失敗理由は IdentityLoader 側で warn ログに残し、クライアントには汎用メッセージだけ返す

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// 認証が必要な Router に access middleware を掛ける。
///
/// route_layer なので、マッチしなかったパスは 401 ではなく 404 のまま返る。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let current = state.identity.authenticate(raw).await?;

    tracing::debug!(user_id = %current.0.id, role = %current.0.role, "request authenticated");

    // middleware → extractor への受け渡し (リクエストと一緒に破棄される)
    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}

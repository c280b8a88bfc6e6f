/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - public (認証なし) / protected (Bearer 必須) / admin (Bearer + admin gate) の 3 つに分けて merge/nest
 * - 認証は route_layer で掛ける (マッチしないパスは 401 ではなく 404)
 */
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::middleware::auth::{access, admin};
use crate::state::AppState;

use crate::api::v1::handlers::{
    appointments::{
        admin_list_appointments, all_appointments, cancel_appointment, create_appointment,
        delete_appointment, get_appointment, my_appointments, update_appointment,
        update_appointment_status,
    },
    assessments::{
        delete_assessment, get_assessment, list_assessments, my_assessments, submit_assessment,
    },
    auth::{login, register},
    careers::{create_career, delete_career, get_career, list_careers, update_career},
    health::{admin_health, health},
    users::{get_me, list_users, update_me, update_user_role},
};

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/careers", get(list_careers))
        .route("/careers/{id}", get(get_career))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(get_me).put(update_me))
        // static segments win over "/{id}" in the matcher
        .route("/appointments", post(create_appointment))
        .route("/appointments/my", get(my_appointments))
        .route("/appointments/all", get(all_appointments))
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/appointments/{id}/cancel", patch(cancel_appointment))
        .route("/assessments", get(list_assessments))
        .route("/assessments/my", get(my_assessments))
        .route("/assessments/submit", post(submit_assessment))
        .route("/assessments/{id}", get(get_assessment));

    access::apply(router, state)
}

fn admin_routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(admin_health))
        .route("/careers", get(list_careers).post(create_career))
        .route("/careers/{id}", put(update_career).delete(delete_career))
        .route("/appointments", get(admin_list_appointments))
        .route("/appointments/{id}/status", patch(update_appointment_status))
        .route("/appointments/{id}", delete(delete_appointment))
        .route("/users", get(list_users))
        .route("/users/{id}/role", patch(update_user_role))
        .route("/assessments", get(list_assessments))
        .route("/assessments/{id}", delete(delete_assessment));

    // admin gate first, then access around it (access runs first)
    access::apply(admin::apply(router), state)
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}

//! Route table

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{auth, docs, health, private_dish, private_menu, public_menu, root};
use crate::middleware::require_auth;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let private = Router::new()
        .route("/private/menu/", get(private_menu::list).post(private_menu::create))
        .route(
            "/private/menu/{id}/",
            get(private_menu::get)
                .put(private_menu::replace)
                .patch(private_menu::patch)
                .delete(private_menu::delete),
        )
        .route("/private/dishes/", get(private_dish::list).post(private_dish::create))
        .route(
            "/private/dishes/{id}/",
            get(private_dish::get)
                .put(private_dish::replace)
                .patch(private_dish::patch)
                .delete(private_dish::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(root::api_root))
        .route("/docs/", get(docs::catalogue))
        .route("/health", get(health::health_check))
        .route("/api-auth/login", post(auth::login))
        .route("/public/menu/", get(public_menu::list))
        .route("/public/menu/{id}/", get(public_menu::detail))
        .merge(private)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
}

use axum::Json;
use serde::Serialize;

use crate::response::ApiResponse;

#[derive(Serialize)]
pub struct RootLinks {
    pub docs: &'static str,
    #[serde(rename = "private-dishes")]
    pub private_dishes: &'static str,
    #[serde(rename = "private-menus")]
    pub private_menus: &'static str,
    #[serde(rename = "public-menus")]
    pub public_menus: &'static str,
}

/// GET / - entry points of the API
pub async fn api_root() -> Json<ApiResponse<RootLinks>> {
    Json(ApiResponse::success(RootLinks {
        docs: "/docs/",
        private_dishes: "/private/dishes/",
        private_menus: "/private/menu/",
        public_menus: "/public/menu/",
    }))
}

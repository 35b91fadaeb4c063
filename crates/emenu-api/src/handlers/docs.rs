//! Endpoint catalogue served at `/docs/`.

use axum::Json;
use serde::Serialize;

use crate::response::ApiResponse;

#[derive(Serialize)]
pub struct EndpointDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub access: &'static str,
    pub description: &'static str,
    pub query: &'static [&'static str],
}

const PAGING: &[&str] = &["page", "page_size"];

const PUBLIC_MENU_QUERY: &[&str] = &[
    "name",
    "date_added",
    "date_added__lt",
    "date_added__lte",
    "date_added__gt",
    "date_added__gte",
    "date_modified",
    "date_modified__lt",
    "date_modified__lte",
    "date_modified__gt",
    "date_modified__gte",
    "ordering (name, dishes__count; prefix - for descending)",
    "page",
    "page_size",
];

const ENDPOINTS: &[EndpointDoc] = &[
    EndpointDoc { method: "POST", path: "/api-auth/login", access: "public", description: "Exchange username and password for a bearer token", query: &[] },
    EndpointDoc { method: "GET", path: "/public/menu/", access: "public", description: "Menus with at least one dish", query: PUBLIC_MENU_QUERY },
    EndpointDoc { method: "GET", path: "/public/menu/{id}/", access: "public", description: "Menu with full dish records", query: &[] },
    EndpointDoc { method: "GET", path: "/private/menu/", access: "bearer", description: "All menus", query: PAGING },
    EndpointDoc { method: "POST", path: "/private/menu/", access: "bearer", description: "Create a menu", query: &[] },
    EndpointDoc { method: "GET|PUT|PATCH|DELETE", path: "/private/menu/{id}/", access: "bearer", description: "Read, update or delete a menu", query: &[] },
    EndpointDoc { method: "GET", path: "/private/dishes/", access: "bearer", description: "All dishes", query: PAGING },
    EndpointDoc { method: "POST", path: "/private/dishes/", access: "bearer", description: "Create a dish", query: &[] },
    EndpointDoc { method: "GET|PUT|PATCH|DELETE", path: "/private/dishes/{id}/", access: "bearer", description: "Read, update or delete a dish", query: &[] },
];

/// GET /docs/
pub async fn catalogue() -> Json<ApiResponse<&'static [EndpointDoc]>> {
    Json(ApiResponse::success(ENDPOINTS))
}

//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, history_handler, product_handler};
use crate::domain::{HistoryAction, HistoryRecord, HistoryUser, Product, UserRole, UserSummary};
use crate::types::{EmptyObject, MessageResponse};

/// OpenAPI documentation for the Inventory API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Per-user product inventory with an audit trail and PDF/XLSX reports"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        product_handler::list_products,
        product_handler::list_out_of_stock,
        product_handler::get_product,
        product_handler::add_product,
        product_handler::update_product,
        product_handler::delete_product,
        history_handler::product_history,
        history_handler::export,
    ),
    components(
        schemas(
            UserRole,
            UserSummary,
            Product,
            HistoryAction,
            HistoryUser,
            HistoryRecord,
            EmptyObject,
            MessageResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthResponse,
            product_handler::AddProductRequest,
            product_handler::UpdateProductRequest,
            history_handler::HistoryResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and logout"),
        (name = "Products", description = "Owner-scoped inventory"),
        (name = "History", description = "Audit log and exports")
    )
)]
pub struct ApiDoc;

/// Bearer scheme; browsers send the same token in the `token` cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

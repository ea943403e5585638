//! Product handlers. Every route is owner-scoped through the session user.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{JsonBody, PathParam};
use crate::api::middleware::CurrentUser;
use crate::api::routes::method_not_allowed;
use crate::api::AppState;
use crate::domain::{NewProduct, Product, ProductChanges};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, EmptyObject};

/// Create product request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddProductRequest {
    #[schema(example = "Wireless Mouse")]
    pub name: String,
    #[schema(example = "Electronics")]
    pub category: String,
    #[schema(example = 24.99, minimum = 0)]
    pub price: f64,
    #[schema(example = 12, minimum = 0)]
    pub quantity: i32,
    #[schema(example = "0123456789012")]
    pub barcode: String,
}

impl From<AddProductRequest> for NewProduct {
    fn from(req: AddProductRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            category: req.category.trim().to_string(),
            price: req.price,
            quantity: req.quantity,
            barcode: req.barcode.trim().to_string(),
        }
    }
}

/// Partial product update; omitted fields keep their value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    #[schema(minimum = 0)]
    pub price: Option<f64>,
    #[schema(minimum = 0)]
    pub quantity: Option<i32>,
    pub barcode: Option<String>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(req: UpdateProductRequest) -> Self {
        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            name: trimmed(req.name),
            category: trimmed(req.category),
            price: req.price,
            quantity: req.quantity,
            barcode: trimmed(req.barcode),
        }
    }
}

/// Create product routes (mounted under `/api/products`, behind auth)
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).fallback(method_not_allowed))
        .route(
            "/out-of-stock",
            get(list_out_of_stock).fallback(method_not_allowed),
        )
        .route("/add", post(add_product).fallback(method_not_allowed))
        .route(
            "/:id",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .fallback(method_not_allowed),
        )
}

/// List the caller's products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Products, newest first", body = [Product]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state
        .product_service
        .list_products(&current_user.actor())
        .await?;
    Ok(Json(ApiResponse::success(products)))
}

/// List the caller's products with zero quantity
#[utoipa::path(
    get,
    path = "/api/products/out-of-stock",
    tag = "Products",
    responses(
        (status = 200, description = "Out-of-stock products", body = [Product]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_out_of_stock(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state
        .product_service
        .list_out_of_stock(&current_user.actor())
        .await?;
    Ok(Json(ApiResponse::success(products)))
}

/// Get one of the caller's products
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .product_service
        .get_product(&current_user.actor(), id)
        .await?;
    Ok(Json(ApiResponse::success(product)))
}

/// Add a product
#[utoipa::path(
    post,
    path = "/api/products/add",
    tag = "Products",
    request_body = AddProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Demo account"),
        (status = 409, description = "Barcode already used by this user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<AddProductRequest>,
) -> AppResult<Created<Product>> {
    let product = state
        .product_service
        .add_product(&current_user.actor(), payload.into())
        .await?;
    Ok(Created(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Demo account"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Barcode already used by this user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .product_service
        .update_product(&current_user.actor(), id, payload.into())
        .await?;
    Ok(Json(ApiResponse::success(product)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = EmptyObject),
        (status = 403, description = "Demo account"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<ApiResponse<EmptyObject>>> {
    state
        .product_service
        .delete_product(&current_user.actor(), id)
        .await?;
    Ok(Json(ApiResponse::success(EmptyObject::default())))
}

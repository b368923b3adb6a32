use actix_web::{Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::json_response;
use crate::services::catalog::{self, NamedListQuery, ProductStatsQuery, ProductsQuery};

#[get("/v1/brands")]
pub async fn api_v1_brands(
    params: web::Query<NamedListQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        catalog::list_brands(repo.get_ref(), params.into_inner()),
        "list brands",
    )
}

#[get("/v1/categories")]
pub async fn api_v1_categories(
    params: web::Query<NamedListQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        catalog::list_categories(repo.get_ref(), params.into_inner()),
        "list categories",
    )
}

#[get("/v1/products")]
/// Products filtered by brand, category, model year and price range.
pub async fn api_v1_products(
    params: web::Query<ProductsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        catalog::list_products(repo.get_ref(), params.into_inner()),
        "list products",
    )
}

#[get("/v1/products/stats")]
pub async fn api_v1_product_stats(
    params: web::Query<ProductStatsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        catalog::product_stats(repo.get_ref(), params.into_inner()),
        "compute product statistics",
    )
}

#[get("/v1/products/{product_id}")]
/// Product with its brand, category and stock per store.
pub async fn api_v1_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        catalog::product_details(repo.get_ref(), product_id.into_inner()),
        "load product",
    )
}

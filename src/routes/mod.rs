//! JSON handlers under `/v1`.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;

use crate::services::{ServiceError, ServiceResult};

pub mod catalog;
pub mod inventory;
pub mod maintenance;
pub mod orders;
pub mod people;
pub mod stores;

/// Register every handler. Literal segments such as `/v1/products/stats` are
/// registered before the `{id}` routes they would otherwise collide with.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(catalog::api_v1_brands)
        .service(catalog::api_v1_categories)
        .service(catalog::api_v1_product_stats)
        .service(catalog::api_v1_products)
        .service(catalog::api_v1_product)
        .service(inventory::api_v1_stock_totals)
        .service(inventory::api_v1_stocks)
        .service(inventory::api_v1_adjust_stock)
        .service(orders::api_v1_order_revenue)
        .service(orders::api_v1_orders)
        .service(orders::api_v1_order)
        .service(orders::api_v1_place_order)
        .service(orders::api_v1_change_order_status)
        .service(orders::api_v1_ship_order)
        .service(people::api_v1_customers)
        .service(people::api_v1_add_customer)
        .service(people::api_v1_staffs)
        .service(people::api_v1_staff_reports)
        .service(people::api_v1_staff_managers)
        .service(stores::api_v1_stores)
        .service(maintenance::api_v1_integrity);
}

fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::Form(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        ServiceError::Conflict(message) => {
            HttpResponse::Conflict().json(json!({ "error": message }))
        }
        ServiceError::Internal(message) => {
            log::error!("Failed to {action}: {message}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// `200 OK` with the serialized value, or the status matching the error.
pub(crate) fn json_response<T: Serialize>(result: ServiceResult<T>, action: &str) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(err) => error_response(err, action),
    }
}

/// Like [`json_response`] with `201 Created` on success.
pub(crate) fn created_response<T: Serialize>(
    result: ServiceResult<T>,
    action: &str,
) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Created().json(value),
        Err(err) => error_response(err, action),
    }
}

use actix_web::{Responder, get, post, web};

use crate::forms::orders::{ChangeStatusForm, PlaceOrderForm, ShipOrderForm};
use crate::repository::DieselRepository;
use crate::routes::{created_response, json_response};
use crate::services::orders::{self, OrdersQuery, RevenueQuery};

#[get("/v1/orders")]
pub async fn api_v1_orders(
    params: web::Query<OrdersQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        orders::list_orders(repo.get_ref(), params.into_inner()),
        "list orders",
    )
}

#[get("/v1/orders/revenue")]
pub async fn api_v1_order_revenue(
    params: web::Query<RevenueQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        orders::order_revenue(repo.get_ref(), params.into_inner()),
        "compute revenue",
    )
}

#[get("/v1/orders/{order_id}")]
pub async fn api_v1_order(
    order_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        orders::order_details(repo.get_ref(), order_id.into_inner()),
        "load order",
    )
}

#[post("/v1/orders")]
/// Places a pending order and responds `201 Created` with its items.
pub async fn api_v1_place_order(
    form: web::Json<PlaceOrderForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_response(
        orders::place_order(repo.get_ref(), form.into_inner()),
        "place order",
    )
}

#[post("/v1/orders/{order_id}/status")]
pub async fn api_v1_change_order_status(
    order_id: web::Path<i32>,
    form: web::Json<ChangeStatusForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        orders::change_order_status(repo.get_ref(), order_id.into_inner(), form.into_inner()),
        "change order status",
    )
}

#[post("/v1/orders/{order_id}/ship")]
pub async fn api_v1_ship_order(
    order_id: web::Path<i32>,
    form: web::Json<ShipOrderForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        orders::ship_order(repo.get_ref(), order_id.into_inner(), form.into_inner()),
        "ship order",
    )
}

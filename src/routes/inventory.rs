use actix_web::{Responder, get, post, web};

use crate::forms::stocks::AdjustStockForm;
use crate::repository::DieselRepository;
use crate::routes::json_response;
use crate::services::inventory::{self, StockTotalsQuery, StocksQuery};

#[get("/v1/stocks")]
pub async fn api_v1_stocks(
    params: web::Query<StocksQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        inventory::list_stocks(repo.get_ref(), params.into_inner()),
        "list stocks",
    )
}

#[get("/v1/stocks/totals")]
pub async fn api_v1_stock_totals(
    params: web::Query<StockTotalsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        inventory::stock_totals(repo.get_ref(), params.into_inner()),
        "compute stock totals",
    )
}

#[post("/v1/stocks/adjust")]
/// Adds or removes units. Responds `409 Conflict` when the quantity would
/// drop below zero.
pub async fn api_v1_adjust_stock(
    form: web::Json<AdjustStockForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        inventory::adjust_stock(repo.get_ref(), form.into_inner()),
        "adjust stock",
    )
}

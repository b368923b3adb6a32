use actix_web::{Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::json_response;
use crate::services::maintenance;

#[get("/v1/integrity")]
pub async fn api_v1_integrity(repo: web::Data<DieselRepository>) -> impl Responder {
    json_response(
        maintenance::integrity_report(repo.get_ref()),
        "check integrity",
    )
}

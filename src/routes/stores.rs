use actix_web::{Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::json_response;
use crate::services::stores::{self, StoresQuery};

#[get("/v1/stores")]
pub async fn api_v1_stores(
    params: web::Query<StoresQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        stores::list_stores(repo.get_ref(), params.into_inner()),
        "list stores",
    )
}

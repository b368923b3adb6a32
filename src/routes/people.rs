use actix_web::{Responder, get, post, web};

use crate::forms::customers::AddCustomerForm;
use crate::repository::DieselRepository;
use crate::routes::{created_response, json_response};
use crate::services::people::{self, CustomersQuery, StaffsQuery};

#[get("/v1/customers")]
pub async fn api_v1_customers(
    params: web::Query<CustomersQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        people::list_customers(repo.get_ref(), params.into_inner()),
        "list customers",
    )
}

#[post("/v1/customers")]
pub async fn api_v1_add_customer(
    form: web::Json<AddCustomerForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_response(
        people::create_customer(repo.get_ref(), form.into_inner()),
        "create customer",
    )
}

#[get("/v1/staffs")]
pub async fn api_v1_staffs(
    params: web::Query<StaffsQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        people::list_staffs(repo.get_ref(), params.into_inner()),
        "list staff",
    )
}

#[get("/v1/staffs/{staff_id}/reports")]
pub async fn api_v1_staff_reports(
    staff_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        people::staff_reports(repo.get_ref(), staff_id.into_inner()),
        "list staff reports",
    )
}

#[get("/v1/staffs/{staff_id}/managers")]
/// Managers from the direct manager up to the top of the hierarchy.
pub async fn api_v1_staff_managers(
    staff_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_response(
        people::manager_chain(repo.get_ref(), staff_id.into_inner()),
        "load manager chain",
    )
}

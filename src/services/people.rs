use serde::Deserialize;

use crate::domain::customer::{Customer, CustomerFilter, CustomerListQuery, CustomerOrderBy};
use crate::domain::staff::{Staff, StaffFilter, StaffListQuery, StaffOrderBy};
use crate::forms::customers::AddCustomerForm;
use crate::pagination::{Paginated, SortDirection};
use crate::repository::{CustomerReader, CustomerWriter, StaffReader};
use crate::services::{PageQuery, ServiceError, ServiceResult};

fn search_term(search: Option<&str>) -> Option<&str> {
    search.filter(|term| !term.trim().is_empty())
}

/// Query parameters accepted by the customer listing.
#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub sort: Option<CustomerOrderBy>,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub fn list_customers<R>(repo: &R, query: CustomersQuery) -> ServiceResult<Paginated<Customer>>
where
    R: CustomerReader + ?Sized,
{
    let pagination = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .pagination();

    let mut filter = CustomerFilter::new();
    if let Some(search) = search_term(query.search.as_deref()) {
        filter = filter.search(search);
    }
    if let Some(city) = query.city {
        filter = filter.city(city);
    }
    if let Some(state) = query.state {
        filter = filter.state(state);
    }

    let list_query = CustomerListQuery::new()
        .filter(filter)
        .order_by(
            query.sort.unwrap_or_default(),
            query.direction.unwrap_or_default(),
        )
        .paginate(pagination.page, pagination.per_page);

    let (total, items) = repo.list_customers(list_query)?;
    Ok(Paginated::new(items, pagination.page, total, pagination.per_page))
}

/// Validates the form and stores a new customer.
pub fn create_customer<R>(repo: &R, form: AddCustomerForm) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let new_customer = form
        .into_new_customer()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let customer = repo.create_customer(&new_customer)?;
    log::info!("Created customer {}", customer.customer_id);
    Ok(customer)
}

/// Query parameters accepted by the staff listing.
#[derive(Debug, Default, Deserialize)]
pub struct StaffsQuery {
    pub search: Option<String>,
    pub store_id: Option<i32>,
    pub active: Option<bool>,
    pub manager_id: Option<i32>,
    /// Only staff without a manager.
    #[serde(default)]
    pub top_level: bool,
    pub sort: Option<StaffOrderBy>,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub fn list_staffs<R>(repo: &R, query: StaffsQuery) -> ServiceResult<Paginated<Staff>>
where
    R: StaffReader + ?Sized,
{
    let pagination = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .pagination();

    let mut filter = StaffFilter::new();
    if let Some(search) = search_term(query.search.as_deref()) {
        filter = filter.search(search);
    }
    if let Some(store_id) = query.store_id {
        filter = filter.store_id(store_id);
    }
    if let Some(active) = query.active {
        filter = filter.active(active);
    }
    if let Some(manager_id) = query.manager_id {
        filter = filter.manager_id(manager_id);
    }
    if query.top_level {
        filter = filter.top_level();
    }

    let list_query = StaffListQuery::new()
        .filter(filter)
        .order_by(
            query.sort.unwrap_or_default(),
            query.direction.unwrap_or_default(),
        )
        .paginate(pagination.page, pagination.per_page);

    let (total, items) = repo.list_staffs(list_query)?;
    Ok(Paginated::new(items, pagination.page, total, pagination.per_page))
}

/// Direct reports of a staff member.
pub fn staff_reports<R>(repo: &R, staff_id: i32) -> ServiceResult<Vec<Staff>>
where
    R: StaffReader + ?Sized,
{
    if repo.get_staff_by_id(staff_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    Ok(repo.list_reports(staff_id)?)
}

/// Managers above a staff member, nearest first.
pub fn manager_chain<R>(repo: &R, staff_id: i32) -> ServiceResult<Vec<Staff>>
where
    R: StaffReader + ?Sized,
{
    Ok(repo.manager_chain(staff_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use crate::repository::mock::{MockCustomerReader, MockCustomerWriter, MockStaffReader};

    fn staff(staff_id: i32, manager_id: Option<i32>) -> Staff {
        Staff {
            staff_id,
            first_name: "Mireya".to_string(),
            last_name: "Copeland".to_string(),
            email: format!("staff{staff_id}@bikes.shop"),
            phone: None,
            active: true,
            store_id: 1,
            manager_id,
        }
    }

    #[test]
    fn create_customer_rejects_bad_email() {
        let mut repo = MockCustomerWriter::new();
        repo.expect_create_customer().never();

        let form = AddCustomerForm {
            first_name: "Debra".to_string(),
            last_name: "Burks".to_string(),
            email: "debra".to_string(),
            phone: None,
            street: None,
            city: None,
            state: None,
            zip_code: None,
        };

        assert!(matches!(
            create_customer(&repo, form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn create_customer_stores_sanitized_payload() {
        let mut repo = MockCustomerWriter::new();
        repo.expect_create_customer()
            .times(1)
            .withf(|new_customer| new_customer.email == "debra.burks@yahoo.com")
            .returning(|new_customer| {
                Ok(Customer {
                    customer_id: 1446,
                    first_name: new_customer.first_name.clone(),
                    last_name: new_customer.last_name.clone(),
                    phone: new_customer.phone.clone(),
                    email: new_customer.email.clone(),
                    street: new_customer.street.clone(),
                    city: new_customer.city.clone(),
                    state: new_customer.state.clone(),
                    zip_code: new_customer.zip_code.clone(),
                })
            });

        let form = AddCustomerForm {
            first_name: "Debra".to_string(),
            last_name: "Burks".to_string(),
            email: "Debra.Burks@yahoo.com".to_string(),
            phone: None,
            street: None,
            city: Some("Orchard Park".to_string()),
            state: Some("NY".to_string()),
            zip_code: None,
        };

        let customer = create_customer(&repo, form).unwrap();
        assert_eq!(customer.customer_id, 1446);
    }

    #[test]
    fn list_customers_ignores_blank_search() {
        let mut repo = MockCustomerReader::new();
        repo.expect_list_customers()
            .times(1)
            .withf(|query| query.filter.search.is_none() && query.filter.state.is_some())
            .returning(|_| Ok((0, Vec::new())));

        let query = CustomersQuery {
            search: Some("   ".to_string()),
            state: Some("TX".to_string()),
            ..CustomersQuery::default()
        };
        list_customers(&repo, query).unwrap();
    }

    #[test]
    fn list_staffs_applies_top_level() {
        let mut repo = MockStaffReader::new();
        repo.expect_list_staffs()
            .times(1)
            .withf(|query| query.filter.top_level && query.order_by == StaffOrderBy::LastName)
            .returning(|_| Ok((1, vec![staff(1, None)])));

        let query = StaffsQuery {
            top_level: true,
            sort: Some(StaffOrderBy::LastName),
            ..StaffsQuery::default()
        };
        let page = list_staffs(&repo, query).unwrap();
        assert_eq!(page.items[0].staff_id, 1);
    }

    #[test]
    fn reports_of_missing_staff_is_not_found() {
        let mut repo = MockStaffReader::new();
        repo.expect_get_staff_by_id().returning(|_| Ok(None));
        repo.expect_list_reports().never();

        assert!(matches!(
            staff_reports(&repo, 42),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn reports_are_listed() {
        let mut repo = MockStaffReader::new();
        repo.expect_get_staff_by_id()
            .returning(|staff_id| Ok(Some(staff(staff_id, None))));
        repo.expect_list_reports()
            .withf(|manager_id| *manager_id == 1)
            .returning(|_| Ok(vec![staff(2, Some(1)), staff(5, Some(1))]));

        let reports = staff_reports(&repo, 1).unwrap();
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn looping_chain_is_a_conflict() {
        let mut repo = MockStaffReader::new();
        repo.expect_manager_chain()
            .returning(|_| Err(RepositoryError::Validation("loop".to_string())));

        assert!(matches!(
            manager_chain(&repo, 3),
            Err(ServiceError::Conflict(_))
        ));
    }
}

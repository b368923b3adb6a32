use serde::Deserialize;

use crate::domain::store::{Store, StoreFilter, StoreListQuery, StoreOrderBy};
use crate::pagination::{Paginated, SortDirection};
use crate::repository::StoreReader;
use crate::services::{PageQuery, ServiceResult};

/// Query parameters accepted by the store listing.
#[derive(Debug, Default, Deserialize)]
pub struct StoresQuery {
    pub search: Option<String>,
    pub state: Option<String>,
    /// Sort by name instead of id.
    #[serde(default)]
    pub by_name: bool,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub fn list_stores<R>(repo: &R, query: StoresQuery) -> ServiceResult<Paginated<Store>>
where
    R: StoreReader + ?Sized,
{
    let pagination = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .pagination();

    let mut filter = StoreFilter::new();
    if let Some(search) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        filter = filter.search(search);
    }
    if let Some(state) = query.state {
        filter = filter.state(state);
    }

    let order_by = if query.by_name {
        StoreOrderBy::Name
    } else {
        StoreOrderBy::Id
    };

    let list_query = StoreListQuery::new()
        .filter(filter)
        .order_by(order_by, query.direction.unwrap_or_default())
        .paginate(pagination.page, pagination.per_page);

    let (total, items) = repo.list_stores(list_query)?;
    Ok(Paginated::new(items, pagination.page, total, pagination.per_page))
}

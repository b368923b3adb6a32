use diesel::prelude::*;

use crate::domain::brand::{
    Brand as DomainBrand, NewBrand as DomainNewBrand, UpdateBrand as DomainUpdateBrand,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::brands)]
pub struct Brand {
    pub brand_id: i32,
    pub brand_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::brands)]
pub struct NewBrand<'a> {
    pub brand_id: Option<i32>,
    pub brand_name: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::brands)]
pub struct UpdateBrand<'a> {
    pub brand_name: Option<&'a str>,
}

impl From<Brand> for DomainBrand {
    fn from(value: Brand) -> Self {
        Self {
            brand_id: value.brand_id,
            brand_name: value.brand_name,
        }
    }
}

impl<'a> From<&'a DomainNewBrand> for NewBrand<'a> {
    fn from(value: &'a DomainNewBrand) -> Self {
        Self {
            brand_id: value.brand_id,
            brand_name: value.brand_name.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateBrand> for UpdateBrand<'a> {
    fn from(value: &'a DomainUpdateBrand) -> Self {
        Self {
            brand_name: value.brand_name.as_deref(),
        }
    }
}

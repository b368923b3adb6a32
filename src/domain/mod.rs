pub mod brand;
pub mod category;
pub mod customer;
pub mod integrity;
pub mod order;
pub mod product;
pub mod stats;
pub mod staff;
pub mod stock;
pub mod store;

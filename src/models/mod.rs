pub mod brand;
pub mod category;
pub mod customer;
pub mod decimal;
pub mod order;
pub mod product;
pub mod staff;
pub mod stock;
pub mod store;

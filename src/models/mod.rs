mod activity;
mod product;
mod subject;

pub use activity::{BuyerOverlap, Order, ProductView, Purchase};
pub use product::{CategoryId, Product, ProductId, ProductOrder, ProductQuery};
pub use subject::{Subject, UserId};

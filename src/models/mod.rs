mod category;
mod product;

pub use category::Category;
pub use product::{parse_price, NewProduct, ProductForm, ProductView};

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{CatalogError, CatalogResult};

/// One row of the joined product listing: the product plus the name of the
/// category it points at, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
    pub category: Option<String>,
}

impl ProductView {
    pub fn category_or<'a>(&'a self, missing: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(missing)
    }
}

/// A validated product payload, ready to be written by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
    pub category: String,
}

impl NewProduct {
    #[cfg(test)]
    pub fn new(name: &str, quantity: i64, price: Decimal, category: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            price,
            category: category.to_string(),
        }
    }

    /// Parse raw form text. Every field is required; quantity must be a
    /// whole number and price a decimal, both non-negative.
    pub fn parse(name: &str, quantity: &str, price: &str, category: &str) -> CatalogResult<Self> {
        let (name, quantity, price, category) =
            (name.trim(), quantity.trim(), price.trim(), category.trim());
        if name.is_empty() || quantity.is_empty() || price.is_empty() || category.is_empty() {
            return Err(CatalogError::validation("Please fill in all fields."));
        }

        let quantity: i64 = quantity
            .parse()
            .map_err(|_| CatalogError::validation(format!("Invalid quantity: {quantity}")))?;
        let price = parse_price(price)?;

        let product = Self {
            name: name.to_string(),
            quantity,
            price,
            category: category.to_string(),
        };
        product.validate()?;
        Ok(product)
    }

    /// Value checks the store repeats before every write.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.name.trim().is_empty() || self.category.trim().is_empty() {
            return Err(CatalogError::validation("Please fill in all fields."));
        }
        if self.quantity < 0 {
            return Err(CatalogError::validation(format!(
                "Quantity must not be negative (got {})",
                self.quantity
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(CatalogError::validation(format!(
                "Price must not be negative (got {})",
                self.price
            )));
        }
        Ok(())
    }
}

/// Accepts plain decimals plus the usual `$` and thousands separators.
pub fn parse_price(s: &str) -> CatalogResult<Decimal> {
    let cleaned = s.replace(['$', ','], "");
    Decimal::from_str(cleaned.trim())
        .map_err(|_| CatalogError::validation(format!("Invalid price: {s}")))
}

/// The five text inputs of the product form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub id: String,
    pub name: String,
    pub quantity: String,
    pub price: String,
    pub category: String,
}

impl ProductForm {
    pub const FIELD_COUNT: usize = 5;

    pub fn labels() -> [&'static str; Self::FIELD_COUNT] {
        ["ID", "Name", "Quantity", "Price", "Category"]
    }

    pub fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.id,
            1 => &self.name,
            2 => &self.quantity,
            3 => &self.price,
            _ => &self.category,
        }
    }

    pub fn field_mut(&mut self, index: usize) -> &mut String {
        match index {
            0 => &mut self.id,
            1 => &mut self.name,
            2 => &mut self.quantity,
            3 => &mut self.price,
            _ => &mut self.category,
        }
    }

    pub fn to_new_product(&self) -> CatalogResult<NewProduct> {
        NewProduct::parse(&self.name, &self.quantity, &self.price, &self.category)
    }

    /// The product id typed into the form, required for updates.
    pub fn parse_id(&self) -> CatalogResult<i64> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(CatalogError::validation("Please fill in all fields."));
        }
        id.parse()
            .map_err(|_| CatalogError::validation(format!("Invalid product ID: {id}")))
    }

    pub fn from_view(view: &ProductView) -> Self {
        Self {
            id: view.id.to_string(),
            name: view.name.clone(),
            quantity: view.quantity.to_string(),
            price: view.price.to_string(),
            category: view.category.clone().unwrap_or_default(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

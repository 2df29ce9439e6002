//! Form - Product Form Input and Validation
//!
//! Raw text as typed by the user. Validation runs before any backend call;
//! a form with errors is never submitted.

use crate::domain::product::{Product, ProductDraft};

/// Form fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    Price,
    Stock,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Price => "price",
            Field::Stock => "stock",
        }
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(Field, &'static str)>,
}

impl FieldErrors {
    fn push(&mut self, field: Field, message: &'static str) {
        self.entries.push((field, message));
    }

    /// Message for a single field, if it failed
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| *message)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, message)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field.label(), message)?;
        }
        Ok(())
    }
}

/// Product form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
}

impl ProductForm {
    /// Empty form for a new product
    pub fn new() -> Self {
        Self::default()
    }

    /// Form prefilled from an existing product (edit mode)
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
        }
    }

    /// Set a field from raw input
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Description => self.description = value,
            Field::Price => self.price = value,
            Field::Stock => self.stock = value,
        }
    }

    /// Validate every field and build the request body
    pub fn validate(&self) -> Result<ProductDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.name.trim().is_empty() {
            errors.push(Field::Name, "Name is required");
        }
        if self.description.trim().is_empty() {
            errors.push(Field::Description, "Description is required");
        }

        let price = match self.price.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price > 0.0 => Some(price),
            _ => {
                errors.push(Field::Price, "Price must be greater than 0");
                None
            }
        };

        let stock_input = self.stock.trim();
        let stock = match stock_input.parse::<u32>() {
            Ok(stock) => Some(stock),
            // Anything numeric and non-negative that is not a u32 is fractional or huge
            Err(_) if stock_input.parse::<f64>().is_ok_and(|s| s >= 0.0) => {
                errors.push(Field::Stock, "Stock must be a whole number");
                None
            }
            Err(_) => {
                errors.push(Field::Stock, "Stock must be 0 or greater");
                None
            }
        };

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(ProductDraft {
                name: self.name.trim().to_string(),
                description: self.description.trim().to_string(),
                price,
                stock,
            }),
            _ => Err(errors),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use super::ProductId;

/// Catalog category. Parsed case-insensitively, stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Furniture,
    Accessories,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Furniture => "furniture",
            Category::Accessories => "accessories",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electronics" => Ok(Category::Electronics),
            "clothing" => Ok(Category::Clothing),
            "furniture" => Ok(Category::Furniture),
            "accessories" => Ok(Category::Accessories),
            "other" => Ok(Category::Other),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Represents a product in the inventory.
///
/// `stock` is unsigned: a decrement that would go below zero is rejected by
/// the product actor instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub image: String,
    pub description: String,
    pub category: Category,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    pub image: String,
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub stock: u32,
}

/// Payload for updating a product. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` removes the discount. In JSON, `null` clears and an
    /// absent key leaves it.
    #[serde(default, deserialize_with = "present")]
    pub discounted_price: Option<Option<f64>>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub stock: Option<u32>,
}

/// Marks a key that is present, even as `null`, as `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The product fields copied into an order item at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: f64,
    pub image: String,
}

/// Live product data shown next to an order item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub description: String,
    pub category: Category,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: f64, category: Category, stock: u32) -> Self {
        Self {
            name: name.into(),
            price,
            discounted_price: None,
            image: String::new(),
            description: String::new(),
            category,
            stock,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Product {
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            description: self.description.clone(),
            category: self.category,
        }
    }

    /// Case-insensitive substring match on name or description.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Electronics".parse::<Category>(), Ok(Category::Electronics));
        assert_eq!(" FURNITURE ".parse::<Category>(), Ok(Category::Furniture));
        assert!("toys".parse::<Category>().is_err());
        assert_eq!(serde_json::to_string(&Category::Accessories).unwrap(), "\"accessories\"");
    }

    #[test]
    fn product_create_deserializes_from_camel_case() {
        let body = r#"{"name":"Lamp","price":20.5,"discountedPrice":18.0,
            "image":"lamp.png","description":"Desk lamp","category":"furniture","stock":4}"#;
        let create: ProductCreate = serde_json::from_str(body).unwrap();
        assert_eq!(create.discounted_price, Some(18.0));
        assert_eq!(create.category, Category::Furniture);
        assert_eq!(create.stock, 4);
    }

    #[test]
    fn patch_tells_null_discount_from_missing_one() {
        let clear: ProductPatch = serde_json::from_str(r#"{"discountedPrice":null}"#).unwrap();
        assert_eq!(clear.discounted_price, Some(None));
        let set: ProductPatch = serde_json::from_str(r#"{"discountedPrice":9.5}"#).unwrap();
        assert_eq!(set.discounted_price, Some(Some(9.5)));
        let untouched: ProductPatch = serde_json::from_str(r#"{"stock":3}"#).unwrap();
        assert_eq!(untouched.discounted_price, None);
    }
}

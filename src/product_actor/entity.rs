use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductId, ProductPatch};
use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;

fn validate_price(label: &str, price: f64) -> Result<(), ProductError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ProductError::ValidationError(format!("{} must be a non-negative amount, got {}", label, price)))
    }
}

impl Entity for Product {
    type Id = ProductId;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Rejects a blank name and negative or non-finite prices.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(ProductError::ValidationError("Product name is required".to_string()));
        }
        validate_price("Price", params.price)?;
        if let Some(discounted) = params.discounted_price {
            validate_price("Discounted price", discounted)?;
        }
        let now = Utc::now();
        Ok(Self {
            id,
            name,
            price: params.price,
            discounted_price: params.discounted_price,
            image: params.image,
            description: params.description.trim().to_string(),
            category: params.category,
            stock: params.stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an admin edit. Every field is validated before any is written.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(ProductError::ValidationError("Product name is required".to_string()));
            }
        }
        if let Some(price) = patch.price {
            validate_price("Price", price)?;
        }
        if let Some(Some(discounted)) = patch.discounted_price {
            validate_price("Discounted price", discounted)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(discounted) = patch.discounted_price {
            self.discounted_price = discounted;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Handles stock actions.
    ///
    /// # Errors
    /// `ReserveStock` fails if more is requested than available, and both
    /// stock-changing actions reject a zero quantity.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(0) | ProductAction::RestoreStock(0) => {
                Err(ProductError::InvalidQuantity(0))
            }
            ProductAction::ReserveStock(amount) => {
                if self.stock < amount {
                    return Err(ProductError::InsufficientStock {
                        product: self.name.clone(),
                        requested: amount,
                        available: self.stock,
                    });
                }
                self.stock -= amount;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::ReserveStock {
                    snapshot: self.snapshot(),
                    remaining: self.stock,
                })
            }
            ProductAction::RestoreStock(amount) => {
                self.stock = self.stock.saturating_add(amount);
                self.updated_at = Utc::now();
                Ok(ProductActionResult::RestoreStock(self.stock))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn lamp(stock: u32) -> Product {
        Product::from_create_params(ProductId(1), ProductCreate::new("Lamp", 10.0, Category::Furniture, stock)).unwrap()
    }

    #[test]
    fn reserve_decrements_and_returns_snapshot() {
        let mut product = lamp(5);
        match product.handle_action(ProductAction::ReserveStock(2)).unwrap() {
            ProductActionResult::ReserveStock { snapshot, remaining } => {
                assert_eq!(snapshot.name, "Lamp");
                assert_eq!(snapshot.price, 10.0);
                assert_eq!(remaining, 3);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn reserve_beyond_stock_leaves_level_unchanged() {
        let mut product = lamp(1);
        let err = product.handle_action(ProductAction::ReserveStock(2)).unwrap_err();
        assert_eq!(
            err,
            ProductError::InsufficientStock { product: "Lamp".into(), requested: 2, available: 1 }
        );
        assert_eq!(product.stock, 1);
    }

    #[test]
    fn zero_quantities_are_rejected() {
        let mut product = lamp(1);
        assert_eq!(product.handle_action(ProductAction::ReserveStock(0)).unwrap_err(), ProductError::InvalidQuantity(0));
        assert_eq!(product.handle_action(ProductAction::RestoreStock(0)).unwrap_err(), ProductError::InvalidQuantity(0));
    }

    #[test]
    fn invalid_patch_changes_nothing() {
        let mut product = lamp(1);
        let patch = ProductPatch { name: Some("Desk lamp".into()), price: Some(-1.0), ..Default::default() };
        assert!(product.on_update(patch).is_err());
        assert_eq!(product.name, "Lamp");
    }

    #[test]
    fn discount_can_be_set_and_cleared() {
        let mut product = lamp(1);
        product.on_update(ProductPatch { discounted_price: Some(Some(8.0)), ..Default::default() }).unwrap();
        assert_eq!(product.discounted_price, Some(8.0));

        product.on_update(ProductPatch { stock: Some(4), ..Default::default() }).unwrap();
        assert_eq!(product.discounted_price, Some(8.0));

        product.on_update(ProductPatch { discounted_price: Some(None), ..Default::default() }).unwrap();
        assert_eq!(product.discounted_price, None);
    }

    #[test]
    fn create_rejects_blank_name() {
        let params = ProductCreate::new("   ", 1.0, Category::Other, 1);
        assert!(matches!(
            Product::from_create_params(ProductId(2), params),
            Err(ProductError::ValidationError(_))
        ));
    }
}

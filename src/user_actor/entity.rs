use crate::actor_framework::Entity;
use crate::domain::{ProductId, User, UserCreate, UserId, UserPatch};
use super::actions::UserAction;
use super::error::UserError;

fn validate_email(email: &str) -> Result<String, UserError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(UserError::ValidationError(format!("Invalid email: {}", email))),
    }
}

fn validate_fullname(fullname: &str) -> Result<String, UserError> {
    let fullname = fullname.trim();
    if (3..=50).contains(&fullname.chars().count()) {
        Ok(fullname.to_string())
    } else {
        Err(UserError::ValidationError("Fullname must be between 3 and 50 characters".to_string()))
    }
}

impl Entity for User {
    type Id = UserId;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = UserAction;
    type ActionResult = Vec<ProductId>;
    type Error = UserError;

    fn id(&self) -> &UserId {
        &self.id
    }

    /// Creates a new User, normalising the email to lowercase.
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, UserError> {
        Ok(Self {
            id,
            fullname: validate_fullname(&params.fullname)?,
            email: validate_email(&params.email)?,
            wishlist: Vec::new(),
        })
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), UserError> {
        let fullname = patch.fullname.as_deref().map(validate_fullname).transpose()?;
        let email = patch.email.as_deref().map(validate_email).transpose()?;
        if let Some(fullname) = fullname {
            self.fullname = fullname;
        }
        if let Some(email) = email {
            self.email = email;
        }
        Ok(())
    }

    /// Emails are compared after normalisation, so case variants clash.
    fn check_unique(&self, other: &Self) -> Result<(), UserError> {
        if self.email == other.email {
            return Err(UserError::AlreadyExists(self.email.clone()));
        }
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> Result<Vec<ProductId>, UserError> {
        match action {
            UserAction::AddToWishlist(product_id) => {
                if self.wishlist.contains(&product_id) {
                    return Err(UserError::AlreadyInWishlist(product_id.to_string()));
                }
                self.wishlist.push(product_id);
            }
            UserAction::RemoveFromWishlist(product_id) => {
                self.wishlist.retain(|listed| *listed != product_id);
            }
        }
        Ok(self.wishlist.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalised_and_checked() {
        let user = User::from_create_params(UserId(1), UserCreate::new("Alice", " Alice@Example.com ")).unwrap();
        assert_eq!(user.email, "alice@example.com");

        let err = User::from_create_params(UserId(2), UserCreate::new("Bob", "bob-at-example")).unwrap_err();
        assert!(matches!(err, UserError::ValidationError(_)));
    }

    #[test]
    fn short_names_are_rejected() {
        assert!(User::from_create_params(UserId(1), UserCreate::new("Al", "al@example.com")).is_err());
    }

    #[test]
    fn emails_clash_regardless_of_case() {
        let ada = User::from_create_params(UserId(1), UserCreate::new("Ada Lovelace", "ada@example.com")).unwrap();
        let shouty = User::from_create_params(UserId(2), UserCreate::new("Ada Again", "ADA@Example.com")).unwrap();
        assert_eq!(shouty.check_unique(&ada), Err(UserError::AlreadyExists("ada@example.com".into())));

        let bob = User::from_create_params(UserId(3), UserCreate::new("Bob Babbage", "bob@example.com")).unwrap();
        assert!(bob.check_unique(&ada).is_ok());
    }

    #[test]
    fn wishlist_rejects_duplicates_and_ignores_absent_removals() {
        let mut user = User::from_create_params(UserId(1), UserCreate::new("Ada Lovelace", "ada@example.com")).unwrap();
        assert_eq!(user.handle_action(UserAction::AddToWishlist(ProductId(4))), Ok(vec![ProductId(4)]));
        assert_eq!(
            user.handle_action(UserAction::AddToWishlist(ProductId(4))).unwrap_err().to_string(),
            "Product already in wishlist: product_4"
        );
        assert_eq!(user.handle_action(UserAction::RemoveFromWishlist(ProductId(9))), Ok(vec![ProductId(4)]));
        assert_eq!(user.handle_action(UserAction::RemoveFromWishlist(ProductId(4))), Ok(vec![]));
    }
}

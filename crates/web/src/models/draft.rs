//! Edit-draft state for the product form.
//!
//! The controller holds one draft at a time: either nothing (the blank create
//! form) or an in-progress edit. Field values are kept exactly as entered so
//! a failed submit can restore them verbatim.

use rust_decimal::Decimal;
use thiserror::Error;

use shopkeep_core::{NewProduct, Product, ProductId};

/// The single state variable of the CRUD controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Draft {
    /// Nothing open beyond the blank create form.
    #[default]
    Empty,
    /// A form mid-edit.
    Editing(ProductDraft),
}

impl Draft {
    /// Seed a draft from an existing row (the Edit transition).
    #[must_use]
    pub fn edit(product: &Product) -> Self {
        Self::Editing(ProductDraft::from_row(product))
    }

    /// Whether a draft is open. Cancel is the transition back to `Empty`; it
    /// has no side effect.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

/// A partial product held while the form is open.
///
/// An `id` means the draft was seeded from an existing row and submits as an
/// update; no `id` means it submits as a create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: String,
    pub description: Option<String>,
}

/// The dispatch decision for a submitted draft.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// No `id`: insert a new row.
    Create(NewProduct),
    /// `id` present: update that row.
    Update(ProductId, NewProduct),
}

/// Why a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Name is required")]
    MissingName,
    #[error("Price must be a number")]
    InvalidPrice,
}

impl ProductDraft {
    /// Seed a draft from a persisted row.
    #[must_use]
    pub fn from_row(product: &Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
        }
    }

    /// Validate the draft and decide the dispatch: create without an `id`,
    /// update with one.
    ///
    /// # Errors
    ///
    /// Returns `DraftError` when the name is blank or the price does not
    /// parse. The draft itself is untouched, so the form can restore it.
    pub fn submit(&self) -> Result<Submission, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingName);
        }

        let price: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| DraftError::InvalidPrice)?;

        let fields = NewProduct {
            name: name.to_string(),
            price,
            description: self
                .description
                .clone()
                .filter(|d| !d.trim().is_empty()),
        };

        Ok(match self.id {
            Some(id) => Submission::Update(id, fields),
            None => Submission::Create(fields),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(id: i64, name: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: price.parse().expect("decimal literal"),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_draft_without_id_submits_as_create() {
        let draft = ProductDraft {
            name: "Widget".to_owned(),
            price: "9.99".to_owned(),
            ..ProductDraft::default()
        };

        let Submission::Create(fields) = draft.submit().expect("valid draft") else {
            panic!("expected create dispatch");
        };
        assert_eq!(fields.name, "Widget");
        assert_eq!(fields.price, "9.99".parse().expect("decimal literal"));
    }

    #[test]
    fn test_draft_with_id_submits_as_update() {
        let mut draft = ProductDraft::from_row(&row(3, "Old", "5"));
        draft.name = "New".to_owned();
        draft.price = "7".to_owned();

        let Submission::Update(id, fields) = draft.submit().expect("valid draft") else {
            panic!("expected update dispatch");
        };
        assert_eq!(id, ProductId::new(3));
        assert_eq!(fields.name, "New");
        assert_eq!(fields.price, "7".parse().expect("decimal literal"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let draft = ProductDraft {
            name: "   ".to_owned(),
            price: "1".to_owned(),
            ..ProductDraft::default()
        };

        assert_eq!(draft.submit(), Err(DraftError::MissingName));
    }

    #[test]
    fn test_unparsable_price_is_rejected() {
        let draft = ProductDraft {
            name: "Widget".to_owned(),
            price: "cheap".to_owned(),
            ..ProductDraft::default()
        };

        assert_eq!(draft.submit(), Err(DraftError::InvalidPrice));
    }

    #[test]
    fn test_name_and_price_are_trimmed() {
        let draft = ProductDraft {
            name: "  Widget  ".to_owned(),
            price: " 9.99 ".to_owned(),
            ..ProductDraft::default()
        };

        let Submission::Create(fields) = draft.submit().expect("valid draft") else {
            panic!("expected create dispatch");
        };
        assert_eq!(fields.name, "Widget");
    }

    #[test]
    fn test_empty_description_becomes_none() {
        let draft = ProductDraft {
            name: "Widget".to_owned(),
            price: "1".to_owned(),
            description: Some("  ".to_owned()),
            ..ProductDraft::default()
        };

        let Submission::Create(fields) = draft.submit().expect("valid draft") else {
            panic!("expected create dispatch");
        };
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_edit_transition_seeds_from_row() {
        let draft = Draft::edit(&row(3, "Old", "5"));

        assert!(draft.is_editing());
        let Draft::Editing(inner) = draft else {
            panic!("expected editing state");
        };
        assert_eq!(inner.id, Some(ProductId::new(3)));
        assert_eq!(inner.name, "Old");
        assert_eq!(inner.price, "5");
    }

    #[test]
    fn test_default_draft_is_empty() {
        assert_eq!(Draft::default(), Draft::Empty);
        assert!(!Draft::Empty.is_editing());
    }
}

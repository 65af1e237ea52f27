//! Reference resolution at the data-access boundary.
//!
//! Raw documents come out of the store with reference fields either
//! populated or left as bare ids. This module reduces them to the resolved
//! types once, so nothing downstream has to care which shape it received.
//!
//! Policy:
//! - a product without `_id` aborts the load ([`CatalogError::MissingField`])
//! - an order line without a product is dropped
//! - a review author that is not in the users collection becomes `None`
//! - a review without a rating is dropped; a rating that is not a whole
//!   number is kept as [`UNUSABLE_RATING`] so consumers can count it as skipped

use crate::error::{CatalogError, Result};
use crate::types::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Turn raw user documents into a lookup keyed by id.
pub fn resolve_users(raw: Vec<UserDoc>) -> Result<HashMap<UserId, User>> {
    let mut users = HashMap::with_capacity(raw.len());
    for doc in raw {
        let id: UserId = doc.id.into();
        if users.contains_key(&id) {
            return Err(CatalogError::DuplicateId {
                entity: "User".to_string(),
                id,
            });
        }
        users.insert(
            id.clone(),
            User {
                id,
                name: doc.name,
                email: doc.email,
            },
        );
    }
    Ok(users)
}

/// Turn raw category documents into resolved categories.
pub fn resolve_categories(raw: Vec<CategoryDoc>) -> Vec<Category> {
    raw.into_iter()
        .map(|doc| Category {
            id: doc.id.into(),
            name: doc.name,
            slug: doc.slug,
        })
        .collect()
}

/// Resolves product and order references against a known set of users.
pub struct Resolver {
    known_users: HashSet<UserId>,
}

impl Resolver {
    pub fn new<'a>(users: impl IntoIterator<Item = &'a UserId>) -> Self {
        Self {
            known_users: users.into_iter().cloned().collect(),
        }
    }

    /// Resolve one product. `position` is only used for error context.
    pub fn resolve_product(&self, raw: RawProduct, position: usize) -> Result<Product> {
        let id: ProductId = raw
            .id
            .ok_or_else(|| CatalogError::MissingField {
                entity: "Product".to_string(),
                field: "_id".to_string(),
                position,
            })?
            .into();

        let reviews = raw
            .reviews
            .unwrap_or_default()
            .into_iter()
            .filter_map(|review| self.resolve_review(review, &id))
            .collect();

        Ok(Product {
            id,
            name: raw.name,
            slug: raw.slug,
            category: raw.category.map(|category| category.into_id(|doc| doc.id)),
            tags: raw.tags.unwrap_or_default(),
            price: raw.price,
            rating: raw.rating,
            num_reviews: raw.num_reviews,
            reviews,
        })
    }

    /// Resolve a whole product collection, stopping at the first product
    /// without an id.
    pub fn resolve_products(&self, raw: Vec<RawProduct>) -> Result<Vec<Product>> {
        raw.into_iter()
            .enumerate()
            .map(|(position, product)| self.resolve_product(product, position))
            .collect()
    }

    fn resolve_review(&self, raw: RawReview, product_id: &str) -> Option<Review> {
        let Some(stored) = raw.rating else {
            warn!("Dropping review on product {} without a rating", product_id);
            return None;
        };
        let rating = match stored {
            RawRating::Whole(value) => i32::try_from(value).unwrap_or(UNUSABLE_RATING),
            RawRating::Fractional(_) | RawRating::Unreadable => {
                warn!(
                    "Review on product {} has rating {:?} that is not a whole number",
                    product_id, stored
                );
                UNUSABLE_RATING
            }
        };

        let user = raw.user.and_then(|user| self.resolve_user_ref(user));
        if user.is_none() {
            debug!("Review on product {} has no resolvable author", product_id);
        }
        Some(Review {
            user,
            rating,
            comment: raw.comment,
            date: raw.date.map(|ts| ts.0),
            approved: raw.approved,
        })
    }

    fn resolve_user_ref(&self, user: DocRef<UserDoc>) -> Option<UserId> {
        match user {
            DocRef::Populated(doc) => Some(doc.id.into()),
            DocRef::ReferenceOnly(id) => {
                let id: UserId = id.into();
                self.known_users.contains(&id).then_some(id)
            }
        }
    }

    /// Resolve one order, dropping lines that reference no product.
    pub fn resolve_order(&self, raw: RawOrder) -> Order {
        let id: Option<OrderId> = raw.id.map(Into::into);
        let total_lines = raw.items.len();
        let items: Vec<OrderItem> = raw
            .items
            .into_iter()
            .filter_map(|item| {
                let product = item.product?.into_id(|stub| stub.id);
                Some(OrderItem {
                    product,
                    quantity: item.quantity,
                    unit_price: item.price,
                })
            })
            .collect();

        if items.len() < total_lines {
            warn!(
                "Order {} has {} line(s) without a product; skipped",
                id.as_deref().unwrap_or("<no id>"),
                total_lines - items.len()
            );
        }

        Order {
            id,
            user: raw.user.and_then(|user| self.resolve_user_ref(user)),
            items,
            created_at: raw.created_at.map(|ts| ts.0),
        }
    }
}

//! Document shapes for the storefront snapshot.
//!
//! Two layers live here:
//! - **Raw documents** mirror what the document store hands back. Reference
//!   fields may be populated with the referenced document or hold a bare id,
//!   so they are modelled as [`DocRef`].
//! - **Resolved types** ([`Product`], [`Review`], [`Order`], ...) are what the
//!   recommender and analytics crates consume. Every reference has been
//!   reduced to an id (or `None`) by [`crate::resolve`].
//!
//! [`Catalog`] is the in-memory index over resolved documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a product document
pub type ProductId = String;

/// Identifier of a user (reviewer or buyer)
pub type UserId = String;

/// Identifier of a category document
pub type CategoryId = String;

/// Identifier of an order document
pub type OrderId = String;

// =============================================================================
// Wire-level scalars
// =============================================================================

/// A document id as exported by the store.
///
/// Accepts both a plain string and the extended-JSON form `{"$oid": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectIdRepr {
    Plain(String),
    Extended {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ObjectIdRepr::deserialize(deserializer)? {
            ObjectIdRepr::Plain(id) => ObjectId(id),
            ObjectIdRepr::Extended { oid } => ObjectId(oid),
        })
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// A point in time as exported by the store.
///
/// Accepts an RFC 3339 string, `{"$date": "..."}`, or epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(pub DateTime<Utc>);

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampRepr {
    Rfc3339(DateTime<Utc>),
    Extended {
        #[serde(rename = "$date")]
        date: DateTime<Utc>,
    },
    EpochMillis(i64),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match TimestampRepr::deserialize(deserializer)? {
            TimestampRepr::Rfc3339(date) | TimestampRepr::Extended { date } => Ok(Timestamp(date)),
            TimestampRepr::EpochMillis(ms) => DateTime::from_timestamp_millis(ms)
                .map(Timestamp)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {ms}"))),
        }
    }
}

/// A review rating as exported by the store.
///
/// Only whole numbers can land in a star bucket. Fractional values and
/// anything non-numeric are kept apart so the resolver can mark them as
/// unusable instead of failing the whole product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawRating {
    Whole(i64),
    Fractional(f64),
    Unreadable,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRatingRepr {
    Whole(i64),
    Fractional(f64),
    Unreadable(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for RawRating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawRatingRepr::deserialize(deserializer)? {
            RawRatingRepr::Whole(value) => RawRating::Whole(value),
            RawRatingRepr::Fractional(value) => RawRating::Fractional(value),
            RawRatingRepr::Unreadable(_) => RawRating::Unreadable,
        })
    }
}

// =============================================================================
// Raw documents
// =============================================================================

/// A reference field that the store may or may not have populated.
///
/// `Populated` is tried first, so the embedded document types all require an
/// `_id` field; anything else falls through to `ReferenceOnly`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DocRef<T> {
    Populated(T),
    ReferenceOnly(ObjectId),
}

impl<T> DocRef<T> {
    /// Reduce the reference to an id using `id_of` for populated documents.
    pub fn into_id(self, id_of: impl FnOnce(T) -> ObjectId) -> String {
        match self {
            DocRef::Populated(doc) => id_of(doc).into(),
            DocRef::ReferenceOnly(id) => id.into(),
        }
    }
}

/// A user document from the `users` collection
#[derive(Debug, Clone, Deserialize)]
pub struct UserDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A category document from the `categories` collection
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Just enough of a product to identify it when populated inside an order line
#[derive(Debug, Clone, Deserialize)]
pub struct ProductStub {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
}

/// A review embedded in a product document
#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub user: Option<DocRef<UserDoc>>,
    #[serde(default)]
    pub rating: Option<RawRating>,
    #[serde(default)]
    pub comment: String,
    #[serde(default, alias = "createdAt")]
    pub date: Option<Timestamp>,
    #[serde(default)]
    pub approved: bool,
}

/// A product document as stored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    /// Optional at parse time so that a missing id is reported with context
    /// by the resolver instead of as an opaque decode failure.
    #[serde(rename = "_id", default)]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: Option<DocRef<CategoryDoc>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub reviews: Option<Vec<RawReview>>,
}

/// One line of an order as stored
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderItem {
    #[serde(default)]
    pub product: Option<DocRef<ProductStub>>,
    #[serde(default = "default_quantity", alias = "qty")]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

fn default_quantity() -> u32 {
    1
}

/// An order document as stored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    #[serde(rename = "_id", default)]
    pub id: Option<ObjectId>,
    /// Absent for guest checkouts
    #[serde(default)]
    pub user: Option<DocRef<UserDoc>>,
    #[serde(default, alias = "orderItems")]
    pub items: Vec<RawOrderItem>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

// =============================================================================
// Resolved types
// =============================================================================

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
}

/// A product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// Rating given to a review whose stored value is not a whole number.
/// It sits outside every valid star range.
pub const UNUSABLE_RATING: i32 = 0;

/// A product review with its author reduced to an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// `None` when the review has no author or the author could not be resolved
    pub user: Option<UserId>,
    /// As submitted; range checking is the consumer's concern.
    /// [`UNUSABLE_RATING`] stands in for a stored value that was not a whole number.
    pub rating: i32,
    pub comment: String,
    pub date: Option<DateTime<Utc>>,
    pub approved: bool,
}

/// A product with its category and reviews resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: Option<CategoryId>,
    pub tags: Vec<String>,
    pub price: f64,
    /// Aggregate rating maintained by the store
    pub rating: f64,
    pub num_reviews: u32,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// A product with no category, tags or reviews. Mostly useful in tests.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: name.to_lowercase().replace(' ', "-"),
            name,
            category: None,
            tags: Vec::new(),
            price: 0.0,
            rating: 0.0,
            num_reviews: 0,
            reviews: Vec::new(),
        }
    }
}

/// One resolved order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ProductId,
    pub quantity: u32,
    pub unit_price: f64,
}

/// An order whose lines all carry a product id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Option<OrderId>,
    pub user: Option<UserId>,
    pub items: Vec<OrderItem>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Build an order from bare product ids (quantity 1, no price).
    pub fn from_products<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProductId>,
    {
        Self {
            id: None,
            user: None,
            items: products
                .into_iter()
                .map(|product| OrderItem {
                    product: product.into(),
                    quantity: 1,
                    unit_price: 0.0,
                })
                .collect(),
            created_at: None,
        }
    }

    /// Whether any line of this order references `product_id`
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.product == product_id)
    }
}

// =============================================================================
// Catalog - The In-Memory Snapshot
// =============================================================================

/// Resolved snapshot of the store plus the secondary indices the
/// recommenders query.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) products: HashMap<ProductId, Product>,
    pub(crate) orders: Vec<Order>,
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) categories: HashMap<CategoryId, Category>,

    /// Products grouped by category, ids sorted ascending
    pub(crate) category_index: HashMap<CategoryId, Vec<ProductId>>,
    /// Positions in `orders` of every order containing a product
    pub(crate) order_index: HashMap<ProductId, Vec<usize>>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fully indexed catalog from already-resolved documents.
    pub fn from_documents(
        products: impl IntoIterator<Item = Product>,
        orders: impl IntoIterator<Item = Order>,
        users: impl IntoIterator<Item = User>,
    ) -> Self {
        let mut catalog = Self::new();
        for user in users {
            catalog.insert_user(user);
        }
        for product in products {
            catalog.insert_product(product);
        }
        for order in orders {
            catalog.insert_order(order);
        }
        catalog.build_secondary_indices();
        catalog
    }

    pub fn get_product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn get_category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    /// All orders, in load order
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Ids of every product in a category, ascending.
    ///
    /// Empty until [`Catalog::build_secondary_indices`] has run.
    pub fn get_products_by_category(&self, category: &str) -> &[ProductId] {
        self.category_index
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every order containing `product_id`
    pub fn get_orders_containing(&self, product_id: &str) -> impl Iterator<Item = &Order> {
        self.order_index
            .get(product_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&position| &self.orders[position])
    }

    /// Product ids in ascending order
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.products.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_category(&mut self, category: Category) {
        self.categories.insert(category.id.clone(), category);
    }

    /// Insert an order and index it under each distinct product it contains
    pub fn insert_order(&mut self, order: Order) {
        let position = self.orders.len();
        let mut seen: Vec<&str> = Vec::with_capacity(order.items.len());
        for item in &order.items {
            if seen.contains(&item.product.as_str()) {
                continue;
            }
            seen.push(&item.product);
            self.order_index
                .entry(item.product.clone())
                .or_default()
                .push(position);
        }
        self.orders.push(order);
    }

    /// Returns (products, orders, users)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.products.len(), self.orders.len(), self.users.len())
    }
}

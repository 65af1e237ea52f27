//! A [`DocumentStore`] backed by a snapshot directory on disk.

use crate::error::Result;
use anyhow::Context;
use catalog::{Catalog, DocumentStore, Order, Product, StoreCounts, User};
use std::path::{Path, PathBuf};
use tracing::info;

/// Catalog loaded from a directory of JSON-Lines exports
#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    catalog: Catalog,
}

impl SnapshotStore {
    /// Load the snapshot in `dir` on the blocking thread pool.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let load_dir = dir.clone();

        let loaded = tokio::task::spawn_blocking(move || Catalog::load_from_dir(&load_dir))
            .await
            .context("Snapshot loading task panicked")?;
        let catalog = loaded?;

        let (products, orders, users) = catalog.counts();
        info!(
            "Opened snapshot {:?}: {} products, {} orders, {} users",
            dir, products, orders, users
        );
        Ok(Self { dir, catalog })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl DocumentStore for SnapshotStore {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn find_product(&self, id: &str) -> Option<&Product> {
        self.catalog.find_product(id)
    }

    fn find_user(&self, id: &str) -> Option<&User> {
        self.catalog.find_user(id)
    }

    fn find_orders_containing(&self, product_id: &str) -> Vec<&Order> {
        self.catalog.find_orders_containing(product_id)
    }

    fn find_products_by_category(&self, category: &str) -> Vec<&Product> {
        self.catalog.find_products_by_category(category)
    }

    fn find_reviewed_products(&self) -> Vec<&Product> {
        self.catalog.find_reviewed_products()
    }

    fn counts(&self) -> StoreCounts {
        DocumentStore::counts(&self.catalog)
    }
}

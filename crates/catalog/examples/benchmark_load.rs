use catalog::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/snapshot");

    println!("Loading storefront snapshot...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_dir(data_dir)
        .expect("Failed to load snapshot");
    let elapsed = start.elapsed();

    let (products, orders, users) = catalog.counts();
    let reviews: usize = catalog
        .product_ids()
        .iter()
        .filter_map(|id| catalog.get_product(id))
        .map(|p| p.reviews.len())
        .sum();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Products: {}", products);
    println!("Orders: {}", orders);
    println!("Users: {}", users);
    println!("Reviews: {}", reviews);
    println!("\nPerformance: {:.0} documents/second",
             (products + orders + users) as f64 / elapsed.as_secs_f64());
}

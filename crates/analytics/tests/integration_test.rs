//! Integration tests for the analytics pass.
//!
//! These run a full report over a small catalog and check the numbers a
//! dashboard would show.

use analytics::{AnalyticsConfig, ReviewAnalytics, ReviewScope};
use catalog::{Catalog, DocumentStore, Product, Review, User};

fn review(user: Option<&str>, rating: i32) -> Review {
    Review {
        user: user.map(str::to_string),
        rating,
        comment: String::new(),
        date: None,
        approved: true,
    }
}

fn product(id: &str, category: Option<&str>, tags: &[&str], reviews: Vec<Review>) -> Product {
    let mut p = Product::new(id, format!("Product {}", id));
    p.category = category.map(str::to_string);
    p.tags = tags.iter().map(|t| t.to_string()).collect();
    p.price = 25.0;
    p.reviews = reviews;
    p
}

fn create_test_catalog() -> Catalog {
    let users = ["u1", "u2", "u3"].map(|id| User {
        id: id.to_string(),
        name: format!("User {}", id),
        email: None,
    });

    let products = vec![
        // u1 and u2 both love desks and lamps
        product(
            "desk-oak",
            Some("desks"),
            &["oak", "office"],
            vec![review(Some("u1"), 5), review(Some("u2"), 5), review(Some("u3"), 1)],
        ),
        product(
            "lamp-brass",
            Some("lamps"),
            &["brass"],
            vec![review(Some("u1"), 4), review(Some("u2"), 5)],
        ),
        product(
            "desk-pine",
            Some("desks"),
            &["office"],
            vec![review(Some("u3"), 4), review(None, 5)],
        ),
        product("chair-mesh", Some("chairs"), &["office"], vec![review(Some("u1"), 2)]),
        // never reviewed
        product("rug-wool", None, &[], vec![]),
    ];

    Catalog::from_documents(products, vec![], users)
}

#[test]
fn test_product_average_and_histogram() {
    let products = vec![product(
        "p1",
        Some("c1"),
        &[],
        vec![review(None, 5), review(None, 5), review(None, 1)],
    )];

    let report = ReviewAnalytics::default().compute(&products).unwrap();

    assert_eq!(report.global_stats.rating_distribution, [1, 0, 0, 0, 2]);
    assert_eq!(report.product_popularity[0].average_rating.to_string(), "3.7");
    assert_eq!(report.category_analytics["c1"].average_rating.to_string(), "3.7");
}

#[test]
fn test_preferred_categories_count_before_average() {
    let products = vec![
        product("p1", Some("A"), &[], vec![review(Some("u1"), 5)]),
        product("p2", Some("A"), &[], vec![review(Some("u1"), 4)]),
        product("p3", Some("B"), &[], vec![review(Some("u1"), 5)]),
    ];

    let report = ReviewAnalytics::default().compute(&products).unwrap();
    let prefs = &report.user("u1").unwrap().preferred_categories;

    assert_eq!(prefs.len(), 2);
    assert_eq!((prefs[0].key.as_str(), prefs[0].count), ("A", 2));
    assert_eq!(prefs[0].average_rating.to_string(), "4.5");
    assert_eq!((prefs[1].key.as_str(), prefs[1].count), ("B", 1));
    assert_eq!(prefs[1].average_rating.to_string(), "5.0");
}

#[test]
fn test_shared_category_pair_counted_once_per_user() {
    // u1 lists (A, B), u2 lists (B, A) by preference order
    let products = vec![
        product("p1", Some("A"), &[], vec![review(Some("u1"), 5), review(Some("u2"), 4)]),
        product("p2", Some("A"), &[], vec![review(Some("u1"), 5)]),
        product("p3", Some("B"), &[], vec![review(Some("u1"), 4), review(Some("u2"), 5)]),
        product("p4", Some("B"), &[], vec![review(Some("u2"), 5)]),
    ];

    let report = ReviewAnalytics::default().compute(&products).unwrap();

    assert_eq!(report.user("u1").unwrap().preferred_categories[0].key, "A");
    assert_eq!(report.user("u2").unwrap().preferred_categories[0].key, "B");
    assert_eq!(report.popular_category_pairs.len(), 1);
    let pair = &report.popular_category_pairs[0];
    assert_eq!(pair.categories, ["A".to_string(), "B".to_string()]);
    assert_eq!(pair.count, 2);
}

#[test]
fn test_pair_needs_two_users() {
    let products = vec![
        product("p1", Some("A"), &[], vec![review(Some("u1"), 5)]),
        product("p2", Some("B"), &[], vec![review(Some("u1"), 5)]),
    ];
    let report = ReviewAnalytics::default().compute(&products).unwrap();
    assert!(report.popular_category_pairs.is_empty());
}

#[test]
fn test_full_report_over_catalog() {
    let catalog = create_test_catalog();
    let products = catalog.find_reviewed_products();
    assert_eq!(products.len(), 4);

    let report = ReviewAnalytics::default().compute(&products).unwrap();

    let stats = &report.global_stats;
    assert_eq!(stats.total_reviews, 8);
    assert_eq!(stats.rating_distribution, [1, 1, 0, 2, 4]);
    assert_eq!(stats.rating_distribution.iter().sum::<u32>(), stats.total_reviews);
    // 31 / 8
    assert_eq!(stats.average_rating.to_string(), "3.9");

    // anonymous review counts globally but creates no user
    let user_ids: Vec<&str> = report.user_analytics.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(user_ids, vec!["u1", "u2", "u3"]);

    assert_eq!(report.tag_analytics["office"].count, 6);
    let categories: Vec<&str> = report.category_analytics.keys().map(String::as_str).collect();
    assert_eq!(categories, vec!["chairs", "desks", "lamps"]);

    // u3 has reviewed both desks; nothing else matches their preferences
    let u3 = report.user("u3").unwrap();
    assert_eq!(u3.low_ratings, 1);
    assert_eq!(u3.high_ratings, 1);
    assert!(u3.recommended_products.is_empty());

    // u1 has not reviewed desk-pine (desks, office, avg 4.5)
    let u1 = report.user("u1").unwrap();
    assert_eq!(u1.recommended_products.len(), 1);
    assert_eq!(u1.recommended_products[0].product_id, "desk-pine");

    // desks + lamps shared by u1 and u2
    assert_eq!(report.popular_category_pairs.len(), 1);
    assert_eq!(report.popular_category_pairs[0].count, 2);

    // desk-pine and lamp-brass tie on average and count
    assert_eq!(report.product_popularity[0].product_id, "desk-pine");
    assert_eq!(report.product_popularity[1].product_id, "lamp-brass");
    assert_eq!(report.product_popularity.len(), 4);
}

#[test]
fn test_report_is_idempotent() {
    let catalog = create_test_catalog();
    let products = catalog.find_reviewed_products();
    let analytics = ReviewAnalytics::default();

    let first = serde_json::to_string(&analytics.compute(&products).unwrap()).unwrap();
    let second = serde_json::to_string(&analytics.compute(&products).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(catalog.find_reviewed_products(), products);
}

#[test]
fn test_approved_only_scope() {
    let mut pending = review(Some("u1"), 1);
    pending.approved = false;
    let products = vec![product("p1", Some("A"), &[], vec![review(Some("u1"), 5), pending])];

    let all = ReviewAnalytics::default().compute(&products).unwrap();
    let approved = ReviewAnalytics::new(
        AnalyticsConfig::default().with_review_scope(ReviewScope::ApprovedOnly),
    )
    .compute(&products)
    .unwrap();

    assert_eq!(all.global_stats.total_reviews, 2);
    assert_eq!(approved.global_stats.total_reviews, 1);
    assert_eq!(approved.global_stats.average_rating.to_string(), "5.0");
}

#[test]
fn test_out_of_range_ratings_are_skipped() {
    let products = vec![product(
        "p1",
        Some("A"),
        &["t"],
        vec![review(Some("u1"), 0), review(Some("u1"), 6), review(Some("u1"), 3)],
    )];

    let report = ReviewAnalytics::default().compute(&products).unwrap();
    assert_eq!(report.global_stats.total_reviews, 1);
    assert_eq!(report.global_stats.skipped_reviews, 2);
    assert_eq!(report.global_stats.rating_distribution, [0, 0, 1, 0, 0]);
    assert_eq!(report.user("u1").unwrap().total_reviews, 1);
}

#[test]
fn test_malformed_stored_ratings_are_skipped_not_fatal() {
    let raw: Vec<catalog::RawProduct> = serde_json::from_str(
        r#"[
            {"_id": "p1", "category": "A", "reviews": [
                {"user": "u1", "rating": 4},
                {"user": "u1", "rating": 4.5},
                {"user": "u1"}
            ]},
            {"_id": "p2", "category": "B", "reviews": [{"user": "u1", "rating": 2.5}]}
        ]"#,
    )
    .unwrap();
    let users = vec!["u1".to_string()];
    let products = catalog::resolve::Resolver::new(&users)
        .resolve_products(raw)
        .unwrap();

    let report = ReviewAnalytics::default().compute(&products).unwrap();
    assert_eq!(report.global_stats.total_reviews, 1);
    assert_eq!(report.global_stats.skipped_reviews, 2);
    let ids: Vec<&str> = report
        .product_popularity
        .iter()
        .map(|p| p.product_id.as_str())
        .collect();
    assert_eq!(ids, vec!["p1"]);
}

#[test]
fn test_empty_input() {
    let products: Vec<Product> = Vec::new();
    let report = ReviewAnalytics::default().compute(&products).unwrap();

    assert_eq!(report.global_stats.total_reviews, 0);
    assert_eq!(report.global_stats.average_rating.to_string(), "0.0");
    assert!(report.user_analytics.is_empty());
    assert!(report.product_popularity.is_empty());
}

#[test]
fn test_report_json_shape() {
    let catalog = create_test_catalog();
    let report = ReviewAnalytics::default()
        .compute(&catalog.find_reviewed_products())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["globalStats"]["totalReviews"], 8);
    assert_eq!(json["globalStats"]["averageRating"], "3.9");
    assert_eq!(json["categoryAnalytics"]["lamps"]["averageRating"], "4.5");
    assert_eq!(json["userAnalytics"][0]["userId"], "u1");
    assert!(json["userAnalytics"][0]["reviewedProducts"].is_array());
    assert!(json["popularCategoryPairs"][0]["categories"].is_array());
}

use analytics::{AnalyticsConfig, AnalyticsReport, ReviewScope, UserAnalytics};
use anyhow::{Context, Result, anyhow};
use catalog::DocumentStore;
use clap::{Parser, Subcommand};
use colored::Colorize;
use recommender::BoughtTogether;
use server::{BoughtTogetherResponse, ServiceConfig, SnapshotStore, StorefrontService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// storefront-recs - Co-purchase recommendations and review analytics
#[derive(Parser)]
#[command(name = "storefront-recs")]
#[command(about = "Storefront recommendation and review-analytics engine", long_about = None)]
struct Cli {
    /// Path to the snapshot directory (products.jsonl, orders.jsonl, ...)
    #[arg(short, long, env = "STOREFRONT_DATA_DIR", default_value = "data/snapshot")]
    data_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Products frequently bought together with a product
    BoughtTogether {
        /// Seed product ID
        #[arg(long)]
        product_id: String,

        /// Number of products to return
        #[arg(long, default_value = "3")]
        limit: usize,

        /// Show how many orders each product shared with the seed
        #[arg(long)]
        explain: bool,
    },

    /// Review analytics over the whole catalog
    Analytics {
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Only count reviews an administrator has approved
        #[arg(long)]
        approved_only: bool,
    },

    /// Show one reviewer's analytics and recommendations
    User {
        /// User ID to display
        #[arg(long)]
        user_id: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading storefront snapshot from {}...", cli.data_dir.display());
    let start = Instant::now();
    let store = Arc::new(
        SnapshotStore::open(&cli.data_dir)
            .await
            .context("Failed to load storefront snapshot")?,
    );
    println!("{} Loaded snapshot in {:?}", "✓".green(), start.elapsed());

    let mut config =
        ServiceConfig::default().with_request_timeout(Duration::from_secs(cli.timeout_secs));
    if let Commands::Analytics {
        approved_only: true,
        ..
    } = cli.command
    {
        config = config.with_analytics(
            AnalyticsConfig::default().with_review_scope(ReviewScope::ApprovedOnly),
        );
    }
    let service = StorefrontService::new(store, config);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::BoughtTogether {
            product_id,
            limit,
            explain,
        } => handle_bought_together(&service, &product_id, limit, explain).await?,
        Commands::Analytics { json, .. } => handle_analytics(&service, json).await?,
        Commands::User { user_id } => handle_user(&service, &user_id).await?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&service, requests, concurrent).await?,
    }

    service.shutdown();
    Ok(())
}

/// Handle the 'bought-together' command
async fn handle_bought_together(
    service: &StorefrontService<SnapshotStore>,
    product_id: &str,
    limit: usize,
    explain: bool,
) -> Result<()> {
    let response = service
        .bought_together(product_id, Some(limit))
        .await
        .with_context(|| format!("Failed to get recommendations for product {}", product_id))?;

    print_bought_together(product_id, &response);

    if explain {
        let store = service.store();
        let seed = store
            .find_product(product_id)
            .ok_or_else(|| anyhow!("Product {} not found", product_id))?;
        let orders = store.find_orders_containing(&seed.id);
        let counts = BoughtTogether::new().co_occurrence_counts(seed, &orders);

        println!(
            "\n{} {} order(s) contain {}",
            "Explanation:".bold(),
            orders.len(),
            seed.id
        );
        for co_purchase in counts.iter().take(limit) {
            println!(
                "  - {} shared {} order(s)",
                co_purchase.product_id, co_purchase.orders
            );
        }
        if counts.is_empty() {
            println!("  No co-purchases; results come from the same category");
        }
    }
    Ok(())
}

/// Handle the 'analytics' command
async fn handle_analytics(service: &StorefrontService<SnapshotStore>, json: bool) -> Result<()> {
    let report = service
        .review_analytics()
        .await
        .context("Failed to compute review analytics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Handle the 'user' command
async fn handle_user(service: &StorefrontService<SnapshotStore>, user_id: &str) -> Result<()> {
    let analytics = service
        .user_analytics(user_id)
        .await
        .with_context(|| format!("Failed to get analytics for user {}", user_id))?;

    let name = service
        .store()
        .find_user(user_id)
        .map(|user| user.name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    print_user(&name, &analytics);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: &StorefrontService<SnapshotStore>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let product_ids = service.store().catalog().product_ids();
    if product_ids.is_empty() {
        return Err(anyhow!("Snapshot has no products to benchmark with"));
    }

    let seeds: Vec<String> = (0..requests)
        .map(|_| product_ids[rand::random_range(0..product_ids.len())].clone())
        .collect();

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = vec![];
    for seed in seeds {
        let service = service.clone();
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            service.bought_together(&seed, None).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    let analytics_start = Instant::now();
    service.review_analytics().await?;
    let analytics_time = analytics_start.elapsed();

    if timings.is_empty() {
        println!("No requests made");
        return Ok(());
    }

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p) as usize];
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);
    println!("Full analytics report: {:?}", analytics_time);

    Ok(())
}

fn print_bought_together(product_id: &str, response: &BoughtTogetherResponse) {
    let source = format!("{:?}", response.source);
    println!(
        "{} {} [{}]",
        "Frequently bought with".bold().blue(),
        product_id.bold(),
        source.dimmed()
    );
    if response.products.is_empty() {
        println!("  No recommendations");
    }
    for (i, product) in response.products.iter().enumerate() {
        println!(
            "{}. {} ({}) - ${:.2}, rated {:.1} by {}",
            (i + 1).to_string().green(),
            product.name,
            product.id,
            product.price,
            product.rating,
            product.num_reviews
        );
    }
}

fn print_report(report: &AnalyticsReport) {
    let stats = &report.global_stats;
    println!("{}", "Review Analytics:".bold().blue());
    println!(
        "{}Reviews: {} (average {}, {} skipped)",
        "• ".green(),
        stats.total_reviews,
        stats.average_rating,
        stats.skipped_reviews
    );
    for (star, count) in stats.rating_distribution.iter().enumerate().rev() {
        println!("    {}★ {}", star + 1, count);
    }

    println!("{}", "Categories:".bold());
    for (category, entry) in &report.category_analytics {
        println!("  - {}: {} ({} reviews)", category, entry.average_rating, entry.count);
    }

    println!("{}", "Tags:".bold());
    for (tag, entry) in &report.tag_analytics {
        println!("  - {}: {} ({} reviews)", tag, entry.average_rating, entry.count);
    }

    println!("{}", "Most popular products:".bold());
    for (i, product) in report.product_popularity.iter().enumerate() {
        println!(
            "{}. {} - {} ({} reviews: {}+ / {}= / {}-)",
            (i + 1).to_string().green(),
            product.name,
            product.average_rating,
            product.review_count,
            product.positive_reviews,
            product.neutral_reviews,
            product.negative_reviews
        );
    }

    println!("{}", "Most positive reviewers:".bold());
    for reviewer in &report.positive_reviewers {
        println!(
            "  - {}: {:.0}% positive over {} reviews",
            reviewer.user_id,
            reviewer.positive_ratio * 100.0,
            reviewer.total_reviews
        );
    }

    println!("{}", "Popular category pairs:".bold());
    for pair in &report.popular_category_pairs {
        println!(
            "  - {} + {}: {} users",
            pair.categories[0], pair.categories[1], pair.count
        );
    }
}

fn print_user(name: &str, user: &UserAnalytics) {
    println!("{}", format!("User {} ({})", user.user_id, name).bold().blue());
    println!("{}Reviews: {}", "• ".green(), user.total_reviews);
    println!("{}Average rating: {}", "• ".green(), user.average_rating);
    println!(
        "{}High / low ratings: {} / {}",
        "• ".green(),
        user.high_ratings,
        user.low_ratings
    );

    println!("Preferred categories:");
    for pref in &user.preferred_categories {
        println!("  - {}: {} ({} reviews)", pref.key, pref.average_rating, pref.count);
    }
    println!("Preferred tags:");
    for pref in &user.preferred_tags {
        println!("  - {}: {} ({} reviews)", pref.key, pref.average_rating, pref.count);
    }

    println!("Reviewed products:");
    for reviewed in &user.reviewed_products {
        let date = reviewed
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "undated".to_string());
        println!("  - {} (Rating: {}, {})", reviewed.name, reviewed.rating, date);
    }

    println!("{}", "Recommended for this user:".bold());
    if user.recommended_products.is_empty() {
        println!("  Nothing matches this user's preferences yet");
    }
    for (i, rec) in user.recommended_products.iter().enumerate() {
        println!(
            "{}. {} - {} avg, score {:.1}",
            (i + 1).to_string().green(),
            rec.name,
            rec.average_rating,
            rec.match_score
        );
    }
}

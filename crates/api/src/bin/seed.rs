//! Reset the database to a small set of demo listings.
//!
//! Deletes every user and listing (bookings and reviews go with them), then
//! creates a demo host owning three sample stays.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wanderlust_api::auth::password::hash_password;
use wanderlust_api::config::ServerConfig;
use wanderlust_core::listing::ListingDraft;
use wanderlust_db::models::listing::CreateListing;
use wanderlust_db::models::user::CreateUser;
use wanderlust_db::repositories::{ListingRepo, UserRepo};

const DEMO_EMAIL: &str = "demo@wanderlust.test";
const DEMO_NAME: &str = "Demo Host";
const DEMO_PASSWORD: &str = "wanderlust";

struct Sample {
    title: &'static str,
    description: &'static str,
    price: f64,
    location: &'static str,
    amenities: &'static [&'static str],
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "Cozy Beach House",
        description: "Beautiful beachfront property with stunning ocean views",
        price: 150.0,
        location: "Malibu",
        amenities: &["WiFi", "Kitchen", "Parking", "Ocean View"],
    },
    Sample {
        title: "Mountain Cabin Retreat",
        description: "Secluded mountain cabin perfect for nature lovers",
        price: 120.0,
        location: "Aspen",
        amenities: &["Fireplace", "Hiking Trails", "Pet Friendly"],
    },
    Sample {
        title: "Downtown Loft",
        description: "Modern loft in the heart of downtown",
        price: 200.0,
        location: "New York",
        amenities: &["WiFi", "Gym", "Rooftop Access"],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let pool = wanderlust_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    wanderlust_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Connected to database for seeding");

    let listings = ListingRepo::delete_all(&pool).await?;
    let users = UserRepo::delete_all(&pool).await?;
    tracing::info!(listings, users, "Cleared existing data");

    let password_hash =
        hash_password(DEMO_PASSWORD).map_err(|e| anyhow::anyhow!("Hashing failed: {e}"))?;
    let host = UserRepo::create(
        &pool,
        &CreateUser {
            email: DEMO_EMAIL.to_string(),
            name: DEMO_NAME.to_string(),
            password_hash,
        },
    )
    .await
    .context("Failed to create demo host")?;

    for sample in SAMPLES {
        let draft = ListingDraft {
            title: sample.title.to_string(),
            description: Some(sample.description.to_string()),
            price: sample.price,
            location: Some(sample.location.to_string()),
            country: Some("USA".to_string()),
            listing_type: Some("stay".to_string()),
            amenities: sample.amenities.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        };
        let listing = ListingRepo::create(
            &pool,
            &CreateListing {
                draft,
                image: None,
                host_id: host.id,
            },
        )
        .await
        .with_context(|| format!("Failed to insert '{}'", sample.title))?;
        tracing::info!(id = listing.id, title = %listing.title, "Seeded listing");
    }

    tracing::info!(email = DEMO_EMAIL, password = DEMO_PASSWORD, "Sample data seeded successfully");
    Ok(())
}

//! Repository for the `listings` table.

use sqlx::{PgConnection, PgPool};
use wanderlust_core::filter::{like_pattern, ListingFilter};
use wanderlust_core::listing::{DEFAULT_CATEGORY, DEFAULT_LISTING_TYPE, DEFAULT_PURPOSE};
use wanderlust_core::rating::RatingSummary;
use wanderlust_core::types::DbId;

use crate::models::listing::{CreateListing, Listing, UpdateListing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, image_url, image_filename, price, location, \
                       country, latitude, longitude, average_rating, total_reviews, \
                       listing_type, amenities, purpose, availability_start, availability_end, \
                       available, category, host_id, created_at, updated_at";

/// Provides CRUD and search operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing, returning the created row.
    ///
    /// Enumeration fields missing from the draft get their defaults; a new
    /// listing is available unless the draft says otherwise.
    pub async fn create(pool: &PgPool, input: &CreateListing) -> Result<Listing, sqlx::Error> {
        let draft = &input.draft;
        let query = format!(
            "INSERT INTO listings (
                title, description, image_url, image_filename, price, location, country,
                latitude, longitude, listing_type, amenities, purpose,
                availability_start, availability_end, available, category, host_id
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(input.image.as_ref().map(|i| &i.url))
            .bind(input.image.as_ref().map(|i| &i.filename))
            .bind(draft.price)
            .bind(&draft.location)
            .bind(&draft.country)
            .bind(draft.latitude)
            .bind(draft.longitude)
            .bind(draft.listing_type.as_deref().unwrap_or(DEFAULT_LISTING_TYPE))
            .bind(&draft.amenities)
            .bind(draft.purpose.as_deref().unwrap_or(DEFAULT_PURPOSE))
            .bind(draft.availability_start)
            .bind(draft.availability_end)
            .bind(draft.available.unwrap_or(true))
            .bind(draft.category.as_deref().unwrap_or(DEFAULT_CATEGORY))
            .bind(input.host_id)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List listings matching every active predicate of `filter`, newest first.
    pub async fn search(pool: &PgPool, filter: &ListingFilter) -> Result<Vec<Listing>, sqlx::Error> {
        let where_clause = where_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM listings {where_clause} ORDER BY created_at DESC, id DESC"
        );

        let mut q = sqlx::query_as::<_, Listing>(&query);

        // Bind dynamic parameters in the order `filter_conditions` numbered them.
        if let Some(ref location) = filter.location {
            q = q.bind(like_pattern(location));
        }
        if let Some(ref title) = filter.title {
            q = q.bind(like_pattern(title));
        }
        if let Some(min) = filter.min_price {
            q = q.bind(min);
        }
        if let Some(max) = filter.max_price {
            q = q.bind(max);
        }
        if let Some(ref listing_type) = filter.listing_type {
            q = q.bind(listing_type);
        }
        if let Some(ref purpose) = filter.purpose {
            q = q.bind(purpose);
        }
        if let Some(ref category) = filter.category {
            q = q.bind(category);
        }
        if !filter.amenities.is_empty() {
            q = q.bind(&filter.amenities);
        }
        if let Some(from) = filter.available_from {
            q = q.bind(from);
        }
        if let Some(until) = filter.available_until {
            q = q.bind(until);
        }

        q.fetch_all(pool).await
    }

    /// List listings hosted by a user, newest first.
    pub async fn list_by_host(pool: &PgPool, host_id: DbId) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings WHERE host_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(host_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a listing's editable fields.
    ///
    /// Enumerations and the availability flag missing from the draft keep
    /// their stored values, as does the image when no new one was uploaded.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateListing,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let draft = &input.draft;
        let query = format!(
            "UPDATE listings SET
                title = $2,
                description = $3,
                price = $4,
                location = $5,
                country = $6,
                listing_type = COALESCE($7, listing_type),
                purpose = COALESCE($8, purpose),
                category = COALESCE($9, category),
                amenities = $10,
                latitude = $11,
                longitude = $12,
                availability_start = $13,
                availability_end = $14,
                available = COALESCE($15, available),
                image_url = COALESCE($16, image_url),
                image_filename = COALESCE($17, image_filename),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.price)
            .bind(&draft.location)
            .bind(&draft.country)
            .bind(&draft.listing_type)
            .bind(&draft.purpose)
            .bind(&draft.category)
            .bind(&draft.amenities)
            .bind(draft.latitude)
            .bind(draft.longitude)
            .bind(draft.availability_start)
            .bind(draft.availability_end)
            .bind(draft.available)
            .bind(input.image.as_ref().map(|i| &i.url))
            .bind(input.image.as_ref().map(|i| &i.filename))
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a listing; its bookings and reviews cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Take a row lock on a listing for the rest of the transaction.
    ///
    /// Returns `false` if the listing does not exist.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let row: Option<DbId> = sqlx::query_scalar("SELECT id FROM listings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }

    /// Store the denormalized rating aggregate.
    pub async fn set_rating_summary(
        conn: &mut PgConnection,
        id: DbId,
        summary: &RatingSummary,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE listings SET average_rating = $2, total_reviews = $3 WHERE id = $1")
            .bind(id)
            .bind(summary.average)
            .bind(summary.count)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Remove every listing.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings").execute(pool).await?;
        Ok(result.rows_affected())
    }
}

/// Build the SQL predicates for a filter, numbering placeholders from `$1`.
///
/// The order here is the bind order used by [`ListingRepo::search`].
fn filter_conditions(filter: &ListingFilter) -> Vec<String> {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;
    let mut push = |template: &str| {
        conditions.push(template.replace("{}", &format!("${bind_idx}")));
        bind_idx += 1;
    };

    if filter.location.is_some() {
        push("location ILIKE {}");
    }
    if filter.title.is_some() {
        push("title ILIKE {}");
    }
    if filter.min_price.is_some() {
        push("price >= {}");
    }
    if filter.max_price.is_some() {
        push("price <= {}");
    }
    if filter.listing_type.is_some() {
        push("listing_type = {}");
    }
    if filter.purpose.is_some() {
        push("purpose = {}");
    }
    if filter.category.is_some() {
        push("category = {}");
    }
    if !filter.amenities.is_empty() {
        push("amenities && {}");
    }
    if filter.available_from.is_some() {
        push("availability_start <= {}");
    }
    if filter.available_until.is_some() {
        push("availability_end >= {}");
    }
    if filter.require_available {
        conditions.push("available = TRUE".to_string());
    }

    conditions
}

fn where_clause(filter: &ListingFilter) -> String {
    let conditions = filter_conditions(filter);
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        assert_eq!(where_clause(&ListingFilter::default()), "");
    }

    #[test]
    fn placeholders_are_numbered_in_bind_order() {
        let filter = ListingFilter {
            title: Some("loft".into()),
            max_price: Some(200.0),
            category: Some("villa".into()),
            amenities: vec!["WiFi".into()],
            ..Default::default()
        };
        assert_eq!(
            filter_conditions(&filter),
            vec![
                "title ILIKE $1",
                "price <= $2",
                "category = $3",
                "amenities && $4",
            ]
        );
    }

    #[test]
    fn availability_flag_needs_no_placeholder() {
        let filter = ListingFilter {
            location: Some("Aspen".into()),
            require_available: true,
            ..Default::default()
        };
        assert_eq!(
            where_clause(&filter),
            "WHERE location ILIKE $1 AND available = TRUE"
        );
    }

    #[test]
    fn every_predicate_is_conjoined() {
        let filter = ListingFilter {
            location: Some("a".into()),
            title: Some("b".into()),
            min_price: Some(1.0),
            max_price: Some(2.0),
            listing_type: Some("stay".into()),
            purpose: Some("general".into()),
            category: Some("room".into()),
            amenities: vec!["x".into()],
            require_available: true,
            available_from: Some(chrono::Utc::now()),
            available_until: Some(chrono::Utc::now()),
        };
        let conditions = filter_conditions(&filter);
        assert_eq!(conditions.len(), 11);
        assert_eq!(conditions[9], "availability_end >= $10");
        assert_eq!(where_clause(&filter).matches(" AND ").count(), 10);
    }
}

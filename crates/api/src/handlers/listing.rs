//! Handlers for the `/listings` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use wanderlust_core::filter::ListingFilter;
use wanderlust_core::listing::{FormFields, ListingDraft};
use wanderlust_core::types::DbId;
use wanderlust_db::models::listing::{CreateListing, ImageRef, Listing, UpdateListing};
use wanderlust_db::repositories::{ListingRepo, ReviewRepo};

use super::{redirect_with_error, redirect_with_success};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::ViewContext;
use crate::session::Session;
use crate::state::AppState;
use crate::uploads::{ImageUpload, UploadError};
use crate::views;
use crate::views::listings::ShowPage;

pub const LISTING_NOT_FOUND: &str = "Listing not found";
pub const NOT_LISTING_OWNER: &str = "You do not have permission to do that";

/// Multipart field carrying the listing picture.
const IMAGE_FIELD: &str = "image";

/// A submitted listing form: text fields plus an optional picture.
struct ListingForm {
    fields: FormFields,
    image: Option<ImageUpload>,
}

/// Drain a multipart body into text fields and the image file, if any.
///
/// Browsers send an empty file part when no file was chosen; that counts as
/// no image.
async fn read_listing_form(mut multipart: Multipart) -> AppResult<ListingForm> {
    let mut pairs = Vec::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let is_image = name == IMAGE_FIELD || name == "listing[image]";

        if is_image {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !bytes.is_empty() {
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            pairs.push((name, value));
        }
    }

    Ok(ListingForm {
        fields: FormFields::new(pairs),
        image,
    })
}

/// Store the uploaded image, turning a rejected file type into a flash.
async fn store_image(
    state: &AppState,
    image: Option<ImageUpload>,
) -> AppResult<Result<Option<ImageRef>, String>> {
    let Some(image) = image else {
        return Ok(Ok(None));
    };
    match state.images.store(image).await {
        Ok(stored) => Ok(Ok(Some(stored))),
        Err(UploadError::NotAnImage(ct)) => {
            Ok(Err(format!("Only image uploads are accepted, got '{ct}'")))
        }
        Err(e) => Err(e.into()),
    }
}

/// Whether `user` may edit or delete `listing` under the current policy.
fn may_modify(state: &AppState, user_id: DbId, listing: &Listing) -> bool {
    !state.config.enforce_listing_ownership || listing.host_id == user_id
}

/// GET /listings
pub async fn index(
    State(state): State<AppState>,
    ctx: ViewContext,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let filter = ListingFilter::from_query_pairs(&pairs);
    let listings = ListingRepo::search(&state.pool, &filter).await?;
    Ok(views::listings::index(&ctx, &listings, &filter).into_response())
}

/// GET /listings/new
pub async fn new_form(_user: AuthUser, ctx: ViewContext) -> Response {
    views::listings::new_form(&ctx).into_response()
}

/// POST /listings
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = read_listing_form(multipart).await?;

    let draft = match ListingDraft::from_fields(&form.fields) {
        Ok(draft) => draft,
        Err(e) => return Ok(redirect_with_error(&session, "/listings/new", e.to_string())),
    };

    let image = match store_image(&state, form.image).await? {
        Ok(image) => image,
        Err(msg) => return Ok(redirect_with_error(&session, "/listings/new", msg)),
    };

    let listing = ListingRepo::create(
        &state.pool,
        &CreateListing {
            draft,
            image,
            host_id: user.id,
        },
    )
    .await?;

    tracing::info!(listing_id = listing.id, user_id = user.id, store = state.images.kind(), "Listing created");
    Ok(redirect_with_success(&session, "/listings", "Listing created"))
}

/// GET /listings/{id}
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let Some(listing) = ListingRepo::find_by_id(&state.pool, id).await? else {
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    };
    let ctx = ViewContext::load(&state, &session).await?;
    let reviews = ReviewRepo::list_for_listing(&state.pool, id).await?;

    let can_manage = ctx
        .current_user
        .as_ref()
        .is_some_and(|u| may_modify(&state, u.id, &listing));

    let page = ShowPage {
        listing: &listing,
        reviews: &reviews,
        can_manage,
        maps_api_key: state.config.google_maps_api_key.as_deref(),
    };
    Ok(views::listings::show(&ctx, &page).into_response())
}

/// GET /listings/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let Some(listing) = ListingRepo::find_by_id(&state.pool, id).await? else {
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    };
    if !may_modify(&state, user.id, &listing) {
        return Ok(redirect_with_error(&session, &format!("/listings/{id}"), NOT_LISTING_OWNER));
    }
    let ctx = ViewContext::load(&state, &session).await?;
    Ok(views::listings::edit_form(&ctx, &listing).into_response())
}

/// PUT /listings/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Response> {
    let Some(existing) = ListingRepo::find_by_id(&state.pool, id).await? else {
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    };
    if !may_modify(&state, user.id, &existing) {
        return Ok(redirect_with_error(&session, &format!("/listings/{id}"), NOT_LISTING_OWNER));
    }

    let form = read_listing_form(multipart).await?;
    let edit_path = format!("/listings/{id}/edit");

    let draft = match ListingDraft::from_fields(&form.fields) {
        Ok(draft) => draft,
        Err(e) => return Ok(redirect_with_error(&session, &edit_path, e.to_string())),
    };

    let image = match store_image(&state, form.image).await? {
        Ok(image) => image,
        Err(msg) => return Ok(redirect_with_error(&session, &edit_path, msg)),
    };

    if ListingRepo::update(&state.pool, id, &UpdateListing { draft, image })
        .await?
        .is_none()
    {
        // Deleted between the lookup and the update.
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    }

    tracing::info!(listing_id = id, user_id = user.id, "Listing updated");
    Ok(redirect_with_success(&session, &format!("/listings/{id}"), "Listing updated"))
}

/// DELETE /listings/{id}
///
/// Bookings and reviews of the listing go with it.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let Some(listing) = ListingRepo::find_by_id(&state.pool, id).await? else {
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    };
    if !may_modify(&state, user.id, &listing) {
        return Ok(redirect_with_error(&session, &format!("/listings/{id}"), NOT_LISTING_OWNER));
    }

    if !ListingRepo::delete(&state.pool, id).await? {
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    }

    tracing::info!(listing_id = id, user_id = user.id, "Listing deleted");
    Ok(redirect_with_success(&session, "/listings", "Listing deleted"))
}

/// GET /listings/{id}/map
pub async fn map(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let Some(listing) = ListingRepo::find_by_id(&state.pool, id).await? else {
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    };
    let ctx = ViewContext::load(&state, &session).await?;
    Ok(views::listings::map(&ctx, &listing, state.config.google_maps_api_key.as_deref()).into_response())
}

/// GET /
pub async fn root() -> Redirect {
    Redirect::to("/listings")
}

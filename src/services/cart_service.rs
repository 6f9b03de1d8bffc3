use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartView},
    error::{AppError, AppResult},
    middleware::auth::SessionUser,
    response::{ApiResponse, Meta},
    services::menu_service,
    state::AppState,
};

/// Snapshot the session's cart into a view with totals.
pub async fn view_cart(state: &AppState, user: &SessionUser) -> AppResult<ApiResponse<CartView>> {
    let carts = state.carts.read().await;
    let view = match carts.get(&user.id) {
        Some(cart) => CartView {
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
        },
        None => CartView {
            lines: Vec::new(),
            totals: None,
        },
    };
    Ok(ApiResponse::success("OK", view, Some(Meta::empty())))
}

/// Add one serving of a menu item to the session's cart, snapshotting its
/// name, price and prep time at add-time.
pub async fn add_to_cart(
    state: &AppState,
    user: &SessionUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let item = match menu_service::get_menu_item(state, payload.item_id).await {
        Ok(item) => item,
        Err(AppError::NotFound) => {
            return Err(AppError::BadRequest("menu item not found".into()));
        }
        Err(err) => return Err(err),
    };
    if !item.is_available {
        return Err(AppError::BadRequest(format!(
            "{} is not available today",
            item.name
        )));
    }

    let view = {
        let mut carts = state.carts.write().await;
        let cart = carts.entry(user.id.clone()).or_default();
        cart.add(&item);
        CartView {
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(&user.id),
        "cart_add",
        Some("carts"),
        Some(serde_json::json!({ "item_id": payload.item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", view, None))
}

/// Set a line's quantity. Zero removes the line; an unknown item id leaves
/// the cart unchanged rather than erroring.
pub async fn update_quantity(
    state: &AppState,
    user: &SessionUser,
    item_id: Uuid,
    quantity: u32,
) -> AppResult<ApiResponse<CartView>> {
    let view = {
        let mut carts = state.carts.write().await;
        let cart = carts.entry(user.id.clone()).or_default();
        cart.update_quantity(item_id, quantity);
        CartView {
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(&user.id),
        "cart_update",
        Some("carts"),
        Some(serde_json::json!({ "item_id": item_id, "quantity": quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", view, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &SessionUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    update_quantity(state, user, item_id, 0).await
}

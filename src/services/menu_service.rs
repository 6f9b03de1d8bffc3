use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
    entity::menu_items::{ActiveModel, Column, Entity as MenuItems, Model as MenuItemModel},
    error::{AppError, AppResult},
    middleware::auth::{SessionUser, ensure_staff},
    models::MenuItem,
    response::{ApiResponse, Meta},
    routes::params::{MenuQuery, MenuSortBy, SortOrder},
    state::AppState,
};

pub async fn list_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    if let Some(available) = query.available {
        condition = condition.add(Column::IsAvailable.eq(available));
    }

    let sort_by = query.sort_by.unwrap_or(MenuSortBy::Name);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);
    let sort_col = match sort_by {
        MenuSortBy::CreatedAt => Column::CreatedAt,
        MenuSortBy::Price => Column::Price,
        MenuSortBy::Name => Column::Name,
    };

    let mut finder = MenuItems::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Menu", MenuList { items }, Some(meta)))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<MenuItem> {
    let item = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(menu_item_from_entity);
    match item {
        Some(item) => Ok(item),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_menu_item(
    state: &AppState,
    user: &SessionUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_staff(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if payload.price < 0 {
        return Err(AppError::Validation("price must not be negative".into()));
    }
    let prep = payload.preparation_time.unwrap_or(10);
    if prep <= 0 {
        return Err(AppError::Validation(
            "preparation_time must be positive".into(),
        ));
    }

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        name: Set(payload.name),
        description: Set(payload.description),
        category: Set(payload.category),
        price: Set(payload.price),
        preparation_time: Set(prep),
        is_available: Set(true),
        created_at: NotSet,
    };
    let item = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&user.id),
        "menu_create",
        Some("menu_items"),
        Some(serde_json::json!({ "item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item created",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &SessionUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_staff(user)?;
    let existing = MenuItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(item) => item,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(Some(category));
    }
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::Validation("price must not be negative".into()));
        }
        active.price = Set(price);
    }
    if let Some(prep) = payload.preparation_time {
        if prep <= 0 {
            return Err(AppError::Validation(
                "preparation_time must be positive".into(),
            ));
        }
        active.preparation_time = Set(prep);
    }
    if let Some(available) = payload.is_available {
        active.is_available = Set(available);
    }

    let item = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&user.id),
        "menu_update",
        Some("menu_items"),
        Some(serde_json::json!({ "item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub(crate) fn menu_item_from_entity(model: MenuItemModel) -> MenuItem {
    MenuItem {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        price: model.price,
        preparation_time: model.preparation_time,
        is_available: model.is_available,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

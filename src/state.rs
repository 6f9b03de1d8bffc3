use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    db::{DbPool, OrmConn},
    domain::Cart,
};

/// Carts keyed by session user id. Held in memory only: a cart lives for
/// one session and is dropped on submission, never persisted.
pub type CartStore = Arc<RwLock<HashMap<String, Cart>>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub carts: CartStore,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        Self {
            pool,
            orm,
            carts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

// ReelShelf services
// Services hold the logic that sits above single-table storage: platform detection,
// the category tree, title lookup, backups, settings, auth and the client-side store.

pub mod auth_service;
pub mod backup_service;
pub mod category_tree;
pub mod collection_store;
pub mod platform_detector;
pub mod settings_engine;
pub mod title_fetcher;

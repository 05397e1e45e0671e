// storage/mod.rs
// Result persistence in SQLite

mod keygen;
mod migrations;
mod pool;
mod results;

// Re-export commonly used items
pub use keygen::{gen_word, generate_key};
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use results::ResultStore;

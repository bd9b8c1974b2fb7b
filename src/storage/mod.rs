pub mod cache;
pub mod lmdb;

pub use self::cache::ResponseCache;
pub use self::lmdb::LmdbStorage;

// Service exports
pub mod cache;
pub mod matching;
pub mod memory;
pub mod profile_store;
pub mod rest_store;

pub use cache::{CacheManager, CacheKey, CacheError, ResultCache, DEFAULT_MATCH_TTL_SECS};
pub use matching::{MatchService, MatchError, MatchOptions};
pub use memory::{InMemoryProfileStore, InMemoryResultCache};
pub use profile_store::{ProfileStore, LookupError};
pub use rest_store::{RestProfileStore, StoreTables};

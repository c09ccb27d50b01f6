pub mod config;
pub mod fsio;
pub mod lock;
pub mod paths;
pub mod staging;
pub mod store;

pub use config::StoreConfig;
pub use lock::RepoLock;
pub use paths::RepoPaths;
pub use store::RepoStore;

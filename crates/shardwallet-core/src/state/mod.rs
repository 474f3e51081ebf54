//! Reactive coordination of the shard directory, claim preview, price
//! reader and claims.

pub mod errors;
pub mod events;
mod fetch;
pub mod store;
pub mod view;

pub use errors::StoreError;
pub use events::Event;
pub use store::ShardwalletStore;
pub use view::{FetchFailure, FetchStage, ShardwalletView};

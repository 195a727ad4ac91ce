mod errors;
mod memory;
mod models;

pub use errors::StoreError;
pub use memory::InMemoryStore;
pub use models::Write;

use async_trait::async_trait;

use crate::models::{Game, NewsItem, Player, PlayerAchievement, Season};

/// Persistence collaborator for the league.
///
/// Reads return whole collections. Mutations only happen through
/// `commit_batch`, which applies every write or none of them.
#[async_trait]
pub trait Store: Send + Sync {
    /// Players in roster (insertion) order
    async fn read_players(&self) -> Result<Vec<Player>, StoreError>;

    /// Games in insertion order, optionally restricted to one season
    async fn read_games(&self, season_id: Option<&str>) -> Result<Vec<Game>, StoreError>;

    async fn read_seasons(&self) -> Result<Vec<Season>, StoreError>;

    async fn read_achievement_grants(&self) -> Result<Vec<PlayerAchievement>, StoreError>;

    /// News feed, newest first
    async fn read_news(&self) -> Result<Vec<NewsItem>, StoreError>;

    async fn commit_batch(&self, writes: Vec<Write>) -> Result<(), StoreError>;
}

use crate::models::{Game, NewsItem, Player, PlayerAchievement, Season};

/// One mutation inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    UpsertPlayer(Player),
    DeletePlayer(String),
    InsertGame(Game),
    ReplaceGame(Game),
    DeleteGame(String),
    UpsertSeason(Season),
    DeleteSeason(String),
    InsertAchievement(PlayerAchievement),
    /// By grant record id
    DeleteAchievement(String),
    InsertNews(NewsItem),
    DeleteNews(String),
}

impl Write {
    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Write::UpsertPlayer(_) => "upsert_player",
            Write::DeletePlayer(_) => "delete_player",
            Write::InsertGame(_) => "insert_game",
            Write::ReplaceGame(_) => "replace_game",
            Write::DeleteGame(_) => "delete_game",
            Write::UpsertSeason(_) => "upsert_season",
            Write::DeleteSeason(_) => "delete_season",
            Write::InsertAchievement(_) => "insert_achievement",
            Write::DeleteAchievement(_) => "delete_achievement",
            Write::InsertNews(_) => "insert_news",
            Write::DeleteNews(_) => "delete_news",
        }
    }
}

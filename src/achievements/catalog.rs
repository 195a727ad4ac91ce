use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const BIG_STACK_CHIPS: u64 = 100_000;
pub const ROUND_STACK_MULTIPLE: u64 = 10_000;
pub const REPEATED_DIGITS_MIN_LEN: u32 = 3;
pub const LAST_STANDING_MIN_PLAYERS: u32 = 5;
pub const SCRAPED_BY_MAX_CHIPS: u64 = 3_000;
pub const SCRAPED_BY_MIN_PLAYERS: u32 = 6;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AchievementId {
    Veteran,
    Regular,
    Institution,
    Whale,
    RoundNumber,
    LuckyDigits,
    LastManStanding,
    Cockroach,
    RunnerUp,
    SilverCollector,
    DeadBroke,
    FirstBlood,
    Invincible,
    VentreMou,
    ChipHoarder,
    Millionaire,
    Champion,
    DoubleChampion,
    Dynasty,
    Emperor,
    PokerGod,
    BackToBack,
    Conqueror,
    RedLantern,
    EternalSecond,
    Kamikaze,
    Assidu,
    Metronome,
}

impl AchievementId {
    /// Catalog entry for this id
    pub fn definition(self) -> Option<&'static Achievement> {
        CATALOG.iter().find(|a| a.id == self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    /// Earned once, kept forever
    Permanent,
    /// Held by whoever currently leads the season; changes hands
    Seasonal,
}

/// Something remarkable about a player's line in the game just recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFeat {
    BigStack { min_chips: u64 },
    RoundStack { multiple: u64 },
    RepeatedDigits { min_digits: u32 },
    /// Won as the only survivor
    LastStanding { min_players: u32 },
    /// Survived, barely
    ScrapedBy { max_chips: u64, min_players: u32 },
}

/// Persisted lifetime counters that badges can threshold on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    SecondPlaces,
    ZeroChips,
    FirstBlood,
    InvincibleStreak,
    VentreMou,
}

/// Per-season figure whose leader holds a seasonal title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonStat {
    Wins,
    LastPlaces,
    SecondPlaces,
    ZeroChips,
    Appearances,
    AppearanceStreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    GamesPlayed(u32),
    SingleGame(GameFeat),
    Counter {
        counter: Counter,
        min: u32,
    },
    /// Lifetime chips. A player who qualifies for (or holds) `superseded_by`
    /// never receives this tier.
    ChipsAmassed {
        min: u64,
        superseded_by: Option<AchievementId>,
    },
    SeasonWins(u32),
    ConsecutiveSeasonWins(u32),
    SeasonLeader(SeasonStat),
}

impl Criterion {
    /// Only checked when a season is closed
    pub fn is_rollover_only(&self) -> bool {
        matches!(
            self,
            Criterion::SeasonWins(_) | Criterion::ConsecutiveSeasonWins(_)
        )
    }
}

type LossPhrase = fn(&str, &str) -> String;

pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub criterion: Criterion,
    news_phrase: fn(&str) -> String,
    loss_phrase: Option<LossPhrase>,
}

impl std::fmt::Debug for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("criterion", &self.criterion)
            .finish()
    }
}

impl Achievement {
    pub fn kind(&self) -> AchievementType {
        match self.criterion {
            Criterion::SeasonLeader(_) => AchievementType::Seasonal,
            _ => AchievementType::Permanent,
        }
    }

    pub fn is_seasonal(&self) -> bool {
        self.kind() == AchievementType::Seasonal
    }

    /// Announcement for a player unlocking (or taking) this badge
    pub fn news(&self, player_name: &str) -> String {
        (self.news_phrase)(player_name)
    }

    /// Announcement for a title holder being overtaken, if this badge has one
    pub fn loss_news(&self, former_holder: &str, new_holder: &str) -> Option<String> {
        self.loss_phrase
            .map(|phrase| phrase(former_holder, new_holder))
    }
}

fn conqueror_lost(former: &str, new: &str) -> String {
    format!("👑 {former} lost the Conqueror title to {new}!")
}

fn red_lantern_passed(former: &str, new: &str) -> String {
    format!("😥 {former} passed the Red Lantern on to {new}!")
}

fn eternal_second_passed(former: &str, new: &str) -> String {
    format!("🥲 {former} hands the Eternal Second title over to {new}!")
}

fn kamikaze_lost(former: &str, new: &str) -> String {
    format!("💥 {former} is no longer the Kamikaze, {new} took over!")
}

fn assidu_lost(former: &str, new: &str) -> String {
    format!("📅 {former} is no longer the most assiduous player, {new} is!")
}

fn metronome_lost(former: &str, new: &str) -> String {
    format!("⏱️ {former} broke the rhythm, {new} is the new Metronome!")
}

pub fn catalog() -> &'static [Achievement] {
    &CATALOG
}

static CATALOG: [Achievement; 28] = [
    Achievement {
        id: AchievementId::Veteran,
        name: "The Veteran",
        description: "Play 10 games, all seasons combined.",
        emoji: "🎖️",
        criterion: Criterion::GamesPlayed(10),
        news_phrase: |name| format!("🎖️ {name} became a Veteran of the tables after 10 games!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Regular,
        name: "The Regular",
        description: "Play 25 games, all seasons combined.",
        emoji: "🪑",
        criterion: Criterion::GamesPlayed(25),
        news_phrase: |name| format!("🪑 {name} has a reserved seat now: 25 games played!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Institution,
        name: "The Institution",
        description: "Play 50 games, all seasons combined.",
        emoji: "🏛️",
        criterion: Criterion::GamesPlayed(50),
        news_phrase: |name| format!("🏛️ {name} is a club Institution with 50 games played!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Whale,
        name: "The Whale",
        description: "Finish a game with at least 100,000 chips.",
        emoji: "🐋",
        criterion: Criterion::SingleGame(GameFeat::BigStack {
            min_chips: BIG_STACK_CHIPS,
        }),
        news_phrase: |name| format!("🐋 {name} finished with a monster stack of 100,000+ chips!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::RoundNumber,
        name: "Round Number",
        description: "Finish a game with an exact multiple of 10,000 chips.",
        emoji: "🎯",
        criterion: Criterion::SingleGame(GameFeat::RoundStack {
            multiple: ROUND_STACK_MULTIPLE,
        }),
        news_phrase: |name| format!("🎯 {name} finished with a perfectly round stack!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::LuckyDigits,
        name: "Lucky Digits",
        description: "Finish a game with a stack of 3+ identical digits, like 7777.",
        emoji: "🎰",
        criterion: Criterion::SingleGame(GameFeat::RepeatedDigits {
            min_digits: REPEATED_DIGITS_MIN_LEN,
        }),
        news_phrase: |name| format!("🎰 Jackpot! {name} finished with a stack of repeated digits!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::LastManStanding,
        name: "Last One Standing",
        description: "Win a game of 5 or more players after eliminating everyone else.",
        emoji: "🗡️",
        criterion: Criterion::SingleGame(GameFeat::LastStanding {
            min_players: LAST_STANDING_MIN_PLAYERS,
        }),
        news_phrase: |name| format!("🗡️ {name} cleared the whole table and is the last one standing!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Cockroach,
        name: "The Cockroach",
        description: "Survive a game of 6 or more players with 3,000 chips or fewer.",
        emoji: "🪳",
        criterion: Criterion::SingleGame(GameFeat::ScrapedBy {
            max_chips: SCRAPED_BY_MAX_CHIPS,
            min_players: SCRAPED_BY_MIN_PLAYERS,
        }),
        news_phrase: |name| format!("🪳 {name} crawled to the end of the game on a handful of chips!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::RunnerUp,
        name: "The Runner-Up",
        description: "Finish second 8 times.",
        emoji: "🥈",
        criterion: Criterion::Counter {
            counter: Counter::SecondPlaces,
            min: 8,
        },
        news_phrase: |name| format!("🥈 {name} has now finished second 8 times. So close!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::SilverCollector,
        name: "Silver Collector",
        description: "Finish second 10 times.",
        emoji: "🪙",
        criterion: Criterion::Counter {
            counter: Counter::SecondPlaces,
            min: 10,
        },
        news_phrase: |name| format!("🪙 {name} collected a tenth silver finish!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::DeadBroke,
        name: "Dead Broke",
        description: "Finish a game with zero chips 10 times.",
        emoji: "💸",
        criterion: Criterion::Counter {
            counter: Counter::ZeroChips,
            min: 10,
        },
        news_phrase: |name| format!("💸 {name} ended a game with empty pockets for the tenth time!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::FirstBlood,
        name: "First Blood",
        description: "Be the first player eliminated 5 times.",
        emoji: "🩸",
        criterion: Criterion::Counter {
            counter: Counter::FirstBlood,
            min: 5,
        },
        news_phrase: |name| format!("🩸 {name} has been the first one out 5 times..."),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Invincible,
        name: "The Invincible",
        description: "Play 8 games in a row without finishing last.",
        emoji: "🛡️",
        criterion: Criterion::Counter {
            counter: Counter::InvincibleStreak,
            min: 8,
        },
        news_phrase: |name| format!("🛡️ {name} is Invincible: 8 games in a row without finishing last!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::VentreMou,
        name: "Ventre Mou",
        description: "Finish exactly in the middle of an odd-sized table 5 times.",
        emoji: "😐",
        criterion: Criterion::Counter {
            counter: Counter::VentreMou,
            min: 5,
        },
        news_phrase: |name| format!("😐 {name} has mastered the art of finishing right in the middle!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::ChipHoarder,
        name: "Chip Hoarder",
        description: "Amass 500,000 chips over all games.",
        emoji: "💰",
        criterion: Criterion::ChipsAmassed {
            min: 500_000,
            superseded_by: Some(AchievementId::Millionaire),
        },
        news_phrase: |name| format!("💰 {name} has amassed 500,000 chips over their career!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Millionaire,
        name: "The Millionaire",
        description: "Amass 1,000,000 chips over all games.",
        emoji: "💎",
        criterion: Criterion::ChipsAmassed {
            min: 1_000_000,
            superseded_by: None,
        },
        news_phrase: |name| format!("💎 {name} is a Millionaire: 1,000,000 chips amassed!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Champion,
        name: "Champion",
        description: "Win a season.",
        emoji: "🏆",
        criterion: Criterion::SeasonWins(1),
        news_phrase: |name| format!("🏆 {name} is crowned season Champion!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::DoubleChampion,
        name: "Double Champion",
        description: "Win 2 seasons.",
        emoji: "✌️",
        criterion: Criterion::SeasonWins(2),
        news_phrase: |name| format!("✌️ {name} has now won 2 seasons!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Dynasty,
        name: "Dynasty",
        description: "Win 3 seasons.",
        emoji: "🏰",
        criterion: Criterion::SeasonWins(3),
        news_phrase: |name| format!("🏰 A Dynasty is born: {name} has won 3 seasons!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Emperor,
        name: "Emperor",
        description: "Win 4 seasons.",
        emoji: "🦅",
        criterion: Criterion::SeasonWins(4),
        news_phrase: |name| format!("🦅 All hail Emperor {name}, winner of 4 seasons!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::PokerGod,
        name: "Poker God",
        description: "Win 5 seasons.",
        emoji: "⚡",
        criterion: Criterion::SeasonWins(5),
        news_phrase: |name| format!("⚡ {name} has ascended: 5 seasons won, a true Poker God!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::BackToBack,
        name: "Back to Back",
        description: "Win two seasons in a row.",
        emoji: "🔁",
        criterion: Criterion::ConsecutiveSeasonWins(2),
        news_phrase: |name| format!("🔁 {name} won back-to-back seasons!"),
        loss_phrase: None,
    },
    Achievement {
        id: AchievementId::Conqueror,
        name: "The Conqueror",
        description: "Have the most wins in the current season.",
        emoji: "👑",
        criterion: Criterion::SeasonLeader(SeasonStat::Wins),
        news_phrase: |name| format!("👑 {name} takes the Conqueror title with the most wins this season!"),
        loss_phrase: Some(conqueror_lost as LossPhrase),
    },
    Achievement {
        id: AchievementId::RedLantern,
        name: "The Red Lantern",
        description: "Have the most last places in the current season.",
        emoji: "😥",
        criterion: Criterion::SeasonLeader(SeasonStat::LastPlaces),
        news_phrase: |name| format!("😥 {name} is the season's new Red Lantern..."),
        loss_phrase: Some(red_lantern_passed as LossPhrase),
    },
    Achievement {
        id: AchievementId::EternalSecond,
        name: "The Eternal Second",
        description: "Have the most second places in the current season.",
        emoji: "🥲",
        criterion: Criterion::SeasonLeader(SeasonStat::SecondPlaces),
        news_phrase: |name| format!("🥲 {name} is the Eternal Second of the season!"),
        loss_phrase: Some(eternal_second_passed as LossPhrase),
    },
    Achievement {
        id: AchievementId::Kamikaze,
        name: "The Kamikaze",
        description: "Finish with zero chips the most times in the current season.",
        emoji: "💥",
        criterion: Criterion::SeasonLeader(SeasonStat::ZeroChips),
        news_phrase: |name| format!("💥 {name} is the season's Kamikaze, always going all in!"),
        loss_phrase: Some(kamikaze_lost as LossPhrase),
    },
    Achievement {
        id: AchievementId::Assidu,
        name: "L'Assidu",
        description: "Play the most games in the current season.",
        emoji: "📅",
        criterion: Criterion::SeasonLeader(SeasonStat::Appearances),
        news_phrase: |name| format!("📅 {name} never misses a game: most appearances this season!"),
        loss_phrase: Some(assidu_lost as LossPhrase),
    },
    Achievement {
        id: AchievementId::Metronome,
        name: "The Metronome",
        description: "Have the longest current run of consecutive games in the season.",
        emoji: "⏱️",
        criterion: Criterion::SeasonLeader(SeasonStat::AppearanceStreak),
        news_phrase: |name| format!("⏱️ {name} keeps showing up like clockwork: longest attendance streak!"),
        loss_phrase: Some(metronome_lost as LossPhrase),
    },
];

//! The built-in poke table.

use serde::{Deserialize, Serialize};

/// A poke ("nudge animation") the backend knows by `(poke_type, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PokeKind {
    Poke,
    Heart,
    Like,
    Heartbreak,
    SixSixSix,
    BigMove,
    BabyBall,
    Rose,
    Summon,
    Tease,
    Seal,
    Grenade,
    Lure,
    Grab,
    ShatterScreen,
}

impl PokeKind {
    pub const ALL: [Self; 15] = [
        Self::Poke,
        Self::Heart,
        Self::Like,
        Self::Heartbreak,
        Self::SixSixSix,
        Self::BigMove,
        Self::BabyBall,
        Self::Rose,
        Self::Summon,
        Self::Tease,
        Self::Seal,
        Self::Grenade,
        Self::Lure,
        Self::Grab,
        Self::ShatterScreen,
    ];

    /// Display name as shown by the client.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Poke => "戳一戳",
            Self::Heart => "比心",
            Self::Like => "点赞",
            Self::Heartbreak => "心碎",
            Self::SixSixSix => "666",
            Self::BigMove => "放大招",
            Self::BabyBall => "宝贝球",
            Self::Rose => "玫瑰花",
            Self::Summon => "召唤术",
            Self::Tease => "让你皮",
            Self::Seal => "结印",
            Self::Grenade => "手雷",
            Self::Lure => "勾引",
            Self::Grab => "抓一下",
            Self::ShatterScreen => "碎屏",
        }
    }

    #[must_use]
    pub fn poke_type(&self) -> i32 {
        match self {
            Self::Poke => 1,
            Self::Heart => 2,
            Self::Like => 3,
            Self::Heartbreak => 4,
            Self::SixSixSix => 5,
            Self::BigMove => 6,
            _ => 126,
        }
    }

    #[must_use]
    pub fn id(&self) -> i32 {
        match self {
            Self::BabyBall => 2011,
            Self::Rose => 2007,
            Self::Summon => 2006,
            Self::Tease => 2009,
            Self::Seal => 2005,
            Self::Grenade => 2004,
            Self::Lure => 2003,
            Self::Grab => 2001,
            Self::ShatterScreen => 2002,
            _ => -1,
        }
    }

    #[must_use]
    pub fn lookup(poke_type: i32, id: i32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.poke_type() == poke_type && p.id() == id)
    }
}

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Villager,
    Werewolf,
    #[serde(rename = "Village/Werewolf")]
    VillageWerewolf,
    Neutral,
}

impl Team {
    pub const ALL: [Team; 4] = [
        Team::Villager,
        Team::Werewolf,
        Team::VillageWerewolf,
        Team::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Villager => "Villager",
            Team::Werewolf => "Werewolf",
            Team::VillageWerewolf => "Village/Werewolf",
            Team::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Team::ALL
            .iter()
            .copied()
            .find(|team| team.as_str() == s.trim())
            .ok_or_else(|| format!("Invalid team: {}", s))
    }
}

/// Role实体（游戏角色卡）
///
/// `image_url`/`image_hash` 指向内容寻址存储中的一张图片，
/// 多个Role可以指向同一个文件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub team: Team,
    pub score: i32,
    pub image_url: Option<String>,
    pub image_hash: Option<String>,
    pub is_official: bool,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// 角色分数范围
pub const MIN_SCORE: i32 = -100;
pub const MAX_SCORE: i32 = 100;

/// 创建/更新Role时提交的字段
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct RoleInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub team: Team,
    #[validate(range(min = MIN_SCORE, max = MAX_SCORE))]
    pub score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_round_trip_names() {
        for team in Team::ALL {
            assert_eq!(team.as_str().parse::<Team>().unwrap(), team);
        }
        assert!("Vampire".parse::<Team>().is_err());

        let json = serde_json::to_string(&Team::VillageWerewolf).unwrap();
        assert_eq!(json, "\"Village/Werewolf\"");
    }

    #[test]
    fn test_role_input_validation() {
        let input = RoleInput {
            name: String::new(),
            description: None,
            team: Team::Villager,
            score: 1,
        };
        assert!(input.validate().is_err());

        let input = RoleInput {
            name: "Seer".to_string(),
            ..input
        };
        assert!(input.validate().is_ok());

        let input = RoleInput {
            name: "x".repeat(101),
            ..input
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_role_score_bounds() {
        let input = RoleInput {
            name: "Cursed".to_string(),
            description: None,
            team: Team::Villager,
            score: MIN_SCORE,
        };
        assert!(input.validate().is_ok());

        assert!(RoleInput { score: MAX_SCORE + 1, ..input.clone() }.validate().is_err());
        assert!(RoleInput { score: i32::MIN, ..input }.validate().is_err());
    }
}

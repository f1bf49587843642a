use crate::role::{Role, Team};
use serde::{Deserialize, Serialize};

/// 分数高于该值视为狼人占优
const WEREWOLF_HEAVY_THRESHOLD: i64 = 5;
/// 分数低于该值视为村民占优
const VILLAGER_HEAVY_THRESHOLD: i64 = -5;

/// 平衡状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    #[serde(rename = "Werewolf Heavy")]
    WerewolfHeavy,
    #[serde(rename = "Villager Heavy")]
    VillagerHeavy,
    Balanced,
}

impl BalanceStatus {
    pub fn from_score(total_score: i64) -> Self {
        if total_score > WEREWOLF_HEAVY_THRESHOLD {
            BalanceStatus::WerewolfHeavy
        } else if total_score < VILLAGER_HEAVY_THRESHOLD {
            BalanceStatus::VillagerHeavy
        } else {
            BalanceStatus::Balanced
        }
    }
}

/// 各阵营人数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDistribution {
    #[serde(rename = "Villager")]
    pub villager: i64,
    #[serde(rename = "Werewolf")]
    pub werewolf: i64,
    #[serde(rename = "Village/Werewolf")]
    pub village_werewolf: i64,
    #[serde(rename = "Neutral")]
    pub neutral: i64,
}

impl TeamDistribution {
    fn add(&mut self, team: Team, quantity: i64) {
        let slot = match team {
            Team::Villager => &mut self.villager,
            Team::Werewolf => &mut self.werewolf,
            Team::VillageWerewolf => &mut self.village_werewolf,
            Team::Neutral => &mut self.neutral,
        };
        *slot = slot.saturating_add(quantity);
    }

    pub fn get(&self, team: Team) -> i64 {
        match team {
            Team::Villager => self.villager,
            Team::Werewolf => self.werewolf,
            Team::VillageWerewolf => self.village_werewolf,
            Team::Neutral => self.neutral,
        }
    }
}

/// Deck平衡统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckBalance {
    pub total_players: i64,
    pub total_score: i64,
    pub team_distribution: TeamDistribution,
    pub status: BalanceStatus,
}

impl DeckBalance {
    /// 根据 (角色, 数量) 计算平衡统计
    ///
    /// 累加使用i64并在溢出时饱和，已存储的异常数据不会导致panic。
    pub fn compute<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a Role, i32)>,
    {
        let mut total_players: i64 = 0;
        let mut total_score: i64 = 0;
        let mut team_distribution = TeamDistribution::default();

        for (role, quantity) in entries {
            let quantity = i64::from(quantity);
            total_players = total_players.saturating_add(quantity);
            total_score = total_score.saturating_add(i64::from(role.score) * quantity);
            team_distribution.add(role.team, quantity);
        }

        Self {
            total_players,
            total_score,
            team_distribution,
            status: BalanceStatus::from_score(total_score),
        }
    }
}

impl Default for DeckBalance {
    fn default() -> Self {
        Self::compute(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn role(id: i32, team: Team, score: i32) -> Role {
        Role {
            id,
            name: format!("role-{}", id),
            description: None,
            team,
            score,
            image_url: None,
            image_hash: None,
            is_official: false,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_deck_is_balanced() {
        let balance = DeckBalance::default();
        assert_eq!(balance.total_players, 0);
        assert_eq!(balance.total_score, 0);
        assert_eq!(balance.status, BalanceStatus::Balanced);
        assert_eq!(balance.team_distribution, TeamDistribution::default());
    }

    #[test]
    fn test_compute_aggregates_scores_and_teams() {
        let villager = role(1, Team::Villager, 1);
        let werewolf = role(2, Team::Werewolf, -6);
        let tanner = role(3, Team::Neutral, -2);

        let balance = DeckBalance::compute(vec![
            (&villager, 5),
            (&werewolf, 2),
            (&tanner, 1),
        ]);

        assert_eq!(balance.total_players, 8);
        assert_eq!(balance.total_score, 5 - 12 - 2);
        assert_eq!(balance.team_distribution.get(Team::Villager), 5);
        assert_eq!(balance.team_distribution.get(Team::Werewolf), 2);
        assert_eq!(balance.team_distribution.get(Team::Neutral), 1);
        assert_eq!(balance.team_distribution.get(Team::VillageWerewolf), 0);
        assert_eq!(balance.status, BalanceStatus::VillagerHeavy);
    }

    #[test]
    fn test_status_thresholds_are_exclusive() {
        assert_eq!(BalanceStatus::from_score(5), BalanceStatus::Balanced);
        assert_eq!(BalanceStatus::from_score(6), BalanceStatus::WerewolfHeavy);
        assert_eq!(BalanceStatus::from_score(-5), BalanceStatus::Balanced);
        assert_eq!(BalanceStatus::from_score(-6), BalanceStatus::VillagerHeavy);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let alpha = role(1, Team::Werewolf, i32::MAX);
        let balance = DeckBalance::compute(vec![(&alpha, i32::MAX), (&alpha, i32::MAX)]);

        assert_eq!(balance.total_players, 2 * i64::from(i32::MAX));
        assert_eq!(balance.team_distribution.get(Team::Werewolf), 2 * i64::from(i32::MAX));
        assert!(balance.total_score > 0);
        assert_eq!(balance.status, BalanceStatus::WerewolfHeavy);

        let doom = role(2, Team::Villager, i32::MIN);
        let balance = DeckBalance::compute(vec![(&doom, i32::MAX)]);
        assert_eq!(balance.status, BalanceStatus::VillagerHeavy);
    }

    #[test]
    fn test_distribution_serializes_all_teams() {
        let json = serde_json::to_value(DeckBalance::default()).unwrap();
        let distribution = &json["team_distribution"];
        assert_eq!(distribution["Village/Werewolf"], 0);
        assert_eq!(distribution["Neutral"], 0);
        assert_eq!(json["status"], "Balanced");
    }
}

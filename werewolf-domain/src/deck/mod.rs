pub mod balance;

pub use balance::{DeckBalance, BalanceStatus, TeamDistribution};

use crate::role::Role;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use validator::Validate;

/// Deck实体（一局游戏的角色组合）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: i32,
    pub name: String,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<DeckEntry>,
    pub balance: DeckBalance,
}

/// Deck中的一项：角色及其数量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckEntry {
    pub role_id: i32,
    pub quantity: i32,
    pub role: Role,
}

/// 创建/更新Deck请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeckRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// 更新时为None表示保留原有条目
    #[serde(default)]
    #[validate(nested)]
    pub roles: Option<Vec<DeckRoleRequest>>,
}

/// 单个角色在一副Deck中的数量上限
pub const MAX_QUANTITY: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeckRoleRequest {
    pub role_id: i32,
    #[validate(range(min = 1, max = MAX_QUANTITY))]
    pub quantity: i32,
}

/// 合并同一角色的多个条目（数量相加），保持首次出现的顺序
///
/// 合并后的数量同样不能超过 [`MAX_QUANTITY`]。
pub fn merge_entries(entries: &[DeckRoleRequest]) -> Result<Vec<DeckRoleRequest>, String> {
    let mut merged: Vec<DeckRoleRequest> = Vec::with_capacity(entries.len());
    for entry in entries {
        let index = match merged.iter().position(|e| e.role_id == entry.role_id) {
            Some(index) => index,
            None => {
                merged.push(DeckRoleRequest { quantity: 0, ..*entry });
                merged.len() - 1
            }
        };
        let slot = &mut merged[index];
        slot.quantity = slot
            .quantity
            .checked_add(entry.quantity)
            .filter(|q| (1..=MAX_QUANTITY).contains(q))
            .ok_or_else(|| format!("Quantity for role {} must be between 1 and {}", entry.role_id, MAX_QUANTITY))?;
    }
    Ok(merged)
}

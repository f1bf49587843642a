use crate::error::ServiceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use validator::Validate;
use werewolf_domain::deck::merge_entries;
use werewolf_domain::{Deck, DeckBalance, DeckRequest, DeckRoleRequest, Role};
use werewolf_infra::database::{DeckRepository, RoleRepository};

/// Deck服务trait，所有操作限定在所有者范围内
#[async_trait]
pub trait DeckService: Send + Sync {
    async fn list(&self, owner_id: i32) -> Result<Vec<Deck>, ServiceError>;

    async fn get(&self, id: i32, owner_id: i32) -> Result<Deck, ServiceError>;

    async fn create(&self, owner_id: i32, request: DeckRequest) -> Result<Deck, ServiceError>;

    /// `roles` 存在时整体替换条目
    async fn update(&self, id: i32, owner_id: i32, request: DeckRequest) -> Result<Deck, ServiceError>;

    async fn delete(&self, id: i32, owner_id: i32) -> Result<(), ServiceError>;

    /// 计算未保存组合的平衡统计
    async fn preview(&self, entries: &[DeckRoleRequest]) -> Result<DeckBalance, ServiceError>;
}

pub struct DefaultDeckService {
    decks: Arc<dyn DeckRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl DefaultDeckService {
    pub fn new(decks: Arc<dyn DeckRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { decks, roles }
    }

    /// 校验数量、合并同一角色的条目，并确认所有角色存在
    async fn resolve(&self, entries: &[DeckRoleRequest]) -> Result<(Vec<DeckRoleRequest>, HashMap<i32, Role>), ServiceError> {
        for entry in entries {
            entry.validate()?;
        }
        let merged = merge_entries(entries).map_err(ServiceError::Validation)?;

        let ids: Vec<i32> = merged.iter().map(|e| e.role_id).collect();
        let roles: HashMap<i32, Role> = self
            .roles
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        if let Some(missing) = ids.iter().find(|id| !roles.contains_key(id)) {
            return Err(ServiceError::Validation(format!("Unknown role id: {}", missing)));
        }
        Ok((merged, roles))
    }
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Deck {} not found", id))
}

#[async_trait]
impl DeckService for DefaultDeckService {
    async fn list(&self, owner_id: i32) -> Result<Vec<Deck>, ServiceError> {
        Ok(self.decks.list_by_owner(owner_id).await?)
    }

    async fn get(&self, id: i32, owner_id: i32) -> Result<Deck, ServiceError> {
        self.decks.find(id, owner_id).await?.ok_or_else(|| not_found(id))
    }

    async fn create(&self, owner_id: i32, request: DeckRequest) -> Result<Deck, ServiceError> {
        request.validate()?;
        let (entries, _) = self.resolve(request.roles.as_deref().unwrap_or_default()).await?;

        let deck = self.decks.create(&request.name, owner_id, &entries).await?;
        info!("User {} created deck {} with {} players", owner_id, deck.id, deck.balance.total_players);
        Ok(deck)
    }

    async fn update(&self, id: i32, owner_id: i32, request: DeckRequest) -> Result<Deck, ServiceError> {
        request.validate()?;
        let entries = match request.roles.as_deref() {
            Some(entries) => Some(self.resolve(entries).await?.0),
            None => None,
        };

        self.decks
            .update(id, owner_id, &request.name, entries.as_deref())
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i32, owner_id: i32) -> Result<(), ServiceError> {
        if !self.decks.delete(id, owner_id).await? {
            return Err(not_found(id));
        }
        info!("User {} deleted deck {}", owner_id, id);
        Ok(())
    }

    async fn preview(&self, entries: &[DeckRoleRequest]) -> Result<DeckBalance, ServiceError> {
        let (merged, roles) = self.resolve(entries).await?;
        Ok(DeckBalance::compute(
            merged.iter().filter_map(|e| roles.get(&e.role_id).map(|r| (r, e.quantity))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;
    use werewolf_domain::{BalanceStatus, RoleInput, Team};
    use werewolf_infra::database::{
        DatabaseManager, SeaOrmDeckRepository, SeaOrmRoleRepository, SeaOrmUserRepository, UserRepository,
    };
    use werewolf_migration::{Migrator, MigratorTrait};

    struct Fixture {
        service: DefaultDeckService,
        owner: i32,
        other: i32,
        villager: Role,
        werewolf: Role,
    }

    async fn fixture() -> Fixture {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let manager = DatabaseManager::from_connection(db);

        let users = SeaOrmUserRepository::new(manager.primary_db());
        let owner = users.insert("mod", "mod@example.com", "x").await.unwrap().id;
        let other = users.insert("guest", "guest@example.com", "x").await.unwrap().id;

        let roles = Arc::new(SeaOrmRoleRepository::new(manager.primary_db()));
        let role = |name: &str, team, score| RoleInput {
            name: name.to_string(),
            description: None,
            team,
            score,
        };
        let villager = roles.insert(&role("Villager", Team::Villager, 1), None, None).await.unwrap();
        let werewolf = roles.insert(&role("Werewolf", Team::Werewolf, -6), None, None).await.unwrap();

        Fixture {
            service: DefaultDeckService::new(Arc::new(SeaOrmDeckRepository::new(manager.primary_db())), roles),
            owner,
            other,
            villager,
            werewolf,
        }
    }

    fn entry(role: &Role, quantity: i32) -> DeckRoleRequest {
        DeckRoleRequest { role_id: role.id, quantity }
    }

    #[tokio::test]
    async fn test_create_merges_duplicate_entries() {
        let f = fixture().await;

        let deck = f
            .service
            .create(f.owner, DeckRequest {
                name: "Village".to_string(),
                roles: Some(vec![entry(&f.villager, 3), entry(&f.werewolf, 1), entry(&f.villager, 2)]),
            })
            .await
            .unwrap();

        assert_eq!(deck.entries.len(), 2);
        let villagers = deck.entries.iter().find(|e| e.role_id == f.villager.id).unwrap();
        assert_eq!(villagers.quantity, 5);
        assert_eq!(deck.balance.total_players, 6);
        assert_eq!(deck.balance.total_score, 5 - 6);
        assert_eq!(deck.balance.status, BalanceStatus::Balanced);
    }

    #[tokio::test]
    async fn test_unknown_role_and_zero_quantity_are_rejected() {
        let f = fixture().await;

        let err = f
            .service
            .create(f.owner, DeckRequest {
                name: "Broken".to_string(),
                roles: Some(vec![DeckRoleRequest { role_id: 999, quantity: 1 }]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("999")));

        let err = f.service.preview(&[entry(&f.villager, 0)]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(f.service.list(f.owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_quantities_are_rejected() {
        let f = fixture().await;

        let err = f
            .service
            .preview(&[entry(&f.villager, i32::MAX), entry(&f.villager, i32::MAX)])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = f
            .service
            .create(f.owner, DeckRequest {
                name: "Crowd".to_string(),
                roles: Some(vec![entry(&f.werewolf, 60), entry(&f.werewolf, 60)]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("between 1 and 100")));
        assert!(f.service.list(f.owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decks_are_private_to_owner() {
        let f = fixture().await;

        let deck = f
            .service
            .create(f.owner, DeckRequest { name: "Mine".to_string(), roles: None })
            .await
            .unwrap();

        assert!(matches!(f.service.get(deck.id, f.other).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.service.delete(deck.id, f.other).await, Err(ServiceError::NotFound(_))));
        let rename = DeckRequest { name: "Theirs".to_string(), roles: None };
        assert!(matches!(f.service.update(deck.id, f.other, rename).await, Err(ServiceError::NotFound(_))));

        f.service.delete(deck.id, f.owner).await.unwrap();
        assert!(f.service.list(f.owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_entries_only_when_given() {
        let f = fixture().await;

        let deck = f
            .service
            .create(f.owner, DeckRequest {
                name: "Wolves".to_string(),
                roles: Some(vec![entry(&f.werewolf, 2)]),
            })
            .await
            .unwrap();

        let renamed = f
            .service
            .update(deck.id, f.owner, DeckRequest { name: "Pack".to_string(), roles: None })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Pack");
        assert_eq!(renamed.balance.total_players, 2);
        assert_eq!(renamed.balance.status, BalanceStatus::VillagerHeavy);

        let replaced = f
            .service
            .update(deck.id, f.owner, DeckRequest {
                name: "Pack".to_string(),
                roles: Some(vec![entry(&f.villager, 8)]),
            })
            .await
            .unwrap();
        assert_eq!(replaced.entries.len(), 1);
        assert_eq!(replaced.balance.total_score, 8);
        assert_eq!(replaced.balance.status, BalanceStatus::WerewolfHeavy);
    }

    #[tokio::test]
    async fn test_preview_does_not_persist() {
        let f = fixture().await;

        let balance = f
            .service
            .preview(&[entry(&f.villager, 4), entry(&f.werewolf, 2)])
            .await
            .unwrap();
        assert_eq!(balance.total_players, 6);
        assert_eq!(balance.team_distribution.get(Team::Werewolf), 2);
        assert_eq!(balance.team_distribution.get(Team::Neutral), 0);
        assert!(f.service.list(f.owner).await.unwrap().is_empty());
    }
}

use crate::database::entities::{deck, deck_role, role};
use werewolf_domain::{Deck, DeckBalance, DeckEntry, DeckRoleRequest, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

/// DeckRepository trait 定义Deck的数据访问操作
///
/// 所有操作都限定在所有者范围内。
#[async_trait]
pub trait DeckRepository: Send + Sync {
    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Deck>, DbErr>;

    async fn find(&self, id: i32, owner_id: i32) -> Result<Option<Deck>, DbErr>;

    async fn create(&self, name: &str, owner_id: i32, entries: &[DeckRoleRequest]) -> Result<Deck, DbErr>;

    /// `entries` 为Some时整体替换条目
    async fn update(
        &self,
        id: i32,
        owner_id: i32,
        name: &str,
        entries: Option<&[DeckRoleRequest]>,
    ) -> Result<Option<Deck>, DbErr>;

    async fn delete(&self, id: i32, owner_id: i32) -> Result<bool, DbErr>;
}

pub struct SeaOrmDeckRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDeckRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32, owner_id: i32) -> Result<Option<deck::Model>, DbErr> {
        deck::Entity::find_by_id(id)
            .filter(deck::Column::CreatedBy.eq(owner_id))
            .one(&*self.db)
            .await
    }

    /// 加载条目与角色并计算平衡统计
    async fn assemble(&self, decks: Vec<deck::Model>) -> Result<Vec<Deck>, DbErr> {
        if decks.is_empty() {
            return Ok(Vec::new());
        }

        let deck_ids: Vec<i32> = decks.iter().map(|d| d.id).collect();
        let deck_roles = deck_role::Entity::find()
            .filter(deck_role::Column::DeckId.is_in(deck_ids))
            .order_by_asc(deck_role::Column::Id)
            .all(&*self.db)
            .await?;

        let mut role_ids: Vec<i32> = deck_roles.iter().map(|dr| dr.role_id).collect();
        role_ids.sort_unstable();
        role_ids.dedup();

        let roles: HashMap<i32, Role> = if role_ids.is_empty() {
            HashMap::new()
        } else {
            role::Entity::find()
                .filter(role::Column::Id.is_in(role_ids))
                .all(&*self.db)
                .await?
                .into_iter()
                .map(|model| Role::try_from(model).map(|r| (r.id, r)))
                .collect::<Result<_, _>>()?
        };

        let mut entries_by_deck: HashMap<i32, Vec<DeckEntry>> = HashMap::new();
        for dr in deck_roles {
            if let Some(role) = roles.get(&dr.role_id) {
                entries_by_deck.entry(dr.deck_id).or_default().push(DeckEntry {
                    role_id: dr.role_id,
                    quantity: dr.quantity,
                    role: role.clone(),
                });
            }
        }

        Ok(decks
            .into_iter()
            .map(|model| {
                let entries = entries_by_deck.remove(&model.id).unwrap_or_default();
                let balance = DeckBalance::compute(entries.iter().map(|e| (&e.role, e.quantity)));
                Deck {
                    id: model.id,
                    name: model.name,
                    created_by: model.created_by,
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                    entries,
                    balance,
                }
            })
            .collect())
    }

    async fn assemble_one(&self, model: deck::Model) -> Result<Deck, DbErr> {
        let id = model.id;
        self.assemble(vec![model])
            .await?
            .pop()
            .ok_or_else(|| DbErr::RecordNotFound(format!("deck {}", id)))
    }
}

async fn insert_entries<C: ConnectionTrait>(
    conn: &C,
    deck_id: i32,
    entries: &[DeckRoleRequest],
) -> Result<(), DbErr> {
    if entries.is_empty() {
        return Ok(());
    }

    let models = entries.iter().map(|entry| deck_role::ActiveModel {
        deck_id: Set(deck_id),
        role_id: Set(entry.role_id),
        quantity: Set(entry.quantity),
        ..Default::default()
    });

    deck_role::Entity::insert_many(models).exec(conn).await?;
    Ok(())
}

#[async_trait]
impl DeckRepository for SeaOrmDeckRepository {
    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Deck>, DbErr> {
        let decks = deck::Entity::find()
            .filter(deck::Column::CreatedBy.eq(owner_id))
            .order_by_desc(deck::Column::CreatedAt)
            .order_by_desc(deck::Column::Id)
            .all(&*self.db)
            .await?;
        self.assemble(decks).await
    }

    async fn find(&self, id: i32, owner_id: i32) -> Result<Option<Deck>, DbErr> {
        match self.find_model(id, owner_id).await? {
            Some(model) => self.assemble_one(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, name: &str, owner_id: i32, entries: &[DeckRoleRequest]) -> Result<Deck, DbErr> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let model = deck::ActiveModel {
            name: Set(name.to_string()),
            created_by: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        insert_entries(&txn, model.id, entries).await?;

        txn.commit().await?;
        self.assemble_one(model).await
    }

    async fn update(
        &self,
        id: i32,
        owner_id: i32,
        name: &str,
        entries: Option<&[DeckRoleRequest]>,
    ) -> Result<Option<Deck>, DbErr> {
        let Some(model) = self.find_model(id, owner_id).await? else {
            return Ok(None);
        };

        let txn = self.db.begin().await?;

        let mut active_model: deck::ActiveModel = model.into();
        active_model.name = Set(name.to_string());
        active_model.updated_at = Set(Utc::now());
        let model = active_model.update(&txn).await?;

        if let Some(entries) = entries {
            deck_role::Entity::delete_many()
                .filter(deck_role::Column::DeckId.eq(id))
                .exec(&txn)
                .await?;
            insert_entries(&txn, id, entries).await?;
        }

        txn.commit().await?;
        self.assemble_one(model).await.map(Some)
    }

    async fn delete(&self, id: i32, owner_id: i32) -> Result<bool, DbErr> {
        if self.find_model(id, owner_id).await?.is_none() {
            return Ok(false);
        }

        let txn = self.db.begin().await?;
        deck_role::Entity::delete_many()
            .filter(deck_role::Column::DeckId.eq(id))
            .exec(&txn)
            .await?;
        deck::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(true)
    }
}

//! SeaORM-backed implementation of both persistence ports.
//!
//! Generic over `C: ConnectionTrait`, so it can wrap a `DatabaseConnection`
//! or a transaction. One instance serves passports, devices and renovations
//! so the foreign keys between them are enforced by the same store.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use sea_orm::sea_query::LikeExpr;

use crate::contract::model::{Device, NewPassport, NewRenovation, Passport, PassportId, Renovation};
use crate::domain::repo::{DeleteOutcome, DevicesRepository, InsertOutcome, PassportsRepository};
use crate::infra::storage::entity::{device, passport, renovation};
use crate::infra::storage::{errors, mapper};

pub struct SeaOrmRegistryRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmRegistryRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// `LIKE` pattern matching `term` literally anywhere in the column.
fn contains_literal(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

fn to_passports(rows: Vec<passport::Model>) -> anyhow::Result<Vec<Passport>> {
    rows.into_iter().map(Passport::try_from).collect()
}

#[async_trait::async_trait]
impl<C> PassportsRepository for SeaOrmRegistryRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: PassportId) -> anyhow::Result<Option<Passport>> {
        let found = passport::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find passport by id failed")?;
        found.map(Passport::try_from).transpose()
    }

    async fn find_by_prefixes(&self, prefixes: &[String]) -> anyhow::Result<Vec<Passport>> {
        if prefixes.is_empty() {
            return Ok(Vec::new());
        }
        let rows = passport::Entity::find()
            .filter(passport::Column::SerialPrefix.is_in(prefixes.iter().cloned()))
            .order_by_asc(passport::Column::Id)
            .all(&self.conn)
            .await
            .context("find passports by prefixes failed")?;
        to_passports(rows)
    }

    async fn find_overlapping(
        &self,
        prefix: &str,
        from: i64,
        to: i64,
    ) -> anyhow::Result<Vec<Passport>> {
        let rows = passport::Entity::find()
            .filter(passport::Column::SerialPrefix.eq(prefix))
            .filter(passport::Column::FromSerialNumber.lte(to))
            .filter(passport::Column::ToSerialNumber.gte(from))
            .order_by_asc(passport::Column::Id)
            .all(&self.conn)
            .await
            .context("find overlapping passports failed")?;
        to_passports(rows)
    }

    async fn list(&self, offset: u64, limit: u64) -> anyhow::Result<(Vec<Passport>, u64)> {
        let total = passport::Entity::find()
            .count(&self.conn)
            .await
            .context("count passports failed")?;
        let rows = passport::Entity::find()
            .order_by_asc(passport::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("list passports failed")?;
        Ok((to_passports(rows)?, total))
    }

    async fn insert(&self, p: NewPassport) -> anyhow::Result<Passport> {
        let stored = mapper::new_passport_am(p)?
            .insert(&self.conn)
            .await
            .context("insert passport failed")?;
        Passport::try_from(stored)
    }

    async fn update(&self, p: Passport) -> anyhow::Result<()> {
        let _ = mapper::passport_am(p)?
            .update(&self.conn)
            .await
            .context("update passport failed")?;
        Ok(())
    }

    async fn delete(&self, id: PassportId) -> anyhow::Result<DeleteOutcome> {
        match passport::Entity::delete_by_id(id).exec(&self.conn).await {
            Ok(res) if res.rows_affected > 0 => Ok(DeleteOutcome::Deleted),
            Ok(_) => Ok(DeleteOutcome::NotFound),
            Err(e) if errors::is_foreign_key_violation(&e) => Ok(DeleteOutcome::Restricted),
            Err(e) => Err(e).context("delete passport failed"),
        }
    }
}

#[async_trait::async_trait]
impl<C> DevicesRepository for SeaOrmRegistryRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn exists(&self, serial: &str) -> anyhow::Result<bool> {
        let count = device::Entity::find()
            .filter(device::Column::SerialNumber.eq(serial))
            .count(&self.conn)
            .await
            .context("device exists failed")?;
        Ok(count > 0)
    }

    async fn find_by_serial(&self, serial: &str) -> anyhow::Result<Option<Device>> {
        let found = device::Entity::find_by_id(serial.to_owned())
            .one(&self.conn)
            .await
            .context("find device by serial failed")?;
        Ok(found.map(Into::into))
    }

    async fn list(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<(Vec<Device>, u64)> {
        let mut query = device::Entity::find();
        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(device::Column::SerialNumber.like(contains_literal(term)))
                    .add(device::Column::Comment.like(contains_literal(term))),
            );
        }

        let total = query
            .clone()
            .count(&self.conn)
            .await
            .context("count devices failed")?;
        let rows = query
            .order_by_asc(device::Column::SerialNumber)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("list devices failed")?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn insert(&self, d: Device) -> anyhow::Result<InsertOutcome> {
        match device::Entity::insert(mapper::device_am(d))
            .exec_without_returning(&self.conn)
            .await
        {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if errors::is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e).context("insert device failed"),
        }
    }

    async fn update(&self, d: Device) -> anyhow::Result<()> {
        let _ = mapper::device_am(d)
            .update(&self.conn)
            .await
            .context("update device failed")?;
        Ok(())
    }

    async fn delete(&self, serial: &str) -> anyhow::Result<DeleteOutcome> {
        match device::Entity::delete_by_id(serial.to_owned())
            .exec(&self.conn)
            .await
        {
            Ok(res) if res.rows_affected > 0 => Ok(DeleteOutcome::Deleted),
            Ok(_) => Ok(DeleteOutcome::NotFound),
            Err(e) if errors::is_foreign_key_violation(&e) => Ok(DeleteOutcome::Restricted),
            Err(e) => Err(e).context("delete device failed"),
        }
    }

    async fn add_renovation(&self, r: NewRenovation) -> anyhow::Result<Renovation> {
        let stored = mapper::new_renovation_am(r)
            .insert(&self.conn)
            .await
            .context("insert renovation failed")?;
        Ok(stored.into())
    }

    async fn list_renovations(&self, serial: &str) -> anyhow::Result<Vec<Renovation>> {
        let rows = renovation::Entity::find()
            .filter(renovation::Column::SerialNumber.eq(serial))
            .order_by_asc(renovation::Column::RenovationDate)
            .order_by_asc(renovation::Column::Id)
            .all(&self.conn)
            .await
            .context("list renovations failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

use async_trait::async_trait;

use crate::contract::model::{Device, NewPassport, NewRenovation, Passport, PassportId, Renovation};

/// Result of an insert that may hit an existing primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Result of a delete by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Storage refused because other rows still reference the record.
    Restricted,
}

/// Port for passport persistence. Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait PassportsRepository: Send + Sync {
    async fn find_by_id(&self, id: PassportId) -> anyhow::Result<Option<Passport>>;
    /// Passports whose prefix equals one of `prefixes`, ordered by id.
    async fn find_by_prefixes(&self, prefixes: &[String]) -> anyhow::Result<Vec<Passport>>;
    /// Passports under `prefix` whose stored range intersects `[from, to]`.
    async fn find_overlapping(
        &self,
        prefix: &str,
        from: i64,
        to: i64,
    ) -> anyhow::Result<Vec<Passport>>;
    /// One window of passports ordered by id, plus the total count.
    async fn list(&self, offset: u64, limit: u64) -> anyhow::Result<(Vec<Passport>, u64)>;
    /// Insert and return the stored passport with its assigned id.
    async fn insert(&self, p: NewPassport) -> anyhow::Result<Passport>;
    /// Overwrite every field of the passport with id `p.id`.
    async fn update(&self, p: Passport) -> anyhow::Result<()>;
    async fn delete(&self, id: PassportId) -> anyhow::Result<DeleteOutcome>;
}

/// Port for device and service-history persistence.
#[async_trait]
pub trait DevicesRepository: Send + Sync {
    async fn exists(&self, serial: &str) -> anyhow::Result<bool>;
    async fn find_by_serial(&self, serial: &str) -> anyhow::Result<Option<Device>>;
    /// One window of devices ordered by serial number, plus the total count.
    /// `search` keeps devices whose serial number or comment contains it.
    async fn list(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<(Vec<Device>, u64)>;
    /// Single-row insert; an existing serial number yields `Duplicate`.
    async fn insert(&self, d: Device) -> anyhow::Result<InsertOutcome>;
    async fn update(&self, d: Device) -> anyhow::Result<()>;
    async fn delete(&self, serial: &str) -> anyhow::Result<DeleteOutcome>;
    async fn add_renovation(&self, r: NewRenovation) -> anyhow::Result<Renovation>;
    /// Renovations of one device, oldest first.
    async fn list_renovations(&self, serial: &str) -> anyhow::Result<Vec<Renovation>>;
}

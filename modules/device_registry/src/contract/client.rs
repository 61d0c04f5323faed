use async_trait::async_trait;
use chrono::NaiveDate;

use crate::contract::{
    error::DeviceRegistryError,
    model::{
        Device, DevicePatch, NewDevice, NewPassport, NewRenovation, Page, PageRequest, Passport,
        PassportId, PassportPatch, Renovation,
    },
};

/// Public API of the device registry that other crates use.
#[async_trait]
pub trait DeviceRegistryApi: Send + Sync {
    // --- serial resolution and warranty ---

    /// Find the passport whose prefix and range govern `serial`.
    async fn resolve_passport(&self, serial: &str) -> Result<Passport, DeviceRegistryError>;

    /// Passports whose prefix is a leading part of `serial`, before range matching.
    async fn passports_for_serial(&self, serial: &str)
        -> Result<Vec<Passport>, DeviceRegistryError>;

    /// Fail with `AlreadyExists` if `[from, to]` under `prefix` overlaps a stored
    /// passport other than `exclude_id`.
    async fn validate_passport_range(
        &self,
        prefix: &str,
        from: i64,
        to: i64,
        exclude_id: Option<PassportId>,
    ) -> Result<(), DeviceRegistryError>;

    fn compute_expiration(
        &self,
        purchase_date: NaiveDate,
        warranty_months: u32,
        has_owner: bool,
    ) -> NaiveDate;

    // --- passports ---

    async fn create_passport(&self, new_passport: NewPassport)
        -> Result<Passport, DeviceRegistryError>;

    async fn update_passport(
        &self,
        id: PassportId,
        patch: PassportPatch,
    ) -> Result<Passport, DeviceRegistryError>;

    async fn delete_passport(&self, id: PassportId) -> Result<(), DeviceRegistryError>;

    async fn get_passport(&self, id: PassportId) -> Result<Passport, DeviceRegistryError>;

    async fn list_passports(&self, page: PageRequest)
        -> Result<Page<Passport>, DeviceRegistryError>;

    // --- devices ---

    async fn register_device(&self, new_device: NewDevice) -> Result<Device, DeviceRegistryError>;

    async fn get_device(&self, serial: &str) -> Result<Device, DeviceRegistryError>;

    async fn list_devices(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Device>, DeviceRegistryError>;

    async fn update_device(
        &self,
        serial: &str,
        patch: DevicePatch,
    ) -> Result<Device, DeviceRegistryError>;

    async fn delete_device(&self, serial: &str) -> Result<(), DeviceRegistryError>;

    // --- service history ---

    async fn add_renovation(
        &self,
        new_renovation: NewRenovation,
    ) -> Result<Renovation, DeviceRegistryError>;

    async fn list_renovations(&self, serial: &str)
        -> Result<Vec<Renovation>, DeviceRegistryError>;
}

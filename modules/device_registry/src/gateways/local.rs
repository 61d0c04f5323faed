use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::contract::{
    client::DeviceRegistryApi,
    error::DeviceRegistryError,
    model::{
        Device, DevicePatch, NewDevice, NewPassport, NewRenovation, Page, PageRequest, Passport,
        PassportId, PassportPatch, Renovation,
    },
};
use crate::domain::service::Service;

/// In-process implementation of `DeviceRegistryApi` that delegates to the domain service
pub struct DeviceRegistryLocalClient {
    service: Arc<Service>,
}

impl DeviceRegistryLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DeviceRegistryApi for DeviceRegistryLocalClient {
    async fn resolve_passport(&self, serial: &str) -> Result<Passport, DeviceRegistryError> {
        self.service.resolve_passport(serial).await.map_err(Into::into)
    }

    async fn passports_for_serial(
        &self,
        serial: &str,
    ) -> Result<Vec<Passport>, DeviceRegistryError> {
        self.service
            .passports_for_serial(serial)
            .await
            .map_err(Into::into)
    }

    async fn validate_passport_range(
        &self,
        prefix: &str,
        from: i64,
        to: i64,
        exclude_id: Option<PassportId>,
    ) -> Result<(), DeviceRegistryError> {
        self.service
            .validate_passport_range(prefix, from, to, exclude_id)
            .await
            .map_err(Into::into)
    }

    fn compute_expiration(
        &self,
        purchase_date: NaiveDate,
        warranty_months: u32,
        has_owner: bool,
    ) -> NaiveDate {
        self.service
            .compute_expiration(purchase_date, warranty_months, has_owner)
    }

    async fn create_passport(
        &self,
        new_passport: NewPassport,
    ) -> Result<Passport, DeviceRegistryError> {
        self.service
            .create_passport(new_passport)
            .await
            .map_err(Into::into)
    }

    async fn update_passport(
        &self,
        id: PassportId,
        patch: PassportPatch,
    ) -> Result<Passport, DeviceRegistryError> {
        self.service
            .update_passport(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_passport(&self, id: PassportId) -> Result<(), DeviceRegistryError> {
        self.service.delete_passport(id).await.map_err(Into::into)
    }

    async fn get_passport(&self, id: PassportId) -> Result<Passport, DeviceRegistryError> {
        self.service.get_passport(id).await.map_err(Into::into)
    }

    async fn list_passports(
        &self,
        page: PageRequest,
    ) -> Result<Page<Passport>, DeviceRegistryError> {
        self.service.list_passports(page).await.map_err(Into::into)
    }

    async fn register_device(&self, new_device: NewDevice) -> Result<Device, DeviceRegistryError> {
        self.service
            .register_device(new_device)
            .await
            .map_err(Into::into)
    }

    async fn get_device(&self, serial: &str) -> Result<Device, DeviceRegistryError> {
        self.service.get_device(serial).await.map_err(Into::into)
    }

    async fn list_devices(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Device>, DeviceRegistryError> {
        self.service
            .list_devices(search, page)
            .await
            .map_err(Into::into)
    }

    async fn update_device(
        &self,
        serial: &str,
        patch: DevicePatch,
    ) -> Result<Device, DeviceRegistryError> {
        self.service
            .update_device(serial, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_device(&self, serial: &str) -> Result<(), DeviceRegistryError> {
        self.service.delete_device(serial).await.map_err(Into::into)
    }

    async fn add_renovation(
        &self,
        new_renovation: NewRenovation,
    ) -> Result<Renovation, DeviceRegistryError> {
        self.service
            .add_renovation(new_renovation)
            .await
            .map_err(Into::into)
    }

    async fn list_renovations(
        &self,
        serial: &str,
    ) -> Result<Vec<Renovation>, DeviceRegistryError> {
        self.service
            .list_renovations(serial)
            .await
            .map_err(Into::into)
    }
}

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{
    Device, DevicePatch, NewDevice, NewPassport, NewRenovation, Page, PageRequest, Passport,
    PassportId, PassportPatch, Renovation,
};
use crate::domain::error::DomainError;
use crate::domain::repo::{DeleteOutcome, DevicesRepository, InsertOutcome, PassportsRepository};
use crate::domain::{range, resolver, serial, warranty};

/// Domain service with the passport and device business rules.
/// Depends only on the repository ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    passports: Arc<dyn PassportsRepository>,
    devices: Arc<dyn DevicesRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_prefix_length: usize,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 100,
            max_prefix_length: 16,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl Service {
    pub fn new(
        passports: Arc<dyn PassportsRepository>,
        devices: Arc<dyn DevicesRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            passports,
            devices,
            config,
        }
    }

    // --- serial resolution ---

    /// Stored passports whose prefix is a leading part of `serial`.
    #[instrument(name = "device_registry.service.passports_for_serial", skip(self))]
    pub async fn passports_for_serial(&self, serial: &str) -> Result<Vec<Passport>, DomainError> {
        let prefixes = serial::leading_prefixes(serial, self.config.max_prefix_length);
        if prefixes.is_empty() {
            return Ok(Vec::new());
        }
        let candidates = self
            .passports
            .find_by_prefixes(&prefixes)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!("Found {} candidate passports", candidates.len());
        Ok(candidates)
    }

    #[instrument(name = "device_registry.service.resolve_passport", skip(self))]
    pub async fn resolve_passport(&self, serial: &str) -> Result<Passport, DomainError> {
        let candidates = self.passports_for_serial(serial).await?;
        let passport = resolver::resolve(serial, candidates)?;
        debug!(passport_id = passport.id, "Resolved passport");
        Ok(passport)
    }

    /// Fail if `[from, to]` under `prefix` overlaps a passport other than `exclude_id`.
    #[instrument(name = "device_registry.service.validate_passport_range", skip(self))]
    pub async fn validate_passport_range(
        &self,
        prefix: &str,
        from: i64,
        to: i64,
        exclude_id: Option<PassportId>,
    ) -> Result<(), DomainError> {
        self.validate_prefix(prefix)?;
        validate_range(from, to)?;

        let existing = self
            .passports
            .find_overlapping(prefix, from, to)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if let Some(conflict) = range::find_conflict(&existing, prefix, from, to, exclude_id) {
            debug!(conflicting_id = conflict.id, "Serial range already claimed");
            return Err(DomainError::serial_range_taken(prefix, from, to));
        }
        Ok(())
    }

    pub fn compute_expiration(
        &self,
        purchase_date: NaiveDate,
        warranty_months: u32,
        has_owner: bool,
    ) -> NaiveDate {
        warranty::compute_expiration(purchase_date, warranty_months, has_owner)
    }

    // --- passports ---

    #[instrument(name = "device_registry.service.get_passport", skip(self))]
    pub async fn get_passport(&self, id: PassportId) -> Result<Passport, DomainError> {
        self.passports
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::passport_not_found(id))
    }

    #[instrument(name = "device_registry.service.list_passports", skip(self))]
    pub async fn list_passports(
        &self,
        request: PageRequest,
    ) -> Result<Page<Passport>, DomainError> {
        let (page, size) = self.page_window(request);
        let (items, total) = self
            .passports
            .list((page - 1).saturating_mul(size), size)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!("Listed {} of {} passports", items.len(), total);
        Ok(Page::new(items, total, page, size))
    }

    #[instrument(
        name = "device_registry.service.create_passport",
        skip(self),
        fields(prefix = %new_passport.serial_prefix)
    )]
    pub async fn create_passport(
        &self,
        new_passport: NewPassport,
    ) -> Result<Passport, DomainError> {
        info!("Creating passport");

        self.validate_text("name", &new_passport.name)?;
        self.validate_text("model", &new_passport.model)?;
        self.validate_passport_range(
            &new_passport.serial_prefix,
            new_passport.from_serial_number,
            new_passport.to_serial_number,
            None,
        )
        .await?;

        let passport = self
            .passports
            .insert(new_passport)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created passport with id={}", passport.id);
        Ok(passport)
    }

    #[instrument(name = "device_registry.service.update_passport", skip(self))]
    pub async fn update_passport(
        &self,
        id: PassportId,
        patch: PassportPatch,
    ) -> Result<Passport, DomainError> {
        info!("Updating passport");

        let current = self.get_passport(id).await?;
        let updated = patch.merge_into(current);

        self.validate_text("name", &updated.name)?;
        self.validate_text("model", &updated.model)?;
        self.validate_passport_range(
            &updated.serial_prefix,
            updated.from_serial_number,
            updated.to_serial_number,
            Some(id),
        )
        .await?;

        self.passports
            .update(updated.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully updated passport");
        Ok(updated)
    }

    #[instrument(name = "device_registry.service.delete_passport", skip(self))]
    pub async fn delete_passport(&self, id: PassportId) -> Result<(), DomainError> {
        info!("Deleting passport");

        let outcome = self
            .passports
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        match outcome {
            DeleteOutcome::Deleted => {
                info!("Successfully deleted passport");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(DomainError::passport_not_found(id)),
            DeleteOutcome::Restricted => {
                warn!("Passport is still referenced by devices");
                Err(DomainError::passport_in_use(id))
            }
        }
    }

    // --- devices ---

    #[instrument(name = "device_registry.service.find_device", skip(self))]
    pub async fn find_device(&self, serial: &str) -> Result<Option<Device>, DomainError> {
        self.devices
            .find_by_serial(serial)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "device_registry.service.get_device", skip(self))]
    pub async fn get_device(&self, serial: &str) -> Result<Device, DomainError> {
        self.find_device(serial)
            .await?
            .ok_or_else(|| DomainError::device_not_found(serial))
    }

    #[instrument(name = "device_registry.service.list_devices", skip(self))]
    pub async fn list_devices(
        &self,
        search: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<Device>, DomainError> {
        let (page, size) = self.page_window(request);
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let (items, total) = self
            .devices
            .list(search, (page - 1).saturating_mul(size), size)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!("Listed {} of {} devices", items.len(), total);
        Ok(Page::new(items, total, page, size))
    }

    /// Register a device under the passport its serial resolves to.
    /// Without an owner the device is anonymous and gets no warranty extension.
    #[instrument(
        name = "device_registry.service.register_device",
        skip(self),
        fields(serial = %new_device.serial_number, owned = new_device.owner_id.is_some())
    )]
    pub async fn register_device(&self, new_device: NewDevice) -> Result<Device, DomainError> {
        info!("Registering device");

        let serial = new_device.serial_number.as_str();
        if self
            .devices
            .exists(serial)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::device_already_registered(serial));
        }

        let passport = self.resolve_passport(serial).await?;
        let device = Device {
            serial_number: new_device.serial_number.clone(),
            passport_id: passport.id,
            purchase_date: new_device.purchase_date,
            owner_id: new_device.owner_id,
            comment: None,
            warranty_expiration_date: warranty::compute_expiration(
                new_device.purchase_date,
                passport.warranty_months,
                new_device.owner_id.is_some(),
            ),
        };

        match self
            .devices
            .insert(device.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            InsertOutcome::Inserted => {
                info!(
                    passport_id = passport.id,
                    "Successfully registered device, warranty until {}",
                    device.warranty_expiration_date
                );
                Ok(device)
            }
            // Lost a race with a concurrent registration of the same serial.
            InsertOutcome::Duplicate => {
                warn!("Device was registered concurrently");
                Err(DomainError::device_already_registered(serial))
            }
        }
    }

    #[instrument(name = "device_registry.service.update_device", skip(self))]
    pub async fn update_device(
        &self,
        serial: &str,
        patch: DevicePatch,
    ) -> Result<Device, DomainError> {
        info!("Updating device");

        let mut device = self.get_device(serial).await?;

        if let Some(purchase_date) = patch.purchase_date {
            device.purchase_date = purchase_date;
        }
        if let Some(comment) = patch.comment {
            device.comment = Some(comment);
        }
        if let Some(owner_id) = patch.owner_id {
            device.owner_id = owner_id;
        }

        let passport = self.get_passport(device.passport_id).await?;
        device.warranty_expiration_date = warranty::compute_expiration(
            device.purchase_date,
            passport.warranty_months,
            device.has_owner(),
        );

        self.devices
            .update(device.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully updated device");
        Ok(device)
    }

    #[instrument(name = "device_registry.service.delete_device", skip(self))]
    pub async fn delete_device(&self, serial: &str) -> Result<(), DomainError> {
        info!("Deleting device");

        let outcome = self
            .devices
            .delete(serial)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        match outcome {
            DeleteOutcome::Deleted => {
                info!("Successfully deleted device");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(DomainError::device_not_found(serial)),
            DeleteOutcome::Restricted => {
                warn!("Device still has service history");
                Err(DomainError::device_has_renovations(serial))
            }
        }
    }

    // --- service history ---

    #[instrument(
        name = "device_registry.service.add_renovation",
        skip(self),
        fields(serial = %new_renovation.serial_number)
    )]
    pub async fn add_renovation(
        &self,
        new_renovation: NewRenovation,
    ) -> Result<Renovation, DomainError> {
        self.validate_text("description", &new_renovation.description)?;
        self.ensure_registered(&new_renovation.serial_number).await?;

        let renovation = self
            .devices
            .add_renovation(new_renovation)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Recorded renovation id={}", renovation.id);
        Ok(renovation)
    }

    #[instrument(name = "device_registry.service.list_renovations", skip(self))]
    pub async fn list_renovations(&self, serial: &str) -> Result<Vec<Renovation>, DomainError> {
        self.ensure_registered(serial).await?;
        self.devices
            .list_renovations(serial)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    // --- helpers ---

    async fn ensure_registered(&self, serial: &str) -> Result<(), DomainError> {
        let exists = self
            .devices
            .exists(serial)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if exists {
            Ok(())
        } else {
            Err(DomainError::device_not_registered(serial))
        }
    }

    /// Normalized (page, size): page is 1-based, size is within `1..=max_page_size`.
    fn page_window(&self, request: PageRequest) -> (u64, u64) {
        let page = request.page.max(1);
        let size = request
            .size
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size.max(1));
        (page, size)
    }

    fn validate_text(&self, field: &str, value: &str) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::validation(field, "must not be empty"));
        }
        if value.chars().count() > self.config.max_name_length {
            return Err(DomainError::validation(
                field,
                format!("longer than {} characters", self.config.max_name_length),
            ));
        }
        Ok(())
    }

    fn validate_prefix(&self, prefix: &str) -> Result<(), DomainError> {
        if prefix.is_empty() {
            return Err(DomainError::validation("serial_prefix", "must not be empty"));
        }
        if prefix.len() > self.config.max_prefix_length {
            return Err(DomainError::validation(
                "serial_prefix",
                format!("longer than {} characters", self.config.max_prefix_length),
            ));
        }
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation(
                "serial_prefix",
                "only ASCII letters and digits are allowed",
            ));
        }
        Ok(())
    }
}

fn validate_range(from: i64, to: i64) -> Result<(), DomainError> {
    if from < 0 {
        return Err(DomainError::validation("from_serial_number", "must not be negative"));
    }
    if from > to {
        return Err(DomainError::validation(
            "to_serial_number",
            "must not be less than from_serial_number",
        ));
    }
    Ok(())
}

//! In-memory implementation of both repository ports for service-level tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use device_registry::contract::model::{
    Device, NewPassport, NewRenovation, Passport, PassportId, Renovation,
};
use device_registry::domain::repo::{
    DeleteOutcome, DevicesRepository, InsertOutcome, PassportsRepository,
};
use device_registry::domain::service::{Service, ServiceConfig};

#[derive(Default)]
struct State {
    next_id: i64,
    passports: BTreeMap<PassportId, Passport>,
    devices: BTreeMap<String, Device>,
    renovations: Vec<Renovation>,
    /// Stored by the next `exists` call after it answers, as a concurrent writer would.
    racing_device: Option<Device>,
}

#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    state: Arc<Mutex<State>>,
}

impl InMemoryRegistry {
    pub fn passports(&self) -> Vec<Passport> {
        self.state.lock().unwrap().passports.values().cloned().collect()
    }

    pub fn devices(&self) -> Vec<Device> {
        self.state.lock().unwrap().devices.values().cloned().collect()
    }

    /// Make `device` appear between the next existence check and the insert.
    pub fn insert_after_next_exists(&self, device: Device) {
        self.state.lock().unwrap().racing_device = Some(device);
    }

    pub fn service(&self) -> Service {
        Service::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            ServiceConfig::default(),
        )
    }
}

fn window<T: Clone>(items: Vec<T>, offset: u64, limit: u64) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let page = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    (page, total)
}

#[async_trait::async_trait]
impl PassportsRepository for InMemoryRegistry {
    async fn find_by_id(&self, id: PassportId) -> Result<Option<Passport>> {
        Ok(self.state.lock().unwrap().passports.get(&id).cloned())
    }

    async fn find_by_prefixes(&self, prefixes: &[String]) -> Result<Vec<Passport>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .passports
            .values()
            .filter(|p| prefixes.contains(&p.serial_prefix))
            .cloned()
            .collect())
    }

    async fn find_overlapping(&self, prefix: &str, from: i64, to: i64) -> Result<Vec<Passport>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .passports
            .values()
            .filter(|p| p.serial_prefix == prefix)
            .filter(|p| p.from_serial_number <= to && p.to_serial_number >= from)
            .cloned()
            .collect())
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<(Vec<Passport>, u64)> {
        Ok(window(self.passports(), offset, limit))
    }

    async fn insert(&self, p: NewPassport) -> Result<Passport> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let passport = Passport {
            id: state.next_id,
            name: p.name,
            model: p.model,
            serial_prefix: p.serial_prefix,
            from_serial_number: p.from_serial_number,
            to_serial_number: p.to_serial_number,
            warranty_months: p.warranty_months,
        };
        state.passports.insert(passport.id, passport.clone());
        Ok(passport)
    }

    async fn update(&self, p: Passport) -> Result<()> {
        self.state.lock().unwrap().passports.insert(p.id, p);
        Ok(())
    }

    async fn delete(&self, id: PassportId) -> Result<DeleteOutcome> {
        let mut state = self.state.lock().unwrap();
        if state.devices.values().any(|d| d.passport_id == id) {
            return Ok(DeleteOutcome::Restricted);
        }
        Ok(match state.passports.remove(&id) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::NotFound,
        })
    }
}

#[async_trait::async_trait]
impl DevicesRepository for InMemoryRegistry {
    async fn exists(&self, serial: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let found = state.devices.contains_key(serial);
        if let Some(racing) = state.racing_device.take() {
            state.devices.insert(racing.serial_number.clone(), racing);
        }
        Ok(found)
    }

    async fn find_by_serial(&self, serial: &str) -> Result<Option<Device>> {
        Ok(self.state.lock().unwrap().devices.get(serial).cloned())
    }

    async fn list(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Device>, u64)> {
        let state = self.state.lock().unwrap();
        let matching: Vec<Device> = state
            .devices
            .values()
            .filter(|d| match search {
                Some(term) => {
                    d.serial_number.contains(term)
                        || d.comment.as_deref().is_some_and(|c| c.contains(term))
                }
                None => true,
            })
            .cloned()
            .collect();
        Ok(window(matching, offset, limit))
    }

    async fn insert(&self, d: Device) -> Result<InsertOutcome> {
        let mut state = self.state.lock().unwrap();
        if state.devices.contains_key(&d.serial_number) {
            return Ok(InsertOutcome::Duplicate);
        }
        state.devices.insert(d.serial_number.clone(), d);
        Ok(InsertOutcome::Inserted)
    }

    async fn update(&self, d: Device) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .devices
            .insert(d.serial_number.clone(), d);
        Ok(())
    }

    async fn delete(&self, serial: &str) -> Result<DeleteOutcome> {
        let mut state = self.state.lock().unwrap();
        if state.renovations.iter().any(|r| r.serial_number == serial) {
            return Ok(DeleteOutcome::Restricted);
        }
        Ok(match state.devices.remove(serial) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::NotFound,
        })
    }

    async fn add_renovation(&self, r: NewRenovation) -> Result<Renovation> {
        let mut state = self.state.lock().unwrap();
        let renovation = Renovation {
            id: state.renovations.len() as i64 + 1,
            serial_number: r.serial_number,
            description: r.description,
            renovation_date: r.renovation_date,
        };
        state.renovations.push(renovation.clone());
        Ok(renovation)
    }

    async fn list_renovations(&self, serial: &str) -> Result<Vec<Renovation>> {
        let state = self.state.lock().unwrap();
        let mut found: Vec<Renovation> = state
            .renovations
            .iter()
            .filter(|r| r.serial_number == serial)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.renovation_date, r.id));
        Ok(found)
    }
}

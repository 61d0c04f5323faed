//! JSON views of contract models printed by the CLI.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use device_registry::contract::model::{Device, Page, Passport};

#[derive(Debug, Clone, Serialize)]
pub struct PassportDto {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub serial_prefix: String,
    pub from_serial_number: i64,
    pub to_serial_number: i64,
    pub warranty_months: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceDto {
    pub serial_number: String,
    pub passport_id: i64,
    pub purchase_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub warranty_expiration_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub size: u64,
}

impl From<Passport> for PassportDto {
    fn from(p: Passport) -> Self {
        Self {
            id: p.id,
            name: p.name,
            model: p.model,
            serial_prefix: p.serial_prefix,
            from_serial_number: p.from_serial_number,
            to_serial_number: p.to_serial_number,
            warranty_months: p.warranty_months,
        }
    }
}

impl From<Device> for DeviceDto {
    fn from(d: Device) -> Self {
        Self {
            serial_number: d.serial_number,
            passport_id: d.passport_id,
            purchase_date: d.purchase_date,
            owner_id: d.owner_id,
            comment: d.comment,
            warranty_expiration_date: d.warranty_expiration_date,
        }
    }
}

impl<T> PageDto<T> {
    pub fn from_page<M>(page: Page<M>) -> Self
    where
        T: From<M>,
    {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            total_items: page.total_items,
            total_pages: page.total_pages,
            current_page: page.current_page,
            size: page.size,
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

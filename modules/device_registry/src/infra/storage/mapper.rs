use anyhow::Context;
use sea_orm::{NotSet, Set};

use crate::contract::model::{Device, NewPassport, NewRenovation, Passport, Renovation};
use crate::infra::storage::entity::{device, passport, renovation};

impl TryFrom<passport::Model> for Passport {
    type Error = anyhow::Error;

    fn try_from(m: passport::Model) -> anyhow::Result<Self> {
        let warranty_months = u32::try_from(m.warranty_months)
            .with_context(|| format!("passport {} has negative warranty_months", m.id))?;
        Ok(Passport {
            id: m.id,
            name: m.name,
            model: m.model,
            serial_prefix: m.serial_prefix,
            from_serial_number: m.from_serial_number,
            to_serial_number: m.to_serial_number,
            warranty_months,
        })
    }
}

impl From<device::Model> for Device {
    fn from(m: device::Model) -> Self {
        Device {
            serial_number: m.serial_number,
            passport_id: m.passport_id,
            purchase_date: m.purchase_date,
            owner_id: m.owner_id,
            comment: m.comment,
            warranty_expiration_date: m.warranty_expiration_date,
        }
    }
}

impl From<renovation::Model> for Renovation {
    fn from(m: renovation::Model) -> Self {
        Renovation {
            id: m.id,
            serial_number: m.serial_number,
            description: m.description,
            renovation_date: m.renovation_date,
        }
    }
}

fn warranty_column(months: u32) -> anyhow::Result<i32> {
    i32::try_from(months).context("warranty_months does not fit the storage column")
}

/// Active model for a passport that has no id yet.
pub fn new_passport_am(p: NewPassport) -> anyhow::Result<passport::ActiveModel> {
    Ok(passport::ActiveModel {
        id: NotSet,
        name: Set(p.name),
        model: Set(p.model),
        serial_prefix: Set(p.serial_prefix),
        from_serial_number: Set(p.from_serial_number),
        to_serial_number: Set(p.to_serial_number),
        warranty_months: Set(warranty_column(p.warranty_months)?),
    })
}

pub fn passport_am(p: Passport) -> anyhow::Result<passport::ActiveModel> {
    Ok(passport::ActiveModel {
        id: Set(p.id),
        name: Set(p.name),
        model: Set(p.model),
        serial_prefix: Set(p.serial_prefix),
        from_serial_number: Set(p.from_serial_number),
        to_serial_number: Set(p.to_serial_number),
        warranty_months: Set(warranty_column(p.warranty_months)?),
    })
}

pub fn device_am(d: Device) -> device::ActiveModel {
    device::ActiveModel {
        serial_number: Set(d.serial_number),
        passport_id: Set(d.passport_id),
        purchase_date: Set(d.purchase_date),
        owner_id: Set(d.owner_id),
        comment: Set(d.comment),
        warranty_expiration_date: Set(d.warranty_expiration_date),
    }
}

pub fn new_renovation_am(r: NewRenovation) -> renovation::ActiveModel {
    renovation::ActiveModel {
        id: NotSet,
        serial_number: Set(r.serial_number),
        description: Set(r.description),
        renovation_date: Set(r.renovation_date),
    }
}

use chrono::NaiveDate;
use uuid::Uuid;

pub type PassportId = i64;

/// Product/warranty template that claims an inclusive serial range under a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passport {
    pub id: PassportId,
    pub name: String,
    pub model: String,
    pub serial_prefix: String,
    pub from_serial_number: i64,
    pub to_serial_number: i64,
    pub warranty_months: u32,
}

impl Passport {
    /// Whether `suffix` falls inside `[from_serial_number, to_serial_number]`.
    pub fn covers(&self, suffix: i64) -> bool {
        self.from_serial_number <= suffix && suffix <= self.to_serial_number
    }
}

/// Data for creating a new passport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassport {
    pub name: String,
    pub model: String,
    pub serial_prefix: String,
    pub from_serial_number: i64,
    pub to_serial_number: i64,
    pub warranty_months: u32,
}

/// Partial update data for a passport; `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PassportPatch {
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial_prefix: Option<String>,
    pub from_serial_number: Option<i64>,
    pub to_serial_number: Option<i64>,
    pub warranty_months: Option<u32>,
}

impl PassportPatch {
    /// Overlay the provided fields on `current`. The id never changes.
    pub fn merge_into(self, current: Passport) -> Passport {
        Passport {
            id: current.id,
            name: self.name.unwrap_or(current.name),
            model: self.model.unwrap_or(current.model),
            serial_prefix: self.serial_prefix.unwrap_or(current.serial_prefix),
            from_serial_number: self.from_serial_number.unwrap_or(current.from_serial_number),
            to_serial_number: self.to_serial_number.unwrap_or(current.to_serial_number),
            warranty_months: self.warranty_months.unwrap_or(current.warranty_months),
        }
    }
}

/// A physical unit, keyed by its serial number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub serial_number: String,
    pub passport_id: PassportId,
    pub purchase_date: NaiveDate,
    /// `None` for anonymous devices.
    pub owner_id: Option<Uuid>,
    pub comment: Option<String>,
    pub warranty_expiration_date: NaiveDate,
}

impl Device {
    pub fn has_owner(&self) -> bool {
        self.owner_id.is_some()
    }
}

/// Registration request. A device without `owner_id` is registered anonymously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub owner_id: Option<Uuid>,
}

/// Partial update data for a device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DevicePatch {
    pub purchase_date: Option<NaiveDate>,
    pub comment: Option<String>,
    /// `Some(None)` clears the owner, `Some(Some(id))` assigns one,
    /// `None` leaves ownership untouched.
    pub owner_id: Option<Option<Uuid>>,
}

/// Service-history entry for a registered device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renovation {
    pub id: i64,
    pub serial_number: String,
    pub description: String,
    pub renovation_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRenovation {
    pub serial_number: String,
    pub description: String,
    pub renovation_date: NaiveDate,
}

/// 1-based page selector. `size: None` uses the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: Option<u64>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: Some(size),
        }
    }
}

/// One page of a listing plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, current_page: u64, size: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_items.div_ceil(size)
        };
        Self {
            items,
            total_items,
            total_pages,
            current_page,
            size,
        }
    }
}

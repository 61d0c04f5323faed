pub mod client;
pub mod error;
pub mod model;

pub use client::DeviceRegistryApi;
pub use error::{DeviceRegistryError, ErrorKind};
pub use model::{
    Device, DevicePatch, NewDevice, NewPassport, NewRenovation, Page, PageRequest, Passport,
    PassportId, PassportPatch, Renovation,
};

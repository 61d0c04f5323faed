pub mod device;
pub mod passport;
pub mod renovation;

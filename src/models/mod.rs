//! Data models for skillswap.

mod account;
pub mod payment;
mod service;

pub use account::{Booking, BookingStatus, User};
pub use payment::{FeeSplit, PLATFORM_FEE_PERCENT, PaymentMethod};
pub use service::{CompactServiceEntry, ServiceCategory, ServiceId, ServiceRecord};

pub mod booking;
pub mod ledger;
pub mod slot_lock;
pub mod slot_policy;
pub mod supabase;

pub use booking::BookingService;
pub use ledger::{AppointmentLedger, InMemoryAppointmentLedger};
pub use slot_lock::SlotLocks;
pub use slot_policy::normalize_slot;
pub use supabase::SupabaseAppointmentLedger;

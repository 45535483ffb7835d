use std::sync::Arc;

use tracing::{info, warn};

use appointment_cell::services::{
    AppointmentLedger, BookingService, InMemoryAppointmentLedger, SupabaseAppointmentLedger,
};
use doctor_cell::services::{DoctorDirectory, InMemoryDoctorDirectory, SupabaseDoctorDirectory};
use patient_cell::services::{
    BlobStore, InMemoryBlobStore, InMemoryUserDirectory, ProfileService, SupabaseBlobStore,
    SupabaseUserDirectory, UserDirectory,
};
use payment_cell::models::PaymentError;
use payment_cell::services::{PaymentGateway, PaymentService, RazorpayGateway, SandboxGateway};
use shared_config::{AppConfig, PaymentBackend, StorageBackend};
use shared_database::SupabaseClient;

/// Storage collaborators shared by the services.
pub struct Stores {
    pub doctors: Arc<dyn DoctorDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub blobs: Arc<dyn BlobStore>,
    pub ledger: Arc<dyn AppointmentLedger>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            doctors: Arc::new(InMemoryDoctorDirectory::new()),
            users: Arc::new(InMemoryUserDirectory::new()),
            blobs: Arc::new(InMemoryBlobStore::default()),
            ledger: Arc::new(InMemoryAppointmentLedger::new()),
        }
    }

    pub fn supabase(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        Self {
            doctors: Arc::new(SupabaseDoctorDirectory::new(supabase.clone())),
            users: Arc::new(SupabaseUserDirectory::new(supabase.clone())),
            blobs: Arc::new(SupabaseBlobStore::new(supabase.clone(), config.supabase_storage_bucket.clone())),
            ledger: Arc::new(SupabaseAppointmentLedger::new(supabase)),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        match config.storage_backend {
            StorageBackend::Supabase if config.is_configured() => {
                info!("Using Supabase storage at {}", config.supabase_url);
                Self::supabase(config)
            }
            StorageBackend::Supabase => {
                warn!("Supabase is not configured, falling back to in-memory storage");
                Self::in_memory()
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Self::in_memory()
            }
        }
    }
}

/// An explicitly requested Razorpay backend must be usable; orders from the
/// sandbox can never be paid for real.
pub fn payment_gateway(config: &AppConfig) -> Result<Arc<dyn PaymentGateway>, PaymentError> {
    match config.payment_backend {
        PaymentBackend::Razorpay => {
            let gateway = RazorpayGateway::new(config)?;
            info!("Using Razorpay payment gateway");
            Ok(Arc::new(gateway))
        }
        PaymentBackend::Sandbox => {
            info!("Using sandbox payment gateway");
            Ok(Arc::new(SandboxGateway::new()))
        }
    }
}

/// Everything the router hands to the cells.
pub struct AppServices {
    pub doctors: Arc<dyn DoctorDirectory>,
    pub profiles: Arc<ProfileService>,
    pub bookings: Arc<BookingService>,
    pub payments: Arc<PaymentService>,
}

impl AppServices {
    pub fn new(config: &AppConfig, stores: Stores, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            profiles: Arc::new(ProfileService::new(stores.users.clone(), stores.blobs)),
            bookings: Arc::new(BookingService::new(
                stores.doctors.clone(),
                stores.users,
                stores.ledger.clone(),
                config.slot_policy,
            )),
            payments: Arc::new(PaymentService::new(stores.ledger, gateway, config.currency.clone())),
            doctors: stores.doctors,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, PaymentError> {
        let gateway = payment_gateway(config)?;
        Ok(Self::new(config, Stores::from_config(config), gateway))
    }
}

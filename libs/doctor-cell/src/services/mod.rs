pub mod directory;
pub mod supabase;

pub use directory::{DoctorDirectory, InMemoryDoctorDirectory};
pub use supabase::SupabaseDoctorDirectory;

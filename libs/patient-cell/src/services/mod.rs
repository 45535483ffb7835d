pub mod blob;
pub mod directory;
pub mod profile;
pub mod supabase;

pub use blob::{BlobStore, InMemoryBlobStore, SupabaseBlobStore};
pub use directory::{InMemoryUserDirectory, UserDirectory};
pub use profile::ProfileService;
pub use supabase::SupabaseUserDirectory;

pub mod credentials;
pub mod directory;
pub mod ledger;

pub use credentials::CredentialService;
pub use directory::StaffDirectory;
pub use ledger::AttendanceLedger;

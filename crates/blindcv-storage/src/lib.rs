//! blindcv Storage Library
//!
//! On-disk workspace for the current submission:
//!
//! - `curriculos/arquivos_originais_renomeados/Candidato_{n}_original.pdf`
//! - `curriculos/arquivos_anonimos/Candidato_{n}_anonimo.pdf`
//! - `temp_zips/` (only non-empty while an archive is being built)
//!
//! The workspace holds the artifacts of at most one submission; it is reset
//! before every new one.

pub mod error;
pub mod layout;
pub mod workspace;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use layout::WorkspaceLayout;
pub use workspace::{ResetFailure, ResetReport, Workspace};

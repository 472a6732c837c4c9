//! Fixed names shared by the workspace, the archive and the HTTP layer.

/// Directory (under the base dir) holding both slot directories.
pub const CURRICULOS_DIR: &str = "curriculos";

/// Renamed originals, one per candidate slot.
pub const ORIGINALS_DIR: &str = "arquivos_originais_renomeados";

/// Anonymized outputs, one per successful candidate slot.
pub const ANONYMIZED_DIR: &str = "arquivos_anonimos";

/// Scratch directory used only while an archive is being built.
pub const TEMP_ZIP_DIR: &str = "temp_zips";

/// Download name (and temp file name) of the batch archive.
pub const ARCHIVE_FILE_NAME: &str = "curriculos_anonimizados.zip";

/// Accepted upload extension, compared case-insensitively.
pub const ALLOWED_EXTENSION: &str = "pdf";

/// Placeholder API key used when `MISTRAL_API_KEY` is not set.
pub const PLACEHOLDER_API_KEY: &str = "SUA_CHAVE_MISTRAL_AQUI";

/// Placeholder secret used when `SESSION_SECRET` is not set.
pub const PLACEHOLDER_SESSION_SECRET: &str = "uma-chave-secreta-padrao-para-desenvolvimento";

/// User-facing text shown whenever the redaction service fails.
pub const REDACTION_FAILURE_MESSAGE: &str =
    "Erro ao processar o currículo. Verifique a chave da API e a conexão.";

use std::path::PathBuf;

use axum_server::tls_rustls::RustlsConfig;

pub async fn configure_tls(
    cert_path: PathBuf,
    key_path: PathBuf,
) -> Result<RustlsConfig, anyhow::Error> {
    RustlsConfig::from_pem_file(&cert_path, &key_path)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "failed to load TLS material from {}: {}",
                cert_path.display(),
                e
            )
        })
}

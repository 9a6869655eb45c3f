//! TLS configuration and certificate loading.

use std::io::BufReader;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(
    cert_path: &Path,
    key_path: &Path,
) -> Result<RustlsConfig, std::io::Error> {
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    // Surface an empty or non-PEM certificate file as a startup error with
    // a usable message instead of a handshake failure later.
    let mut reader = BufReader::new(std::fs::File::open(cert_path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("Cannot open certificate {:?}: {}", cert_path, e))
    })?);
    let certs: Vec<_> = rustls_pemfile::certs(&mut reader).collect::<Result<_, _>>()?;
    if certs.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("No certificates found in {:?}", cert_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

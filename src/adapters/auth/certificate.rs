//! Server certificate chain retrieval and the pinned trust-anchor file
//!
//! The chain is read during an unverified TLS handshake and written to a PEM
//! file. Every later request (login, count, pages) trusts only that file.

use crate::domain::{AuthError, Result, VulnexError};
use base64::{engine::general_purpose, Engine as _};
use rustls::client::{ServerCertVerified, ServerCertVerifier};
use rustls::{Certificate, ClientConfig, ClientConnection, ServerName};
use std::fs;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// DER certificates as presented by the server, leaf first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certificates: Vec<Vec<u8>>,
}

impl CertificateChain {
    pub fn new(certificates: Vec<Vec<u8>>) -> Self {
        Self { certificates }
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Concatenated PEM blocks, 64 base64 characters per line
    pub fn to_pem(&self) -> String {
        let mut pem = String::new();
        for der in &self.certificates {
            let encoded = general_purpose::STANDARD.encode(der);
            pem.push_str(PEM_BEGIN);
            pem.push('\n');
            for line in encoded.as_bytes().chunks(64) {
                // base64 output is ASCII
                pem.push_str(&String::from_utf8_lossy(line));
                pem.push('\n');
            }
            pem.push_str(PEM_END);
            pem.push('\n');
        }
        pem
    }
}

/// Split a PEM bundle into its individual certificate blocks
pub fn pem_blocks(pem: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in pem.lines().map(str::trim) {
        if line == PEM_BEGIN {
            current = Some(format!("{line}\n"));
        } else if line == PEM_END {
            if let Some(mut block) = current.take() {
                block.push_str(line);
                block.push('\n');
                blocks.push(block);
            }
        } else if let Some(block) = current.as_mut() {
            block.push_str(line);
            block.push('\n');
        }
    }

    blocks
}

/// Accepts any server certificate; used only to read the chain
struct AcceptAnyServerCert;

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &Certificate,
        _intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: SystemTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }
}

/// Retrieve the certificate chain presented by `host:port`
///
/// Blocking; call it from `spawn_blocking` inside async code.
///
/// # Errors
///
/// Returns [`AuthError::CertificateFetch`] when the connection or handshake
/// fails and [`AuthError::EmptyChain`] when no certificates were presented.
pub fn fetch_certificate_chain(host: &str, port: u16, timeout: Duration) -> Result<CertificateChain> {
    let fetch_error = |message: String| {
        VulnexError::Auth(AuthError::CertificateFetch {
            host: host.to_string(),
            message,
        })
    };

    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert))
        .with_no_client_auth();

    let server_name =
        ServerName::try_from(host).map_err(|e| fetch_error(format!("invalid server name: {e}")))?;

    let mut connection = ClientConnection::new(Arc::new(config), server_name)
        .map_err(|e| fetch_error(e.to_string()))?;

    let address = (host, port)
        .to_socket_addrs()
        .map_err(|e| fetch_error(e.to_string()))?
        .next()
        .ok_or_else(|| fetch_error("host did not resolve".to_string()))?;

    let mut socket =
        TcpStream::connect_timeout(&address, timeout).map_err(|e| fetch_error(e.to_string()))?;
    socket
        .set_read_timeout(Some(timeout))
        .and_then(|_| socket.set_write_timeout(Some(timeout)))
        .map_err(|e| fetch_error(e.to_string()))?;

    {
        // Writing through the stream drives the handshake to completion
        let mut tls = rustls::Stream::new(&mut connection, &mut socket);
        tls.write_all(b"HEAD / HTTP/1.0\r\n\r\n")
            .and_then(|_| tls.flush())
            .map_err(|e| fetch_error(e.to_string()))?;
    }

    let certificates: Vec<Vec<u8>> = connection
        .peer_certificates()
        .map(|chain| chain.iter().map(|cert| cert.0.clone()).collect())
        .unwrap_or_default();

    if certificates.is_empty() {
        return Err(AuthError::EmptyChain(host.to_string()).into());
    }

    tracing::debug!(
        host = %host,
        port = port,
        certificates = certificates.len(),
        "Retrieved server certificate chain"
    );

    Ok(CertificateChain::new(certificates))
}

/// PEM file holding the pinned chain
#[derive(Debug)]
pub struct TrustAnchor {
    path: PathBuf,
}

impl TrustAnchor {
    /// Write `chain` to `dir/file_name`, replacing any previous file
    pub fn write(dir: &Path, file_name: &str, chain: &CertificateChain) -> Result<Self> {
        let path = dir.join(file_name);
        fs::write(&path, chain.to_pem())?;
        tracing::info!(path = %path.display(), "Certificate written successfully");
        Ok(Self { path })
    }

    /// Use an existing PEM file
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file into certificates reqwest can trust
    pub fn load_certificates(&self) -> Result<Vec<reqwest::Certificate>> {
        let pem = fs::read_to_string(&self.path)?;
        let blocks = pem_blocks(&pem);
        if blocks.is_empty() {
            return Err(VulnexError::Configuration(format!(
                "Trust anchor {} contains no certificates",
                self.path.display()
            )));
        }

        blocks
            .iter()
            .map(|block| {
                reqwest::Certificate::from_pem(block.as_bytes()).map_err(|e| {
                    VulnexError::Configuration(format!("Invalid certificate in trust anchor: {e}"))
                })
            })
            .collect()
    }

    /// Delete the file
    pub fn remove(self) -> Result<()> {
        fs::remove_file(&self.path)?;
        tracing::debug!(path = %self.path.display(), "Trust anchor removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_to_pem_wraps_lines() {
        let chain = CertificateChain::new(vec![vec![0u8; 100], vec![1u8; 10]]);
        let pem = chain.to_pem();

        assert_eq!(pem.matches(PEM_BEGIN).count(), 2);
        assert_eq!(pem.matches(PEM_END).count(), 2);
        assert!(pem.lines().all(|line| line.len() <= 64 || line.starts_with("-----")));
    }

    #[test]
    fn test_pem_blocks_splits_bundle() {
        let chain = CertificateChain::new(vec![vec![7u8; 80], vec![8u8; 80], vec![9u8; 3]]);
        let blocks = pem_blocks(&chain.to_pem());

        assert_eq!(blocks.len(), 3);
        for block in &blocks {
            assert!(block.starts_with(PEM_BEGIN));
            assert!(block.trim_end().ends_with(PEM_END));
        }

        let body: String = blocks[2]
            .lines()
            .filter(|l| !l.starts_with("-----"))
            .collect();
        assert_eq!(general_purpose::STANDARD.decode(body).unwrap(), vec![9u8; 3]);
    }

    #[test]
    fn test_pem_blocks_ignores_noise() {
        let pem = "garbage\n-----END CERTIFICATE-----\n";
        assert!(pem_blocks(pem).is_empty());
    }

    #[test]
    fn test_trust_anchor_write_and_remove() {
        let dir = TempDir::new().unwrap();
        let chain = CertificateChain::new(vec![vec![42u8; 32]]);

        let anchor = TrustAnchor::write(dir.path(), "anchor.pem", &chain).unwrap();
        let path = anchor.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), chain.to_pem());

        anchor.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_certificates_rejects_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.pem");
        fs::write(&path, "").unwrap();

        assert!(TrustAnchor::open(&path).load_certificates().is_err());
    }
}

use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Leasedesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed file name of the persisted store snapshot.
pub const SNAPSHOT_FILE: &str = "document-store.json";

/// Address the API server binds to unless `LEASEDESK_ADDR` is set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7878";

/// Get the application data directory
/// ~/Leasedesk/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Leasedesk")
}

/// Get the path of the persisted store snapshot
pub fn snapshot_path() -> PathBuf {
    app_data_dir().join(SNAPSHOT_FILE)
}

/// Address to bind the API server to.
///
/// `LEASEDESK_ADDR` overrides the default; an unparseable override is
/// rejected so a typo cannot silently bind the wrong interface.
pub fn bind_addr() -> Result<SocketAddr, std::net::AddrParseError> {
    match std::env::var("LEASEDESK_ADDR") {
        Ok(addr) => addr.parse(),
        Err(_) => DEFAULT_BIND_ADDR.parse(),
    }
}

/// Default `EnvFilter` directive when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "leasedesk=info,tower_http=warn"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Leasedesk"));
    }

    #[test]
    fn snapshot_path_under_app_data() {
        let path = snapshot_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with(SNAPSHOT_FILE));
    }

    #[test]
    fn default_bind_addr_parses() {
        let addr: SocketAddr = DEFAULT_BIND_ADDR.parse().unwrap();
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}

//! Compiled-in candidate sources.

/// Short list used by the standalone port scanner.
pub const COMMON_PORTS: &[u16] = &[21, 22, 23, 25, 53, 80, 110, 143, 443, 445, 3306, 8080];

/// Default list for the toolkit port scan.
pub const EXTENDED_PORTS: &[u16] = &[
    21, 22, 23, 25, 53, 80, 110, 143, 443, 993, 995, 3306, 5432, 8080, 8443,
];

pub const SUBDOMAIN_WORDS: &[&str] = &[
    "www", "mail", "ftp", "admin", "test", "dev", "staging", "api",
    "app", "blog", "shop", "store", "news", "support", "help", "cdn",
    "assets", "static", "media", "images", "files", "docs", "portal",
];

pub const DIRECTORY_WORDS: &[&str] = &[
    "admin", "login", "dashboard", "panel", "uploads", "images", "files",
    "backup", "config", "api", "test", "dev", "staging", "temp", "old",
    "new", "archive", "download", "public", "private", "secure", "data",
];

/// Owned copy of a word list, as the string probes take `String` candidates.
pub fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Parse a comma separated port list such as `22,80,8000-8010`.
pub fn parse_ports(list: &str) -> Result<Vec<u16>, String> {
    let mut ports = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo: u16 = lo.trim().parse().map_err(|_| format!("invalid port: {}", lo))?;
                let hi: u16 = hi.trim().parse().map_err(|_| format!("invalid port: {}", hi))?;
                if lo == 0 || lo > hi {
                    return Err(format!("invalid port range: {}", part));
                }
                ports.extend(lo..=hi);
            }
            None => {
                let port: u16 = part.parse().map_err(|_| format!("invalid port: {}", part))?;
                if port == 0 {
                    return Err("port 0 is not scannable".to_string());
                }
                ports.push(port);
            }
        }
    }
    if ports.is_empty() {
        return Err("no ports given".to_string());
    }
    Ok(ports)
}

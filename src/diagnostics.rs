//! Startup diagnostics
//!
//! Banner text and the advisory check of the files a page is expected to load.
//! Nothing here can stop the server from starting.

use std::net::SocketAddr;
use std::path::Path;

use crate::logger;

/// Presence of one expected asset under the root
#[derive(Debug, Clone, PartialEq)]
pub struct AssetStatus {
    pub path: String,
    /// Size in bytes, `None` when the file is missing
    pub size: Option<u64>,
}

impl AssetStatus {
    #[allow(clippy::cast_precision_loss)]
    pub fn size_kb(&self) -> Option<f64> {
        self.size.map(|bytes| bytes as f64 / 1024.0)
    }

    pub fn report_line(&self) -> String {
        match self.size_kb() {
            Some(kb) => format!("   ✓ {:<35} ({kb:>8.2} KB)", self.path),
            None => format!("   ✗ {:<35} (NOT FOUND)", self.path),
        }
    }
}

/// Stat every expected asset relative to `root`, in list order
pub fn check_assets(root: &Path, assets: &[String]) -> Vec<AssetStatus> {
    assets
        .iter()
        .map(|path| AssetStatus {
            path: path.clone(),
            size: std::fs::metadata(root.join(path)).ok().map(|m| m.len()),
        })
        .collect()
}

/// Address users should type into a browser
///
/// A wildcard bind is shown as loopback.
pub fn browser_addr(addr: SocketAddr) -> SocketAddr {
    if addr.ip().is_unspecified() {
        let loopback = if addr.is_ipv4() {
            std::net::IpAddr::from([127, 0, 0, 1])
        } else {
            std::net::IpAddr::from(std::net::Ipv6Addr::LOCALHOST)
        };
        SocketAddr::new(loopback, addr.port())
    } else {
        addr
    }
}

pub fn render_banner(addr: SocketAddr, root: &Path) -> String {
    let url = format!("http://{}", browser_addr(addr));
    let root = root.display();
    format!(
        r"
╔════════════════════════════════════════════════════════════╗
║             🎮 WASM DEV SERVER - Server Started            ║
╚════════════════════════════════════════════════════════════╝

📍 Address:          {url}
📂 Directory:        {root}
🌐 Main URL:         {url}/
🎨 Demo URL:         {url}/demo.html

📋 Served files:
   ✓ index.html     - Main interface
   ✓ demo.html      - Interactive demo
   ✓ pkg/           - Compiled WASM binaries

⌨️  Controls:
   🔵 Ctrl+C        - Stop the server
   🌀 Reload        - F5 in the browser

🔐 WASM security:
   ✓ CORS enabled
   ✓ Cross-Origin isolation headers set
   ✓ WASM binaries served as application/wasm

💡 Notes:
   • Files are never uploaded anywhere
   • Everything runs locally in your browser
   • WASM requires HTTPS in production

═══════════════════════════════════════════════════════════════
"
    )
}

/// Print the banner and the asset report
pub fn print_startup(addr: SocketAddr, root: &Path, assets: &[String]) {
    logger::log_info(&render_banner(addr, root));

    logger::log_info("📋 Checking files...");
    for status in check_assets(root, assets) {
        logger::log_info(&status.report_line());
    }
    logger::log_info("");
    logger::log_info(&format!(
        "🚀 Ready: accepting connections on http://{}",
        browser_addr(addr)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_assets_reports_presence_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), vec![b'x'; 2048]).unwrap();
        std::fs::write(dir.path().join("demo.html"), "demo").unwrap();

        let assets = vec![
            "index.html".to_string(),
            "demo.html".to_string(),
            "pkg/msx2_processor_bg.wasm".to_string(),
        ];
        let statuses = check_assets(dir.path(), &assets);

        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[0].path, "index.html");
        assert_eq!(statuses[0].size, Some(2048));
        assert_eq!(statuses[0].size_kb(), Some(2.0));
        assert_eq!(statuses[1].size, Some(4));
        assert_eq!(statuses[2].path, "pkg/msx2_processor_bg.wasm");
        assert_eq!(statuses[2].size, None);
    }

    #[test]
    fn test_report_lines() {
        let found = AssetStatus {
            path: "index.html".to_string(),
            size: Some(1536),
        };
        assert!(found.report_line().starts_with("   ✓ index.html"));
        assert!(found.report_line().ends_with("(    1.50 KB)"));

        let missing = AssetStatus {
            path: "pkg/msx2_processor_bg.wasm".to_string(),
            size: None,
        };
        assert!(missing.report_line().contains("✗ pkg/msx2_processor_bg.wasm"));
        assert!(missing.report_line().ends_with("(NOT FOUND)"));
    }

    #[test]
    fn test_banner_shows_address_and_root() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let banner = render_banner(addr, Path::new("/srv/www"));
        assert!(banner.contains("http://127.0.0.1:8080"));
        assert!(banner.contains("/srv/www"));
        assert!(banner.contains("http://127.0.0.1:8080/demo.html"));
        assert!(banner.contains("Ctrl+C"));
    }

    #[test]
    fn test_browser_addr_keeps_specific_host() {
        let addr: SocketAddr = "192.168.0.10:9000".parse().unwrap();
        assert_eq!(browser_addr(addr), addr);
        let v6: SocketAddr = "[::]:9000".parse().unwrap();
        assert_eq!(browser_addr(v6).to_string(), "[::1]:9000");
    }
}

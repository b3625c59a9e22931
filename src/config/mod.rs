use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::errors::WikiError;
use crate::routing::Title;

pub const DEFAULT_PORT: u16 = 8282;
pub const DEFAULT_FRONT_PAGE: &str = "FrontPage";

/// Command line for the wiki server.
#[derive(Debug, Parser)]
#[command(name = "flatwiki")]
#[command(about = "A small wiki that keeps each page in its own text file", long_about = None)]
pub struct Cli {
    /// Directory holding one `<title>.txt` per page.
    #[arg(long, env = "FLATWIKI_PAGES_DIR", default_value = "pages")]
    pub pages_dir: PathBuf,

    /// Directory holding `view.html` and `edit.html`.
    #[arg(long, env = "FLATWIKI_TEMPLATES_DIR", default_value = "templates")]
    pub templates_dir: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "FLATWIKI_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "FLATWIKI_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Page that `/` redirects to.
    #[arg(long, env = "FLATWIKI_FRONT_PAGE", default_value = DEFAULT_FRONT_PAGE)]
    pub front_page: String,
}

/// Application configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub pages_dir: Arc<PathBuf>,
    pub templates_dir: Arc<PathBuf>,
    pub host: IpAddr,
    pub port: u16,
    pub front_page: Title,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            pages_dir: Arc::new(PathBuf::from("pages")),
            templates_dir: Arc::new(PathBuf::from("templates")),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            front_page: Title::from_static(DEFAULT_FRONT_PAGE),
        }
    }

    /// Build the configuration from the process arguments and environment
    pub fn from_args() -> Result<Self, WikiError> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self, WikiError> {
        let front_page = Title::parse(&cli.front_page).map_err(|_| {
            WikiError::Config(format!("front page {:?} is not a valid title", cli.front_page))
        })?;
        Ok(Self {
            pages_dir: Arc::new(cli.pages_dir),
            templates_dir: Arc::new(cli.templates_dir),
            host: cli.host,
            port: cli.port,
            front_page,
        })
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

//! Location adapters.
//!
//! # Responsibilities
//! - Abstract where the current location lives ([`Location`])
//! - Derive the routable fragment from a location per [`Mode`]
//! - Build the location to write when navigating
//!
//! # Design Decisions
//! - Adapters store an opaque href; all mode logic lives here
//! - Absolute hrefs are parsed with `url`; anything else is treated as a
//!   bare path

use parking_lot::Mutex;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::config::schema::{LevelConfig, Mode};

/// Host environment holding the current location.
pub trait Location: Send + Sync {
    fn href(&self) -> String;

    fn set_href(&self, href: &str);
}

#[derive(Debug, Default)]
struct MemoryState {
    href: String,
    entries: Vec<String>,
}

/// In-memory location, also keeping every href written to it.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    state: Mutex<MemoryState>,
}

impl MemoryLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                href: href.into(),
                entries: Vec::new(),
            }),
        }
    }

    /// Hrefs written through [`Location::set_href`], oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.state.lock().entries.clone()
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> String {
        self.state.lock().href.clone()
    }

    fn set_href(&self, href: &str) {
        let mut state = self.state.lock();
        state.href = href.to_string();
        state.entries.push(href.to_string());
    }
}

/// Strip one leading and one trailing `/`.
pub fn clear_slashes(path: &str) -> &str {
    let path = path.strip_suffix('/').unwrap_or(path);
    path.strip_prefix('/').unwrap_or(path)
}

/// The routable fragment of `href` under `config`.
pub fn fragment_of(href: &str, config: &LevelConfig) -> String {
    match config.mode {
        Mode::Manual => clear_slashes(href).to_string(),
        Mode::Hash => {
            let fragment = href.split_once('#').map_or("", |(_, fragment)| fragment);
            clear_slashes(fragment).to_string()
        }
        Mode::History => history_fragment(href, &config.root),
    }
}

fn path_of(href: &str) -> String {
    match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}

fn history_fragment(href: &str, root: &str) -> String {
    let raw = path_of(href);
    let decoded = percent_decode_str(&raw).decode_utf8_lossy();
    let path = clear_slashes(&decoded);

    let root = clear_slashes(root);
    let path = match path.strip_prefix(root) {
        Some(rest) if !root.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
        _ => path,
    };
    clear_slashes(path).to_string()
}

/// The href to store when navigating from `current` to `path`.
pub fn href_for(current: &str, path: &str, config: &LevelConfig) -> String {
    match config.mode {
        Mode::Manual => path.to_string(),
        Mode::Hash => {
            let base = current.split('#').next().unwrap_or_default();
            format!("{base}#{path}")
        }
        Mode::History => {
            let target = format!("{}{}", config.root, clear_slashes(path));
            match Url::parse(current) {
                Ok(base) => base.join(&target).map(String::from).unwrap_or(target),
                Err(_) => target,
            }
        }
    }
}

//! Static per-color chains of location nodes linked by successor codes.
//!
//! The table is loaded once before a session starts and read-only for the
//! lifetime of the process.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::ColorChannel;

const END_OF_ROUTE: &str = "End of route.";

/// One stop on a route. `next` references another node's code within the
/// same color; a dangling reference means end-of-route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    pub text: String,
    pub voice: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Per-color `code -> node` tables, matching the JSON shape on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub red: HashMap<String, LocationNode>,
    #[serde(default)]
    pub green: HashMap<String, LocationNode>,
    #[serde(default)]
    pub blue: HashMap<String, LocationNode>,
}

/// Guidance text computed for a matched node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guidance {
    pub current: String,
    pub next: Option<String>,
}

impl Guidance {
    /// Single overlay line: current location plus the next step, or the
    /// end-of-route marker when the chain stops here.
    pub fn overlay_line(&self) -> String {
        match &self.next {
            Some(next) => format!("Current: {} → Next: {}", self.current, next),
            None => format!("Current: {} → {}", self.current, END_OF_ROUTE),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationGraph {
    routes: RouteTable,
}

impl NavigationGraph {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let routes: RouteTable =
            serde_json::from_str(json).context("failed to parse route table")?;
        Ok(Self::new(routes))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route table from {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// The demo route shipped with the crate (Block N ground floor).
    pub fn bundled_route() -> Self {
        Self::from_json(include_str!("../../data/route.json"))
            .expect("bundled route table is valid")
    }

    fn table_for(&self, color: ColorChannel) -> &HashMap<String, LocationNode> {
        match color {
            ColorChannel::Red => &self.routes.red,
            ColorChannel::Green => &self.routes.green,
            ColorChannel::Blue => &self.routes.blue,
        }
    }

    pub fn lookup(&self, color: ColorChannel, code: &str) -> Option<&LocationNode> {
        self.table_for(color).get(code)
    }

    /// Guidance for a decoded code, or `None` when the code is not in the
    /// table. A `next` pointer that resolves to nothing reads as
    /// end-of-route rather than failing.
    pub fn guidance_for(&self, color: ColorChannel, code: &str) -> Option<Guidance> {
        let node = self.lookup(color, code)?;
        let next = node
            .next
            .as_deref()
            .and_then(|next_code| self.lookup(color, next_code))
            .map(|next_node| next_node.text.clone());
        Some(Guidance {
            current: node.text.clone(),
            next,
        })
    }
}

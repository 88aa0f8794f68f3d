//! Assignment table file format.
//!
//! ```toml
//! [[clusters]]
//! hosts = ["host1.region1.arista.io", "host2.region1.arista.io"]
//!
//! [[clusters]]
//! hosts = ["host1.region2.arista.io"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cluster::{Cluster, ClusterSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentTable {
    #[serde(default)]
    pub clusters: Vec<ClusterEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterEntry {
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl AssignmentTable {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let table: AssignmentTable = toml::from_str(content)?;
        Ok(table)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn cluster_set(&self) -> ClusterSet {
        self.clusters
            .iter()
            .map(|entry| Cluster::new(entry.hosts.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_two_regions() {
        let table = AssignmentTable::parse(
            r#"
[[clusters]]
hosts = ["host1.region1.arista.io", "host2.region1.arista.io"]

[[clusters]]
hosts = ["host1.region2.arista.io"]
"#,
        )
        .unwrap();

        let clusters = table.cluster_set();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters.select_target(), Some("host1.region1.arista.io"));
    }

    #[test]
    fn parse_empty_table() {
        let table = AssignmentTable::parse("").unwrap();
        assert!(table.cluster_set().is_empty());
    }

    #[test]
    fn toml_round_trip() {
        let table = AssignmentTable {
            clusters: vec![ClusterEntry {
                hosts: vec!["a".to_string(), "b".to_string()],
            }],
        };
        let text = table.to_toml_string().unwrap();
        let back = AssignmentTable::parse(&text).unwrap();
        assert_eq!(back.cluster_set(), table.cluster_set());
    }

    #[test]
    fn reject_malformed() {
        assert!(AssignmentTable::parse("clusters = 3").is_err());
    }

    #[test]
    fn from_file_reads_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assignments.toml");
        std::fs::write(&path, "[[clusters]]\nhosts = [\"only.arista.io\"]\n").unwrap();

        let table = AssignmentTable::from_file(&path).unwrap();
        assert_eq!(table.cluster_set().select_target(), Some("only.arista.io"));
    }
}

//! Cluster assignments and target selection.
//!
//! An assignment is an ordered list of clusters, each an ordered list of
//! interchangeable hosts. The server orders both lists by suitability, so
//! selection is purely structural: the first host of the first (home)
//! cluster. No probing or balancing happens client-side.

use crate::proto;

/// A group of interchangeable hosts, most preferred first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    hosts: Vec<String>,
}

impl Cluster {
    pub fn new(hosts: Vec<String>) -> Self {
        Self { hosts }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Cluster {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// The clusters assigned to a caller, home cluster first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// The caller's home cluster.
    pub fn home(&self) -> Option<&Cluster> {
        self.clusters.first()
    }

    /// Select the host to connect to: the first host of the home cluster.
    ///
    /// Returns `None` when there is no home cluster, when it has no hosts,
    /// or when its first host is blank. Later clusters are never consulted.
    pub fn select_target(&self) -> Option<&str> {
        self.home()?
            .hosts()
            .first()
            .map(String::as_str)
            .filter(|host| !host.trim().is_empty())
    }

    /// Build from a wire assignment. Missing fields yield an empty set.
    pub fn from_assignment(assignment: Option<proto::Assignment>) -> Self {
        let clusters = assignment
            .and_then(|a| a.clusters)
            .map(|c| c.values)
            .unwrap_or_default();
        clusters.into_iter().map(Cluster::from).collect()
    }

    /// Convert to the wire representation.
    pub fn to_proto(&self) -> proto::Clusters {
        proto::Clusters {
            values: self
                .clusters
                .iter()
                .map(|c| proto::Cluster {
                    hosts: Some(proto::fmp::RepeatedString {
                        values: c.hosts.clone(),
                    }),
                })
                .collect(),
        }
    }
}

impl FromIterator<Cluster> for ClusterSet {
    fn from_iter<I: IntoIterator<Item = Cluster>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<proto::Cluster> for Cluster {
    fn from(cluster: proto::Cluster) -> Self {
        Self::new(cluster.hosts.map(|h| h.values).unwrap_or_default())
    }
}

impl From<Vec<Vec<String>>> for ClusterSet {
    fn from(clusters: Vec<Vec<String>>) -> Self {
        clusters.into_iter().map(Cluster::new).collect()
    }
}

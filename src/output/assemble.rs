//! Final assembly of the published mesh map
//!
//! Results are streamed into an anonymous scratch file as they arrive so
//! memory stays flat on large meshes. When the walk ends the summary header
//! and the scratch array are combined into a temp file next to the
//! destination, which is then renamed over it.

use crate::crawler::WalkHandle;
use crate::output::stats::{CrawlStats, StatsSnapshot};
use crate::output::OutputResult;
use crate::status::{LinkType, NodeStatus};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Relabels a supernode's tunnel and wireguard links as supernode links
///
/// Links of non-supernodes are left untouched.
pub fn relabel_supernode_links(status: &mut NodeStatus) {
    if !status.node_details.mesh_supernode {
        return;
    }
    for link in status.link_info.values_mut() {
        if link.link_type.is_tunnel() {
            link.link_type = LinkType::Supernode;
        }
    }
}

#[derive(Serialize)]
struct NodeEntry<'a> {
    data: &'a NodeStatus,
}

/// What was written to the published document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSummary {
    /// Generation time, RFC 3339 UTC
    pub date: String,
    pub hosts_scraped: u64,
    pub non_mapped: u64,
    /// Nodes included under `nodeInfo`
    pub entries: u64,
    pub stats: StatsSnapshot,
}

/// Consumes walk results and publishes the map document
pub struct Assembler {
    scratch: BufWriter<File>,
    entries: u64,
    stats: CrawlStats,
}

impl Assembler {
    /// Creates an assembler backed by an anonymous scratch file
    pub fn new(stats: CrawlStats) -> OutputResult<Self> {
        Ok(Self {
            scratch: BufWriter::new(tempfile::tempfile()?),
            entries: 0,
            stats,
        })
    }

    /// Handles one stream item
    ///
    /// `None` is counted as failed, a node without coordinates as unmapped;
    /// everything else is relabeled and appended to the map.
    pub fn accept(&mut self, result: Option<NodeStatus>) -> OutputResult<()> {
        let Some(mut status) = result else {
            self.stats.record_failed();
            return Ok(());
        };

        if !status.is_mapped() {
            tracing::debug!("{} has no coordinates", status.node);
            self.stats.record_unmapped();
            return Ok(());
        }

        relabel_supernode_links(&mut status);

        if self.entries > 0 {
            self.scratch.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.scratch, &NodeEntry { data: &status })?;
        self.entries += 1;
        self.stats.record_mapped();
        Ok(())
    }

    /// Drains a walk until its stream closes
    pub async fn drain(&mut self, walk: &mut WalkHandle) -> OutputResult<()> {
        while let Some(result) = walk.next().await {
            self.accept(result)?;
        }
        Ok(())
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Writes the final document and atomically replaces `destination`
    ///
    /// # Arguments
    ///
    /// * `hosts_scraped` - Discovered-node count reported by the walker
    /// * `destination` - Published file; its directory must exist
    pub fn finish(self, hosts_scraped: u64, destination: &Path) -> OutputResult<PublishedSummary> {
        let stats = self.stats.snapshot();
        let entries = self.entries;
        let date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut scratch = self.scratch.into_inner().map_err(|e| e.into_error())?;
        scratch.seek(SeekFrom::Start(0))?;

        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir)?;

        {
            let mut out = BufWriter::new(staged.as_file_mut());
            write!(
                out,
                "{{\"date\":{},\"hostsScraped\":{},\"nonMapped\":{},\"nodeInfo\":[",
                serde_json::to_string(&date)?,
                hosts_scraped,
                stats.unmapped
            )?;
            io::copy(&mut scratch, &mut out)?;
            out.write_all(b"]}\n")?;
            out.flush()?;
        }
        staged.as_file().sync_all()?;
        staged.persist(destination).map_err(|e| e.error)?;

        tracing::info!(
            "Published {} nodes to {} ({} unmapped, {} failed)",
            entries,
            destination.display(),
            stats.unmapped,
            stats.failed
        );

        Ok(PublishedSummary {
            date,
            hosts_scraped,
            non_mapped: stats.unmapped,
            entries,
            stats,
        })
    }
}

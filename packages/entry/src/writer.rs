//! Map-data output.
//!
//! [`EntryWriter`] is the boundary the importer writes through. Nodes
//! arrive in the order they should be persisted; a writer never reorders
//! them.
//!
//! [`OsmXmlWriter`] produces an OSM XML 0.6 file. Output goes to a
//! sibling `<path>.tmp` file and is only renamed into place by
//! [`OsmXmlWriter::finish`]. A writer that is dropped without finishing
//! (an aborted batch, a panic) deletes its temp file, so a failed run
//! never leaves a truncated document behind.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use nominatim_import_entry_models::GeoEntry;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

/// Value of the root element's `generator` attribute.
pub const GENERATOR: &str = concat!("nominatim_import/", env!("CARGO_PKG_VERSION"));

/// Errors from writing map-data output.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// I/O error creating, flushing, or renaming the output.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// XML serialization failed.
    #[error("XML error: {message}")]
    Xml {
        /// Serializer error text.
        message: String,
    },

    /// A node was added after the writer was finished.
    #[error("Writer already finished")]
    AlreadyFinished,
}

/// Sink for assembled nodes.
pub trait EntryWriter {
    /// Appends one node.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if the node cannot be persisted.
    fn add_node(&mut self, entry: &GeoEntry) -> Result<(), WriteError>;
}

/// Collects nodes in memory.
#[derive(Debug, Default)]
pub struct VecWriter {
    entries: Vec<GeoEntry>,
}

impl VecWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[GeoEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<GeoEntry> {
        self.entries
    }
}

impl EntryWriter for VecWriter {
    fn add_node(&mut self, entry: &GeoEntry) -> Result<(), WriteError> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

fn xml_error(e: impl std::fmt::Display) -> WriteError {
    WriteError::Xml {
        message: e.to_string(),
    }
}

/// Streams nodes into an OSM XML document.
pub struct OsmXmlWriter {
    path: PathBuf,
    tmp_path: PathBuf,
    xml: Option<Writer<BufWriter<File>>>,
    nodes: u64,
    finished: bool,
}

impl std::fmt::Debug for OsmXmlWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsmXmlWriter")
            .field("path", &self.path)
            .field("nodes", &self.nodes)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl OsmXmlWriter {
    /// Opens `<path>.tmp` and writes the XML declaration and the opening
    /// `<osm>` element. Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Io`] if the temp file cannot be created.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, WriteError> {
        let path = path.into();
        let tmp_path = tmp_path_for(&path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WriteError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let file = File::create(&tmp_path).map_err(|e| WriteError::Io {
            path: tmp_path.display().to_string(),
            source: e,
        })?;

        // From here on the struct exists, so Drop cleans up on error.
        let mut writer = Self {
            path,
            tmp_path,
            xml: Some(Writer::new_with_indent(BufWriter::new(file), b' ', 2)),
            nodes: 0,
            finished: false,
        };
        writer.write_header()?;
        Ok(writer)
    }

    fn xml(&mut self) -> Result<&mut Writer<BufWriter<File>>, WriteError> {
        self.xml.as_mut().ok_or(WriteError::AlreadyFinished)
    }

    fn write_header(&mut self) -> Result<(), WriteError> {
        let xml = self.xml()?;
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;

        let mut root = BytesStart::new("osm");
        root.push_attribute(("version", "0.6"));
        root.push_attribute(("generator", GENERATOR));
        xml.write_event(Event::Start(root)).map_err(xml_error)?;
        Ok(())
    }

    /// Final path the document is renamed to on [`Self::finish`].
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of nodes written so far.
    #[must_use]
    pub const fn nodes_written(&self) -> u64 {
        self.nodes
    }

    /// Closes the root element, flushes and syncs the temp file, and
    /// renames it to the final path.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if any step fails. The temp file is removed
    /// when the writer is dropped afterwards.
    pub fn finish(mut self) -> Result<PathBuf, WriteError> {
        let mut xml = self.xml.take().ok_or(WriteError::AlreadyFinished)?;
        xml.write_event(Event::End(BytesEnd::new("osm")))
            .map_err(xml_error)?;

        let file = xml
            .into_inner()
            .into_inner()
            .map_err(|e| WriteError::Io {
                path: self.tmp_path.display().to_string(),
                source: e.into_error(),
            })?;
        file.sync_all().map_err(|e| WriteError::Io {
            path: self.tmp_path.display().to_string(),
            source: e,
        })?;
        drop(file);

        std::fs::rename(&self.tmp_path, &self.path).map_err(|e| WriteError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        self.finished = true;

        log::debug!("Wrote {} nodes to {}", self.nodes, self.path.display());

        Ok(self.path.clone())
    }
}

impl EntryWriter for OsmXmlWriter {
    fn add_node(&mut self, entry: &GeoEntry) -> Result<(), WriteError> {
        let xml = self.xml()?;

        let id = entry.id.to_string();
        let version = entry.version.to_string();
        let lat = format!("{:.7}", entry.location.lat);
        let lon = format!("{:.7}", entry.location.lon);

        let mut node = BytesStart::new("node");
        node.push_attribute(("id", id.as_str()));
        node.push_attribute(("version", version.as_str()));
        node.push_attribute(("timestamp", entry.timestamp.as_str()));
        node.push_attribute(("user", entry.user.as_str()));
        node.push_attribute(("visible", if entry.visible { "true" } else { "false" }));
        node.push_attribute(("lat", lat.as_str()));
        node.push_attribute(("lon", lon.as_str()));

        if entry.tags.is_empty() {
            xml.write_event(Event::Empty(node)).map_err(xml_error)?;
        } else {
            xml.write_event(Event::Start(node)).map_err(xml_error)?;
            for tag in &entry.tags {
                let mut el = BytesStart::new("tag");
                el.push_attribute(("k", tag.key.as_str()));
                el.push_attribute(("v", tag.value.as_str()));
                xml.write_event(Event::Empty(el)).map_err(xml_error)?;
            }
            xml.write_event(Event::End(BytesEnd::new("node")))
                .map_err(xml_error)?;
        }

        self.nodes += 1;
        Ok(())
    }
}

impl Drop for OsmXmlWriter {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // Close the handle before unlinking.
        self.xml.take();
        if let Err(e) = std::fs::remove_file(&self.tmp_path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            log::warn!(
                "Failed to remove unfinished output {}: {e}",
                self.tmp_path.display()
            );
        }
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

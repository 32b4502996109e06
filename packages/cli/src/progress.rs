//! Terminal output for `import`: a node counter bar and the logger that
//! prints above it.

use std::sync::Arc;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::LevelFilter;
use nominatim_import_entry::ProgressCallback;

const NODE_TEMPLATE: &str =
    "{prefix:.bold} {bar:32.green/dim} {pos:>6}/{len} nodes {elapsed:>4} {wide_msg:.dim}";

/// Counts nodes written to one output file.
pub struct NodeBar {
    bar: ProgressBar,
}

impl NodeBar {
    /// Adds a bar labeled with the output file's name to `multi`. The
    /// length stays `0` until the importer reports the batch size.
    #[must_use]
    pub fn for_output(multi: &MultiProgress, filename: &str) -> Arc<dyn ProgressCallback> {
        Arc::new(Self::new(multi, filename))
    }

    fn new(multi: &MultiProgress, filename: &str) -> Self {
        let style = ProgressStyle::with_template(NODE_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bar = multi.add(ProgressBar::new(0).with_style(style));

        let label = std::path::Path::new(filename)
            .file_name()
            .map_or_else(|| filename.to_string(), |n| n.to_string_lossy().into_owned());
        bar.set_prefix(label);

        Self { bar }
    }
}

impl ProgressCallback for NodeBar {
    fn set_total(&self, nodes: u64) {
        self.bar.set_length(nodes);
    }

    fn inc(&self, nodes: u64) {
        self.bar.inc(nodes);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, summary: String) {
        self.bar.finish_with_message(summary);
    }
}

/// Routes `log` through `pretty_env_logger` and keeps its lines from
/// tearing through the node bar. Logs at `info` unless `RUST_LOG` says
/// otherwise. A logger installed earlier stays in place.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let max_level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(max_level);
    }

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    #[test]
    fn counts_nodes_under_output_name() {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let bar = NodeBar::new(&multi, "/tmp/out/batch.osm.xml");

        bar.set_total(6);
        bar.inc(2);
        bar.set_message("#0 Street Address: Test Street".to_string());

        assert_eq!(bar.bar.prefix(), "batch.osm.xml");
        assert_eq!(bar.bar.length(), Some(6));
        assert_eq!(bar.bar.position(), 2);
        assert_eq!(bar.bar.message(), "#0 Street Address: Test Street");

        bar.finish("6 nodes for 3 records".to_string());
        assert!(bar.bar.is_finished());
    }
}

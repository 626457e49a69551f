//! Artifact rendering and file output.

use std::path::{Path, PathBuf};
use storyloom_core::ProgressUpdate;
use storyloom_pipeline::GenerationSession;
use tracing::{debug, info};

/// Progress sink rendering updates as log lines.
pub fn log_progress(update: ProgressUpdate) {
    info!(percentage = update.percentage, "{}", update.status);
}

/// The story as Markdown, one section per part.
pub fn story_markdown(session: &GenerationSession) -> String {
    let mut markdown = format!("# {}\n", session.prompt());
    for segment in session.segments() {
        markdown.push_str(&format!(
            "\n## Part {}\n\n{}\n",
            segment.index() + 1,
            segment.text().trim()
        ));
    }
    markdown
}

/// `part-NN.<extension>` for segment `index`.
pub fn part_file(index: usize, extension: &str) -> String {
    format!("part-{:02}.{}", index + 1, extension)
}

/// Lowercased key with whitespace turned into dashes.
pub fn file_key(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Write `bytes` to `dir/name`, creating `dir` if needed.
pub async fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    tokio::fs::write(&path, bytes).await?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
    Ok(path)
}

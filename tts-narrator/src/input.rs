//! Reading the source text.

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::error::NarrationError;

/// Path argument that means "read stdin".
pub const STDIN_PATH: &str = "-";

/// Read the text to narrate from a file, or stdin for `-`.
///
/// Fails when the source cannot be read or holds only whitespace.
pub async fn read_source(path: &Path) -> Result<String, NarrationError> {
    let text = if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|e| NarrationError::Input(format!("Failed to read stdin: {}", e)))?;
        text
    } else {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            NarrationError::Input(format!("Failed to read {}: {}", path.display(), e))
        })?
    };

    if text.trim().is_empty() {
        return Err(NarrationError::Input("empty input".to_string()));
    }

    Ok(text)
}

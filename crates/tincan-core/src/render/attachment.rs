//! Attachment rendering

use super::embed::fit;
use super::state::RenderState;
use crate::model::Attachment;
use crate::rich::{ImageAnchor, SegmentKind};

/// Human-readable file size ("512 B", "1.5 KB", "3.0 MB")
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

impl RenderState<'_> {
    /// Render attachments as one block, one attachment per line
    pub fn render_attachments(&mut self, attachments: &[Attachment]) {
        if attachments.is_empty() {
            return;
        }
        let config = self.config();
        self.start_block();

        for attachment in attachments {
            self.ensure_break();
            if config.is_image_file(&attachment.filename) {
                let (width, height) = fit(
                    attachment.width.unwrap_or(0),
                    attachment.height.unwrap_or(0),
                    config.image_max_width,
                    config.image_max_height,
                );
                self.anchor(SegmentKind::Image(ImageAnchor {
                    url: attachment
                        .proxy_url
                        .clone()
                        .unwrap_or_else(|| attachment.url.clone()),
                    width,
                    height,
                    alt_text: attachment.filename.clone(),
                }));
            } else {
                self.write("File: ");
                let (start, end) = self.write(&attachment.filename);
                self.emit(
                    start,
                    end,
                    SegmentKind::Link {
                        url: attachment.url.clone(),
                    },
                );
                self.write(&format!(" ({})", format_size(attachment.size)));
            }
        }
    }
}

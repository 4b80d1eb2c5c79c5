use std::io::{self, Write};
use crossterm::{queue, style::{Color, ResetColor, SetForegroundColor}};

use crate::model::{ImageInfo, ListUIState};
use crate::stats::format_bytes;
use super::shared::{truncate_str, write_bold, write_footer, write_selectable, write_status, writeln};

const HELP: &str = "q: Quit | Tab: Switch | ↑/↓: Navigate | r: Run | d: Remove (confirm with y)";

pub fn image_row(image: &ImageInfo) -> String {
    format!("  {:<36} {:<16} {:<14} {:>10}  {}",
        truncate_str(&image.repository, 34),
        truncate_str(&image.tag, 14),
        image.id,
        format_bytes(image.size),
        image.created,
    )
}

pub fn render_images(
    out: &mut impl Write,
    images: &[ImageInfo],
    ui_state: &ListUIState,
    status_message: &Option<String>,
) -> io::Result<()> {
    writeln(out, "")?;

    if images.is_empty() {
        writeln(out, "  No images found.")?;
        queue!(out, SetForegroundColor(Color::DarkGrey))?;
        writeln(out, "  Pull an image with `docker pull` and it will show up here.")?;
        queue!(out, ResetColor)?;
    } else {
        write_bold(out, &format!("  {:<36} {:<16} {:<14} {:>10}  {}",
            "REPOSITORY", "TAG", "IMAGE ID", "SIZE", "CREATED"))?;
        for (idx, image) in images.iter().enumerate() {
            write_selectable(out, &image_row(image), idx == ui_state.selected_index)?;
        }
    }

    write_status(out, status_message)?;
    write_footer(out, HELP)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_row_columns() {
        let image = ImageInfo {
            repository: "postgres".into(),
            tag: "16".into(),
            id: "abcdef012345".into(),
            size: 3 * 1024 * 1024,
            created: "2 weeks ago".into(),
        };
        let row = image_row(&image);
        assert!(row.starts_with("  postgres"));
        assert!(row.contains("abcdef012345"));
        assert!(row.contains("3.00MiB"));
    }
}

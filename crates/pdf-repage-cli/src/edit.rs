//! Page edits given on the command line with `--op`
//!
//! Page numbers are 1-based positions in the sequence as it stands when the
//! edit runs, so later edits see the effect of earlier ones.

use pdf_repage::{DocumentBackend, Rotation, Session};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// `rotate:<pages>:<degrees>`
    Rotate { pages: Vec<usize>, rotation: Rotation },
    /// `delete:<pages>`
    Delete { pages: Vec<usize> },
    /// `move:<pages>:<target>`, placing the pages before page `target`
    /// (one past the last page moves them to the end)
    Move { pages: Vec<usize>, target: usize },
}

impl FromStr for Edit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["rotate", pages, degrees] => {
                let degrees: i32 = degrees
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid angle: {}", degrees))?;
                let rotation = Rotation::from_degrees(degrees)
                    .ok_or_else(|| format!("Rotation must be a multiple of 90, got {}", degrees))?;
                Ok(Edit::Rotate {
                    pages: parse_page_list(pages)?,
                    rotation,
                })
            }
            ["delete", pages] => Ok(Edit::Delete {
                pages: parse_page_list(pages)?,
            }),
            ["move", pages, target] => {
                let target: usize = target
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid page number: {}", target))?;
                if target == 0 {
                    return Err("Page numbers start at 1".to_string());
                }
                Ok(Edit::Move {
                    pages: parse_page_list(pages)?,
                    target,
                })
            }
            _ => Err(format!(
                "Invalid edit '{}': expected rotate:<pages>:<deg>, delete:<pages> or move:<pages>:<target>",
                s
            )),
        }
    }
}

impl Edit {
    pub fn apply<B: DocumentBackend>(&self, session: &mut Session<B>) -> pdf_repage::Result<()> {
        match self {
            Edit::Rotate { pages, rotation } => {
                select(session, pages)?;
                session.rotate_selected(*rotation)?;
                log::info!("Rotated {} page(s) by {}°", pages.len(), rotation.degrees());
            }
            Edit::Delete { pages } => {
                select(session, pages)?;
                let removed = session.delete_selected()?;
                log::info!("Deleted {} page(s)", removed);
            }
            Edit::Move { pages, target } => {
                select(session, pages)?;
                let range = session.move_selected_to(target - 1)?;
                log::info!("Moved {} page(s) to position {}", range.len(), range.start + 1);
            }
        }
        session.selection_mut().clear();
        Ok(())
    }
}

fn select<B: DocumentBackend>(session: &mut Session<B>, pages: &[usize]) -> pdf_repage::Result<()> {
    let selection = session.selection_mut();
    selection.clear();
    for &page in pages {
        if !selection.contains(page - 1) {
            selection.toggle(page - 1)?;
        }
    }
    Ok(())
}

/// Parse a 1-based page list such as `1,3-5`
pub fn parse_page_list(list: &str) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in list.split(',') {
        let part = part.trim();

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_page(start)?;
            let end = parse_page(end)?;
            if start > end {
                return Err(format!("Invalid range: {} > {}", start, end));
            }
            pages.extend(start..=end);
        } else {
            pages.push(parse_page(part)?);
        }
    }

    Ok(pages)
}

fn parse_page(s: &str) -> Result<usize, String> {
    let page: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid page number: {}", s))?;
    if page == 0 {
        return Err("Page numbers start at 1".to_string());
    }
    Ok(page)
}

//! Locating the YAML frontmatter block in a skill file.

/// Delimiter line that opens and closes frontmatter.
const DELIMITER: &str = "---";

/// Ways a document can fail to carry frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterError {
    /// The document does not start with a delimiter.
    Missing,
    /// The opening delimiter is not followed by a closing delimiter line.
    Malformed,
}

/// Return the YAML payload between the opening and closing delimiter lines.
pub fn split_frontmatter(contents: &str) -> Result<&str, FrontmatterError> {
    if !contents.starts_with(DELIMITER) {
        return Err(FrontmatterError::Missing);
    }
    let bounds = frontmatter_bounds(contents).ok_or(FrontmatterError::Malformed)?;
    Ok(&contents[bounds.start..bounds.end])
}

/// Byte range bounds for frontmatter in a document.
#[derive(Debug, Clone, Copy)]
struct FrontmatterBounds {
    /// Start byte index of the YAML payload.
    start: usize,
    /// End byte index of the YAML payload.
    end: usize,
}

/// Locate the byte range containing frontmatter in a document.
fn frontmatter_bounds(contents: &str) -> Option<FrontmatterBounds> {
    let mut offset = 0;
    let mut lines = contents.split_inclusive('\n');
    let first = lines.next()?;
    if trim_line_endings(first) != DELIMITER {
        return None;
    }
    offset += first.len();
    let start = offset;

    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some(FrontmatterBounds { start, end: offset });
        }
        offset += line.len();
    }

    None
}

/// Trim CRLF and LF suffixes from a line fragment.
fn trim_line_endings(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

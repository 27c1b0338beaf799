/// A utility struct to convert byte offsets to line numbers.
///
/// The fallback extractor works with regex match offsets, but findings are
/// reported with 1-based line numbers which are more human-readable.
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                // Record the start of the next line (current newline index + 1)
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-indexed line number.
    pub fn line_of(&self, offset: usize) -> usize {
        // Binary search to find which line range the offset falls into.
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }
}

/// Splits a raw parameter list on top-level commas, trimming each piece.
///
/// Commas nested inside `()`, `[]` or `{}` (default values, inline
/// destructuring) do not split. Empty input yields no parameters.
pub fn split_params(raw: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in raw.chars() {
        match ch {
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                let piece = current.trim();
                if !piece.is_empty() {
                    params.push(piece.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let piece = current.trim();
    if !piece.is_empty() {
        params.push(piece.to_string());
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_of_offsets() {
        let source = "first\nsecond\nthird";
        let index = LineIndex::new(source);

        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(3), 1);
        assert_eq!(index.line_of(6), 2, "start of second line");
        assert_eq!(index.line_of(12), 2, "the newline itself");
        assert_eq!(index.line_of(13), 3);
        assert_eq!(index.line_of(source.len()), 3);
    }

    #[test]
    fn test_line_of_empty_source() {
        let index = LineIndex::new("");
        assert_eq!(index.line_of(0), 1);
    }

    #[test]
    fn test_split_params_simple() {
        assert_eq!(split_params("a, b, c"), vec!["a", "b", "c"]);
        assert_eq!(split_params(""), Vec::<String>::new());
        assert_eq!(split_params("   "), Vec::<String>::new());
    }

    #[test]
    fn test_split_params_nested_commas() {
        assert_eq!(
            split_params("a = [1, 2], b = { x: 1, y: 2 }, c"),
            vec!["a = [1, 2]", "b = { x: 1, y: 2 }", "c"]
        );
    }

    #[test]
    fn test_split_params_unbalanced_does_not_panic() {
        assert_eq!(split_params("a), b"), vec!["a)", "b"]);
    }
}

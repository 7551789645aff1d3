use tracing::{debug, instrument};

/// Byte span of a balanced `{ ... }` object inside a larger text. `end` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSpan {
    pub start: usize,
    pub end: usize,
}

impl ObjectSpan {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..=self.end]
    }
}

/// Find all top-level JSON objects in `text`, in order of appearance.
///
/// Braces inside string literals are ignored. Arrays are tracked only so that
/// mismatched closers do not end an object early.
#[instrument(target = "quizzify::json", skip(text), fields(text_len = text.len()))]
pub fn find_json_objects(text: &str) -> Vec<ObjectSpan> {
    let mut results = Vec::new();
    let mut stack: Vec<(usize, u8)> = Vec::new();

    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' | b'[' => stack.push((i, b)),
            b'}' | b']' => {
                let opener = if b == b'}' { b'{' } else { b'[' };
                match stack.last() {
                    Some(&(start, kind)) if kind == opener => {
                        stack.pop();
                        if stack.is_empty() && kind == b'{' {
                            results.push(ObjectSpan { start, end: i });
                        }
                    }
                    // Unbalanced closer
                    _ => {}
                }
            }
            _ => {}
        }
    }

    debug!(target: "quizzify::json", count = results.len(), "found root objects");
    results
}

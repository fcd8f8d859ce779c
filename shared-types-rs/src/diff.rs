// shared-types-rs/src/diff.rs

/// Cheap structural check for unified-diff text: a `---` header, then a
/// `+++` header, then at least one `@@` hunk marker.
pub fn looks_like_unified_diff(text: &str) -> bool {
    let mut lines = text.lines();
    let has_old = lines.by_ref().any(|l| l.starts_with("--- "));
    let has_new = has_old && lines.by_ref().any(|l| l.starts_with("+++ "));
    has_new && lines.any(|l| l.starts_with("@@"))
}

/// Line counts of an `@@ -a,b +c,d @@` header. An omitted count means 1.
fn hunk_lengths(header: &str) -> Option<(usize, usize)> {
    let rest = header.strip_prefix("@@ -")?;
    let (ranges, _) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(" +")?;
    Some((range_len(old)?, range_len(new)?))
}

fn range_len(range: &str) -> Option<usize> {
    match range.split_once(',') {
        Some((start, len)) => {
            start.parse::<usize>().ok()?;
            len.parse().ok()
        }
        None => range.parse::<usize>().ok().map(|_| 1),
    }
}

fn is_body_line(line: &str) -> bool {
    line.starts_with(' ')
        || (line.starts_with('+') && !line.starts_with("+++ "))
        || (line.starts_with('-') && !line.starts_with("--- "))
}

/// True when there is at least one hunk and every hunk body holds exactly
/// the number of old-side and new-side lines its header announces. This is
/// what `git apply` enforces; a miscounted header is a corrupt patch.
pub fn hunks_match_headers(text: &str) -> bool {
    let mut lines = text.lines().peekable();
    let mut hunks = 0;

    while let Some(line) = lines.next() {
        if !line.starts_with("@@") {
            continue;
        }
        let Some((mut old, mut new)) = hunk_lengths(line) else {
            return false;
        };

        while old > 0 || new > 0 {
            let Some(body) = lines.next() else {
                return false;
            };
            match body.chars().next() {
                // empty lines are blank context, as git tolerates
                None | Some(' ') if old > 0 && new > 0 => {
                    old -= 1;
                    new -= 1;
                }
                Some('-') if old > 0 => old -= 1,
                Some('+') if new > 0 => new -= 1,
                Some('\\') => {}
                _ => return false,
            }
        }

        if lines.peek().is_some_and(|next| is_body_line(next)) {
            return false;
        }
        hunks += 1;
    }
    hunks > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_diff() {
        let diff = "--- a/a.py\n+++ b/a.py\n@@ -1,2 +1,2 @@\n-x = d['k']\n+x = d.get('k')\n";
        assert!(looks_like_unified_diff(diff));
    }

    #[test]
    fn rejects_prose_and_out_of_order_headers() {
        assert!(!looks_like_unified_diff("Add a guard around the lookup."));
        assert!(!looks_like_unified_diff("@@ -1 +1 @@\n+++ b/a.py\n--- a/a.py\n"));
    }

    #[test]
    fn hunk_counts_agree_with_body() {
        let diff = "--- a/a.py\n+++ b/a.py\n@@ -1,2 +1,3 @@\n def f(d):\n-    return d['k']\n+    v = d.get('k')\n+    return v\n";
        assert!(hunks_match_headers(diff));

        let two_hunks = "--- a/a.py\n+++ b/a.py\n@@ -1 +1 @@\n-a\n+b\n@@ -9,2 +9,1 @@\n c\n-d\n\\ No newline at end of file\n";
        assert!(hunks_match_headers(two_hunks));
    }

    #[test]
    fn short_header_is_corrupt() {
        // one more new-side line than announced
        let diff = "--- a/a.py\n+++ b/a.py\n@@ -1,2 +1,2 @@\n def f(d):\n-    return d['k']\n+    v = d.get('k')\n+    return v\n";
        assert!(!hunks_match_headers(diff));

        let blank_context = "--- a/a.py\n+++ b/a.py\n@@ -1,3 +1,2 @@\n-a\n\n b\n c\n";
        assert!(!hunks_match_headers(blank_context));
    }

    #[test]
    fn truncated_or_missing_hunks_are_corrupt() {
        assert!(!hunks_match_headers("--- a/a.py\n+++ b/a.py\n@@ -1,3 +1,3 @@\n a\n"));
        assert!(!hunks_match_headers("--- a/a.py\n+++ b/a.py\n"));
        assert!(!hunks_match_headers("--- a/a.py\n+++ b/a.py\n@@ garbage @@\n a\n"));
    }
}

//! Line-oriented diff between two report texts.
//!
//! Purely algorithmic — no generation call. The diff is a mechanical aid
//! shown alongside the generated comparative impression; the two are never
//! merged or cross-validated.

/// One line of diff output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Present in the prior text only.
    Removed(String),
    /// Present in the current text only.
    Added(String),
    /// Present in both.
    Context(String),
}

/// Longest-common-subsequence line diff from `prior` to `current`.
pub fn line_diff(prior: &str, current: &str) -> Vec<DiffLine> {
    let a: Vec<&str> = prior.lines().collect();
    let b: Vec<&str> = current.lines().collect();

    // lcs[i][j] = LCS length of a[i..] and b[j..]
    let mut lcs = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(DiffLine::Context(a[i].to_string()));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push(DiffLine::Removed(a[i].to_string()));
            i += 1;
        } else {
            out.push(DiffLine::Added(b[j].to_string()));
            j += 1;
        }
    }
    out.extend(a[i..].iter().map(|l| DiffLine::Removed(l.to_string())));
    out.extend(b[j..].iter().map(|l| DiffLine::Added(l.to_string())));
    out
}

/// Render a diff in unified style: `---`/`+++` headers, then `-`, `+`, or
/// two-space prefixed lines.
pub fn render_diff(lines: &[DiffLine]) -> String {
    let mut out = String::from("--- prior\n+++ current\n");
    for line in lines {
        match line {
            DiffLine::Removed(l) => {
                out.push_str("- ");
                out.push_str(l);
            }
            DiffLine::Added(l) => {
                out.push_str("+ ");
                out.push_str(l);
            }
            DiffLine::Context(l) => {
                out.push_str("  ");
                out.push_str(l);
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_are_all_context() {
        let text = "Liver: Normal.\nSpleen: Normal.";
        let diff = line_diff(text, text);
        assert!(diff
            .iter()
            .all(|l| matches!(l, DiffLine::Context(_))));
    }

    #[test]
    fn empty_vs_empty_is_empty() {
        assert!(line_diff("", "").is_empty());
    }

    #[test]
    fn changed_line_is_removed_then_added() {
        let prior = "Liver: Normal.\nSpleen: Normal.";
        let current = "Liver: 2cm lesion segment VI.\nSpleen: Normal.";
        let diff = line_diff(prior, current);

        assert!(diff.contains(&DiffLine::Removed("Liver: Normal.".into())));
        assert!(diff.contains(&DiffLine::Added("Liver: 2cm lesion segment VI.".into())));
        assert!(diff.contains(&DiffLine::Context("Spleen: Normal.".into())));
    }

    #[test]
    fn swap_inverts_markers_but_preserves_changed_set() {
        let prior = "a\nb\nc";
        let current = "a\nx\nc\nd";

        let forward = line_diff(prior, current);
        let backward = line_diff(current, prior);

        let removed = |d: &[DiffLine]| -> Vec<String> {
            d.iter()
                .filter_map(|l| match l {
                    DiffLine::Removed(s) => Some(s.clone()),
                    _ => None,
                })
                .collect()
        };
        let added = |d: &[DiffLine]| -> Vec<String> {
            d.iter()
                .filter_map(|l| match l {
                    DiffLine::Added(s) => Some(s.clone()),
                    _ => None,
                })
                .collect()
        };

        let mut fwd_removed = removed(&forward);
        let mut bwd_added = added(&backward);
        fwd_removed.sort();
        bwd_added.sort();
        assert_eq!(fwd_removed, bwd_added);

        let mut fwd_added = added(&forward);
        let mut bwd_removed = removed(&backward);
        fwd_added.sort();
        bwd_removed.sort();
        assert_eq!(fwd_added, bwd_removed);
    }

    #[test]
    fn addition_only() {
        let diff = line_diff("a", "a\nb");
        assert_eq!(
            diff,
            vec![
                DiffLine::Context("a".into()),
                DiffLine::Added("b".into())
            ]
        );
    }

    #[test]
    fn render_uses_unified_prefixes() {
        let rendered = render_diff(&[
            DiffLine::Context("same".into()),
            DiffLine::Removed("old".into()),
            DiffLine::Added("new".into()),
        ]);
        assert!(rendered.starts_with("--- prior\n+++ current\n"));
        assert!(rendered.contains("  same\n"));
        assert!(rendered.contains("- old\n"));
        assert!(rendered.contains("+ new\n"));
    }
}

//! `[[stem]]` wikilink rewriting in markdown text.

use regex::{NoExpand, Regex};

/// Replaces every exact `[[old_stem]]` with `[[new_stem]]`.
///
/// Returns the rewritten text and the number of replacements. Links with an
/// alias or heading suffix (`[[stem|alias]]`, `[[stem#h]]`) are left alone.
pub fn replace_wikilinks(text: &str, old_stem: &str, new_stem: &str) -> (String, usize) {
    let pattern = wikilink_pattern(old_stem);
    let count = pattern.find_iter(text).count();
    if count == 0 {
        return (text.to_string(), 0);
    }
    let replacement = format!("[[{new_stem}]]");
    let rewritten = pattern.replace_all(text, NoExpand(&replacement));
    (rewritten.into_owned(), count)
}

fn wikilink_pattern(stem: &str) -> Regex {
    // Escaped input always yields a valid pattern.
    Regex::new(&format!(r"\[\[{}\]\]", regex::escape(stem))).expect("escaped wikilink pattern")
}

#[cfg(test)]
mod tests {
    use super::replace_wikilinks;

    #[test]
    fn replaces_exact_links_only() {
        let text = "See [[agents]] and [[agents_v2]], also [[agents]].";
        let (rewritten, count) = replace_wikilinks(text, "agents", "ai_agents");
        assert_eq!(count, 2);
        assert_eq!(
            rewritten,
            "See [[ai_agents]] and [[agents_v2]], also [[ai_agents]]."
        );
    }

    #[test]
    fn escapes_regex_metacharacters_in_stem() {
        let text = "[[c++ (lang)]] vs [[cxx (lang)]]";
        let (rewritten, count) = replace_wikilinks(text, "c++ (lang)", "cpp $1");
        assert_eq!(count, 1);
        assert_eq!(rewritten, "[[cpp $1]] vs [[cxx (lang)]]");
    }

    #[test]
    fn untouched_text_reports_zero() {
        let (rewritten, count) = replace_wikilinks("no links here", "agents", "x");
        assert_eq!(count, 0);
        assert_eq!(rewritten, "no links here");
    }
}

//! Link ingestion: categorization and the per-tab entry lists.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The upper bound the entry form enforces per category.
pub const MAX_LINKS_PER_CATEGORY: usize = 10;

/// The four fixed link buckets the backend ingests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LinkCategory {
    Jira,
    Confluence,
    Docs,
    Github,
}

impl LinkCategory {
    /// Capitalized display name ("Jira", "Github", ...), as used in the
    /// wrong-type warning.
    pub fn title(&self) -> &'static str {
        match self {
            LinkCategory::Jira => "Jira",
            LinkCategory::Confluence => "Confluence",
            LinkCategory::Docs => "Docs",
            LinkCategory::Github => "Github",
        }
    }
}

/// Classifies a pasted URL by substring match, in fixed priority order.
///
/// Anything matching no pattern keeps the category of the tab it was typed
/// into.
pub fn categorize(url: &str, fallback: LinkCategory) -> LinkCategory {
    if url.contains(".atlassian.net/jira") {
        LinkCategory::Jira
    } else if url.contains("https://github.com/") {
        LinkCategory::Github
    } else if url.contains("atlassian.net/wiki/pages") {
        LinkCategory::Confluence
    } else if url.contains("https://docs.google.com/") {
        LinkCategory::Docs
    } else {
        fallback
    }
}

/// Outcome of editing one entry field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value stayed in the tab it was typed into.
    Kept,
    /// The value was recognized as another category and moved there;
    /// the front end shows a transient wrong-type warning.
    Moved(LinkCategory),
    /// The field was emptied and the entry removed.
    Removed,
    /// No entry at that index.
    OutOfRange,
}

/// The per-category link entry lists of the Portal form.
///
/// Invariant: a category whose list would be empty holds a single
/// empty-string placeholder instead, so the form always renders one input
/// box per tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCollection {
    jira: Vec<String>,
    confluence: Vec<String>,
    docs: Vec<String>,
    github: Vec<String>,
}

impl Default for LinkCollection {
    fn default() -> Self {
        Self {
            jira: vec![String::new()],
            confluence: vec![String::new()],
            docs: vec![String::new()],
            github: vec![String::new()],
        }
    }
}

impl LinkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, category: LinkCategory) -> &[String] {
        self.list(category)
    }

    fn list(&self, category: LinkCategory) -> &Vec<String> {
        match category {
            LinkCategory::Jira => &self.jira,
            LinkCategory::Confluence => &self.confluence,
            LinkCategory::Docs => &self.docs,
            LinkCategory::Github => &self.github,
        }
    }

    fn list_mut(&mut self, category: LinkCategory) -> &mut Vec<String> {
        match category {
            LinkCategory::Jira => &mut self.jira,
            LinkCategory::Confluence => &mut self.confluence,
            LinkCategory::Docs => &mut self.docs,
            LinkCategory::Github => &mut self.github,
        }
    }

    fn restore_placeholders(&mut self) {
        for list in [
            &mut self.jira,
            &mut self.confluence,
            &mut self.docs,
            &mut self.github,
        ] {
            if list.is_empty() {
                list.push(String::new());
            }
        }
    }

    /// Adds one more empty input box to `tab`.
    ///
    /// Returns `false` when the tab already holds the maximum number of
    /// entries.
    pub fn add_placeholder(&mut self, tab: LinkCategory) -> bool {
        let list = self.list_mut(tab);
        if list.len() >= MAX_LINKS_PER_CATEGORY {
            return false;
        }
        list.push(String::new());
        true
    }

    /// Applies an edit to entry `index` of `tab`.
    ///
    /// The entry is removed from `tab`; a non-empty value is re-appended to
    /// whatever category [`categorize`] detects, which may differ from the
    /// tab it was typed into.
    pub fn edit(&mut self, tab: LinkCategory, index: usize, value: impl Into<String>) -> EditOutcome {
        let value = value.into();
        {
            let list = self.list_mut(tab);
            if index >= list.len() {
                return EditOutcome::OutOfRange;
            }
            list.remove(index);
        }

        let outcome = if value.is_empty() {
            EditOutcome::Removed
        } else {
            let detected = categorize(&value, tab);
            self.list_mut(detected).push(value);
            if detected == tab {
                EditOutcome::Kept
            } else {
                EditOutcome::Moved(detected)
            }
        };

        self.restore_placeholders();
        outcome
    }

    /// Non-empty entries of one category, in order.
    pub fn filled(&self, category: LinkCategory) -> Vec<String> {
        self.list(category)
            .iter()
            .filter(|l| !l.is_empty())
            .cloned()
            .collect()
    }

    /// Builds the batched submission payload, filtering empty placeholders.
    pub fn submission(&self, project_name: impl Into<String>) -> LinkSubmission {
        LinkSubmission {
            project_name: project_name.into(),
            github: self.filled(LinkCategory::Github),
            jira: self.filled(LinkCategory::Jira),
            docs: self.filled(LinkCategory::Docs),
            confluence: self.filled(LinkCategory::Confluence),
        }
    }

    /// Resets every tab to a single placeholder (after a submit).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The batched Portal submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSubmission {
    pub project_name: String,
    pub github: Vec<String>,
    pub jira: Vec<String>,
    pub docs: Vec<String>,
    pub confluence: Vec<String>,
}

/// One row of the ingested-dataset table shown below the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatusRow {
    pub url: String,
    pub date: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_matches_fixed_patterns() {
        assert_eq!(
            categorize("https://github.com/org/repo", LinkCategory::Docs),
            LinkCategory::Github
        );
        assert_eq!(
            categorize("https://foo.atlassian.net/jira/x", LinkCategory::Docs),
            LinkCategory::Jira
        );
        assert_eq!(
            categorize("https://docs.google.com/doc/1", LinkCategory::Jira),
            LinkCategory::Docs
        );
        assert_eq!(
            categorize("https://foo.atlassian.net/wiki/pages/1", LinkCategory::Jira),
            LinkCategory::Confluence
        );
        assert_eq!(
            categorize("not a url", LinkCategory::Confluence),
            LinkCategory::Confluence
        );
    }

    #[test]
    fn jira_pattern_wins_over_wiki() {
        // Priority order is fixed; a URL matching the Jira pattern never
        // falls through to later patterns.
        assert_eq!(
            categorize("https://foo.atlassian.net/jira/wiki/pages", LinkCategory::Docs),
            LinkCategory::Jira
        );
    }

    #[test]
    fn default_collection_holds_one_placeholder_per_tab() {
        let links = LinkCollection::new();
        for category in [
            LinkCategory::Jira,
            LinkCategory::Confluence,
            LinkCategory::Docs,
            LinkCategory::Github,
        ] {
            assert_eq!(links.entries(category), &[String::new()]);
        }
    }

    #[test]
    fn edit_keeps_matching_value_in_tab() {
        let mut links = LinkCollection::new();
        let outcome = links.edit(LinkCategory::Jira, 0, "https://foo.atlassian.net/jira/T-1");
        assert_eq!(outcome, EditOutcome::Kept);
        assert_eq!(links.entries(LinkCategory::Jira).len(), 1);
    }

    #[test]
    fn edit_moves_misfiled_value_and_restores_placeholder() {
        let mut links = LinkCollection::new();
        let outcome = links.edit(LinkCategory::Jira, 0, "https://github.com/org/repo");
        assert_eq!(outcome, EditOutcome::Moved(LinkCategory::Github));
        // The Jira tab regained its placeholder, the Github tab holds the
        // placeholder plus the moved entry.
        assert_eq!(links.entries(LinkCategory::Jira), &[String::new()]);
        assert_eq!(links.entries(LinkCategory::Github).len(), 2);
        assert_eq!(
            links.entries(LinkCategory::Github)[1],
            "https://github.com/org/repo"
        );
    }

    #[test]
    fn clearing_an_entry_removes_it() {
        let mut links = LinkCollection::new();
        links.edit(LinkCategory::Docs, 0, "https://docs.google.com/doc/1");
        links.add_placeholder(LinkCategory::Docs);
        let outcome = links.edit(LinkCategory::Docs, 0, "");
        assert_eq!(outcome, EditOutcome::Removed);
        assert_eq!(links.entries(LinkCategory::Docs), &[String::new()]);
    }

    #[test]
    fn placeholder_cap_is_enforced() {
        let mut links = LinkCollection::new();
        for _ in 0..MAX_LINKS_PER_CATEGORY {
            links.add_placeholder(LinkCategory::Jira);
        }
        assert_eq!(links.entries(LinkCategory::Jira).len(), MAX_LINKS_PER_CATEGORY);
        assert!(!links.add_placeholder(LinkCategory::Jira));
    }

    #[test]
    fn submission_filters_empty_placeholders() {
        let mut links = LinkCollection::new();
        links.edit(LinkCategory::Jira, 0, "https://a.atlassian.net/jira/1");
        links.add_placeholder(LinkCategory::Jira);
        links.edit(LinkCategory::Jira, 1, "https://a.atlassian.net/jira/2");
        links.add_placeholder(LinkCategory::Jira);

        let submission = links.submission("alpha");
        assert_eq!(submission.project_name, "alpha");
        assert_eq!(
            submission.jira,
            vec![
                "https://a.atlassian.net/jira/1".to_string(),
                "https://a.atlassian.net/jira/2".to_string(),
            ]
        );
        assert!(submission.github.is_empty());
        assert!(submission.docs.is_empty());
        assert!(submission.confluence.is_empty());
    }

    #[test]
    fn reset_returns_to_placeholders() {
        let mut links = LinkCollection::new();
        links.edit(LinkCategory::Github, 0, "https://github.com/org/repo");
        links.reset();
        assert_eq!(links, LinkCollection::default());
    }

    #[test]
    fn category_display_is_lowercase() {
        assert_eq!(LinkCategory::Github.to_string(), "github");
        assert_eq!(LinkCategory::Jira.title(), "Jira");
        assert_eq!("confluence".parse::<LinkCategory>().unwrap(), LinkCategory::Confluence);
    }
}

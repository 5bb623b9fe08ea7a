use std::collections::BTreeSet;

use crate::entities::project::Project;

/// Search text plus the set of technologies every shown project must use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub search_term: String,
    pub selected_technologies: Vec<String>,
}

impl ProjectFilter {
    pub fn new(search_term: impl Into<String>, selected_technologies: Vec<String>) -> Self {
        ProjectFilter {
            search_term: search_term.into(),
            selected_technologies,
        }
    }

    /// Case-insensitive substring on title or description, AND every
    /// selected technology present on the project.
    pub fn matches(&self, project: &Project) -> bool {
        self.matches_search(project) && self.matches_technologies(project)
    }

    fn matches_search(&self, project: &Project) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        project.title.to_lowercase().contains(&needle)
            || project.description.to_lowercase().contains(&needle)
    }

    fn matches_technologies(&self, project: &Project) -> bool {
        self.selected_technologies
            .iter()
            .all(|tech| project.technologies.contains(tech))
    }

    /// Stable: the subset keeps the input order.
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Selects `tech` if it is not selected yet, otherwise deselects it.
    pub fn toggle_technology(&mut self, tech: &str) {
        match self.selected_technologies.iter().position(|t| t == tech) {
            Some(idx) => {
                self.selected_technologies.remove(idx);
            }
            None => self.selected_technologies.push(tech.to_string()),
        }
    }

    pub fn is_selected(&self, tech: &str) -> bool {
        self.selected_technologies.iter().any(|t| t == tech)
    }

    pub fn clear(&mut self) {
        self.search_term.clear();
        self.selected_technologies.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || !self.selected_technologies.is_empty()
    }
}

pub fn filter_projects<'a>(
    projects: &'a [Project],
    search_term: &str,
    selected_technologies: &[String],
) -> Vec<&'a Project> {
    ProjectFilter::new(search_term, selected_technologies.to_vec()).apply(projects)
}

/// Every tag used by any project, deduplicated and sorted ascending.
pub fn available_technologies(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|p| p.technologies.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The state of one gallery view: the fetched projects and the current
/// filter. Everything visible is re-derived from these two on demand.
#[derive(Debug, Clone, Default)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
    technologies: Vec<String>,
    pub filter: ProjectFilter,
}

impl ProjectCatalog {
    pub fn new(projects: Vec<Project>) -> Self {
        let technologies = available_technologies(&projects);
        ProjectCatalog {
            projects,
            technologies,
            filter: ProjectFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ProjectFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn replace_projects(&mut self, projects: Vec<Project>) {
        self.technologies = available_technologies(&projects);
        self.projects = projects;
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    pub fn visible(&self) -> Vec<&Project> {
        self.filter.apply(&self.projects)
    }

    /// e.g. `Showing 1 project` or `Showing 3 projects matching your filters`.
    pub fn summary(&self) -> String {
        let count = self.visible().len();
        let noun = if count == 1 { "project" } else { "projects" };
        let suffix = if self.filter.is_active() { " matching your filters" } else { "" };
        format!("Showing {count} {noun}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, description: &str, technologies: &[&str]) -> Project {
        Project {
            id: title.to_lowercase(),
            created_at: None,
            title: title.to_string(),
            slug: None,
            description: description.to_string(),
            project_image: None,
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            github_url: None,
            live_url: None,
            featured: false,
            order: 0.0,
            long_description: None,
        }
    }

    fn alpha_beta() -> Vec<Project> {
        vec![
            project("Alpha", "api tool", &["Go", "Docker"]),
            project("Beta", "ui kit", &["TypeScript"]),
        ]
    }

    fn sample() -> Vec<Project> {
        vec![
            project("Gateway", "Rust API gateway", &["Rust", "Docker", "Redis"]),
            project("Dashboard", "Admin UI", &["TypeScript", "React"]),
            project("Crawler", "Fast web crawler", &["Rust", "Tokio"]),
            project("Blog", "Static site written in rust", &["Rust", "Docker"]),
            project("Notes", "Markdown notes app", &["TypeScript", "Docker"]),
        ]
    }

    fn titles(projects: Vec<&Project>) -> Vec<&str> {
        projects.into_iter().map(|p| p.title.as_str()).collect()
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let list = sample();
        let result = filter_projects(&list, "", &[]);
        assert_eq!(titles(result), vec!["Gateway", "Dashboard", "Crawler", "Blog", "Notes"]);
    }

    #[test]
    fn technology_filter_requires_superset() {
        let list = sample();
        let selected = tags(&["Rust", "Docker"]);

        let result = filter_projects(&list, "", &selected);
        assert_eq!(titles(result), vec!["Gateway", "Blog"]);

        for p in filter_projects(&list, "", &selected) {
            assert!(selected.iter().all(|s| p.technologies.contains(s)));
        }
    }

    #[test]
    fn technology_match_is_exact() {
        let list = sample();
        assert!(filter_projects(&list, "", &tags(&["rust"])).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_title_or_description() {
        let list = sample();
        assert_eq!(titles(filter_projects(&list, "RUST", &[])), vec!["Gateway", "Blog"]);
        assert_eq!(titles(filter_projects(&list, "crawl", &[])), vec!["Crawler"]);
        assert_eq!(titles(filter_projects(&list, "admin", &[])), vec!["Dashboard"]);
    }

    #[test]
    fn combined_filter_is_intersection() {
        let list = sample();
        let selected = tags(&["Docker"]);

        for term in ["", "a", "rust", "notes", "zzz"] {
            let by_text: Vec<&str> = titles(filter_projects(&list, term, &[]));
            let by_tech: Vec<&str> = titles(filter_projects(&list, "", &selected));
            let expected: Vec<&str> = by_text.iter().copied().filter(|t| by_tech.contains(t)).collect();

            assert_eq!(titles(filter_projects(&list, term, &selected)), expected, "term {term:?}");
        }
    }

    #[test]
    fn alpha_beta_scenario() {
        let list = alpha_beta();
        assert_eq!(titles(filter_projects(&list, "api", &[])), vec!["Alpha"]);
        assert_eq!(titles(filter_projects(&list, "", &tags(&["TypeScript"]))), vec!["Beta"]);
        // "a" appears in both titles; only Alpha uses Go.
        assert_eq!(titles(filter_projects(&list, "a", &[])), vec!["Alpha", "Beta"]);
        assert_eq!(titles(filter_projects(&list, "a", &tags(&["Go"]))), vec!["Alpha"]);
    }

    #[test]
    fn available_technologies_are_unique_and_sorted() {
        let mut list = sample();
        assert_eq!(
            available_technologies(&list),
            vec!["Docker", "React", "Redis", "Rust", "Tokio", "TypeScript"]
        );

        list.reverse();
        assert_eq!(
            available_technologies(&list),
            vec!["Docker", "React", "Redis", "Rust", "Tokio", "TypeScript"]
        );
        assert!(available_technologies(&[]).is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut filter = ProjectFilter::default();
        filter.toggle_technology("Rust");
        filter.toggle_technology("Docker");
        assert!(filter.is_selected("Rust"));
        assert!(filter.is_active());

        filter.toggle_technology("Rust");
        assert_eq!(filter.selected_technologies, vec!["Docker"]);

        filter.clear();
        assert!(!filter.is_active());
    }

    #[test]
    fn catalog_summary_reflects_filter_state() {
        let mut catalog = ProjectCatalog::new(sample());
        assert_eq!(catalog.summary(), "Showing 5 projects");

        catalog.filter.set_search_term("crawler");
        assert_eq!(catalog.summary(), "Showing 1 project matching your filters");

        catalog.filter.toggle_technology("React");
        assert_eq!(catalog.summary(), "Showing 0 projects matching your filters");
        assert!(catalog.visible().is_empty());
    }

    #[test]
    fn catalog_recomputes_when_projects_change() {
        let mut catalog = ProjectCatalog::new(alpha_beta())
            .with_filter(ProjectFilter::new("", tags(&["Go"])));
        assert_eq!(titles(catalog.visible()), vec!["Alpha"]);

        catalog.replace_projects(sample());
        assert!(catalog.visible().is_empty());
        assert!(catalog.technologies().contains(&"Tokio".to_string()));
        assert_eq!(catalog.projects().len(), 5);
    }
    mod properties {
        use super::*;
        use proptest::prelude::*;

        const TECHS: [&str; 5] = ["Rust", "Go", "Docker", "TypeScript", "rust"];

        fn arb_projects() -> impl Strategy<Value = Vec<Project>> {
            let row = (
                "[a-cA-C ]{0,8}",
                "[a-cA-C ]{0,12}",
                prop::sample::subsequence(TECHS.to_vec(), 0..=3),
            );
            prop::collection::vec(row, 0..8).prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (title, description, techs))| {
                        let mut p = project(&title, &description, &techs);
                        p.id = format!("p{i}");
                        p
                    })
                    .collect()
            })
        }

        fn arb_selection() -> impl Strategy<Value = Vec<String>> {
            prop::sample::subsequence(TECHS.to_vec(), 0..=2).prop_map(|t| tags(&t))
        }

        fn ids(projects: &[&Project]) -> Vec<String> {
            projects.iter().map(|p| p.id.clone()).collect()
        }

        proptest! {
            #[test]
            fn empty_filter_is_identity(list in arb_projects()) {
                let all: Vec<&Project> = list.iter().collect();
                prop_assert_eq!(ids(&filter_projects(&list, "", &[])), ids(&all));
            }

            #[test]
            fn results_keep_input_order(
                list in arb_projects(),
                term in "[a-c]{0,2}",
                selected in arb_selection()
            ) {
                let result = ids(&filter_projects(&list, &term, &selected));
                let positions: Vec<usize> = result
                    .iter()
                    .filter_map(|id| list.iter().position(|p| &p.id == id))
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }

            #[test]
            fn kept_exactly_when_all_selected_are_used(
                list in arb_projects(),
                selected in arb_selection()
            ) {
                let kept = ids(&filter_projects(&list, "", &selected));
                for p in &list {
                    let uses_all = selected.iter().all(|s| p.technologies.contains(s));
                    prop_assert_eq!(kept.contains(&p.id), uses_all);
                }
            }

            #[test]
            fn search_is_case_insensitive_substring(list in arb_projects(), term in "[a-cA-C]{1,2}") {
                let needle = term.to_lowercase();
                let expected: Vec<&Project> = list
                    .iter()
                    .filter(|p| {
                        p.title.to_lowercase().contains(&needle)
                            || p.description.to_lowercase().contains(&needle)
                    })
                    .collect();
                prop_assert_eq!(ids(&filter_projects(&list, &term, &[])), ids(&expected));
                prop_assert_eq!(
                    ids(&filter_projects(&list, &term.to_uppercase(), &[])),
                    ids(&filter_projects(&list, &term.to_lowercase(), &[]))
                );
            }

            #[test]
            fn combined_filter_is_intersection(
                list in arb_projects(),
                term in "[a-c]{0,2}",
                selected in arb_selection()
            ) {
                let by_text = ids(&filter_projects(&list, &term, &[]));
                let by_tech = ids(&filter_projects(&list, "", &selected));
                let expected: Vec<String> =
                    by_text.into_iter().filter(|id| by_tech.contains(id)).collect();
                prop_assert_eq!(ids(&filter_projects(&list, &term, &selected)), expected);
            }

            #[test]
            fn technologies_are_sorted_unique_union(list in arb_projects()) {
                let techs = available_technologies(&list);
                prop_assert!(techs.windows(2).all(|w| w[0] < w[1]));
                for p in &list {
                    for t in &p.technologies {
                        prop_assert!(techs.contains(t));
                    }
                }
                for t in &techs {
                    prop_assert!(list.iter().any(|p| p.technologies.contains(t)));
                }
            }
        }
    }
}

use portfolio_core::defaults::default_document;
use portfolio_core::view::{visible_projects, ALL_TAG};
use portfolio_core::{filter_projects, paragraphs, project_tags, Project, ProjectFilter};

fn project(id: &str, tags: &[&str], visible: bool) -> Project {
    let mut project = Project::with_id(
        id,
        format!("Project {id}"),
        "desc",
        "https://example.com",
        tags.iter().map(|t| t.to_string()).collect(),
    );
    project.visible = visible;
    project
}

#[test]
fn all_tag_comes_first_and_tags_are_distinct() {
    let projects = vec![
        project("1", &["AI", "Python"], true),
        project("2", &["Python", "Web"], true),
        project("3", &["Hidden"], false),
    ];
    assert_eq!(
        project_tags(&projects),
        vec![ALL_TAG, "AI", "Python", "Web"]
    );
}

#[test]
fn tag_filter_matches_exactly() {
    let projects = vec![
        project("1", &["Web"], true),
        project("2", &["web"], true),
        project("3", &["Web"], false),
        project("4", &["WebGL"], true),
    ];
    let ids: Vec<&str> = filter_projects(&projects, &ProjectFilter::Tag("Web".into()))
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1"]);
}

#[test]
fn all_filter_equals_visible_projects() {
    let projects = vec![project("1", &[], false), project("2", &[], true)];
    assert_eq!(
        filter_projects(&projects, &ProjectFilter::parse(ALL_TAG)),
        visible_projects(&projects)
    );
}

#[test]
fn default_content_is_filterable_and_renderable() {
    let document = default_document();
    let tags = project_tags(&document.projects);
    assert_eq!(tags[0], ALL_TAG);
    assert!(tags.len() > 1);

    for tag in &tags[1..] {
        assert!(!filter_projects(&document.projects, &ProjectFilter::parse(tag)).is_empty());
    }
    assert!(paragraphs(&document.personal_info.about).len() > 1);
    document.validate().unwrap();
}

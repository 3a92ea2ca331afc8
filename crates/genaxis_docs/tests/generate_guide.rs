use genaxis_docs::{extract_page_texts, generate_guide, GuideOptions, TOC_HEADING};
use std::fs;
use std::path::Path;

/// Page number printed right after `title` on the contents page.
fn page_listed_after(contents: &str, title: &str) -> Option<u32> {
    let start = contents.find(title)? + title.len();
    contents[start..].split_whitespace().next()?.parse().ok()
}

fn write_sketch(root: &Path, section: &str, body: &str) {
    let dir = root.join(section);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("sketch.md"), body).unwrap();
}

#[test]
fn two_sections_get_contents_with_pages_in_directory_order() {
    let source = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_sketch(
        source.path(),
        "beta_app",
        "## Views\n\n- list\n- detail\n\n```\nGET /genes\n```\n",
    );
    write_sketch(
        source.path(),
        "alpha_app",
        "# Models\n\n| field | type |\n|---|---|\n| name | text |\n",
    );
    fs::create_dir(source.path().join("no_sketch")).unwrap();

    let output = out.path().join("guide.pdf");
    let html = out.path().join("guide.html");
    let options = GuideOptions {
        source_dir: source.path().to_path_buf(),
        output: output.clone(),
        html_output: Some(html.clone()),
        ..GuideOptions::default()
    };

    let outcome = generate_guide(&options).unwrap();

    assert_eq!(outcome.titles, ["alpha_app", "beta_app"]);
    let alpha = outcome.pages["alpha_app"];
    let beta = outcome.pages["beta_app"];
    assert!(alpha >= 1 && beta >= alpha, "alpha={alpha} beta={beta}");

    let texts = extract_page_texts(&output).unwrap();
    assert_eq!(texts.len(), outcome.page_count);
    let contents = texts
        .iter()
        .find(|text| text.contains(TOC_HEADING))
        .expect("contents page");
    let alpha_at = contents.find("alpha_app").unwrap();
    let beta_at = contents.find("beta_app").unwrap();
    assert!(alpha_at < beta_at);
    assert_eq!(page_listed_after(contents, "alpha_app"), Some(alpha));
    assert_eq!(page_listed_after(contents, "beta_app"), Some(beta));
    assert!(texts[0].contains(&format!("Page 1 of {}", outcome.page_count)));

    assert!(fs::read_to_string(html).unwrap().contains("id=\"alpha_app\""));

    let leftovers: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("temp_manual"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn empty_source_dir_yields_title_and_empty_contents() {
    let source = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let options = GuideOptions {
        source_dir: source.path().to_path_buf(),
        output: out.path().join("guide.pdf"),
        ..GuideOptions::default()
    };

    let outcome = generate_guide(&options).unwrap();
    assert!(outcome.titles.is_empty());
    assert!(outcome.page_count >= 1);
    assert!(out.path().join("guide.pdf").is_file());
}

#[test]
fn missing_source_dir_fails_without_leaving_files() {
    let out = tempfile::tempdir().unwrap();
    let options = GuideOptions {
        source_dir: out.path().join("missing"),
        output: out.path().join("guide.pdf"),
        ..GuideOptions::default()
    };

    assert!(generate_guide(&options).is_err());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

//! Round-trip tests.
//!
//! Exporting a project and importing the unedited document back must be a
//! no-op: same skeleton, same textual fields, no placeholder artifacts.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use plume::novel::{Chapter, ChapterKind, Character, Item, Location, Novel, Scene};
use plume::yw7::{parse_yw7, render_yw7};
use plume::{Skeleton, Target};

// ============================================================================
// Fixture
// ============================================================================

fn sample_novel() -> Novel {
    let mut novel = Novel::new();
    novel.title = "The Harbor Year".to_string();
    novel.author = "A. Writer".to_string();
    novel.description = "A story about boats.".to_string();

    let mut part = Chapter::new("1");
    part.title = "Part One".to_string();
    part.kind = ChapterKind::SectionStart;
    part.description = Some("Where it starts.".to_string());
    novel.chapter_order.push("1".to_string());
    novel.chapters.insert("1".to_string(), part);

    let mut chapter = Chapter::new("2");
    chapter.title = "Arrival".to_string();
    chapter.description = Some("Ann arrives.\nIt rains.".to_string());
    chapter.scenes = vec!["1".to_string(), "2".to_string(), "3".to_string()];
    novel.chapter_order.push("2".to_string());
    novel.chapters.insert("2".to_string(), chapter);

    let mut scene = Scene::new("1");
    scene.title = "Quay".to_string();
    scene.set_body("The boat came in [i]late[/i].\n\nNobody waited.");
    scene.description = Some("Arrival scene.".to_string());
    scene.tags = vec!["opening".to_string()];
    novel.scenes.insert("1".to_string(), scene);

    let mut scene = Scene::new("2");
    scene.title = "Empty".to_string();
    scene.set_body("");
    novel.scenes.insert("2".to_string(), scene);

    let mut scene = Scene::new("3");
    scene.title = "Joined".to_string();
    scene.set_body("Same moment, other eyes.");
    scene.append_to_previous = true;
    novel.scenes.insert("3".to_string(), scene);

    let mut ann = Character::new("1");
    ann.title = "Ann".to_string();
    ann.full_name = Some("Ann Example".to_string());
    ann.description = Some("The pilot.".to_string());
    ann.is_major = true;
    novel.character_order.push("1".to_string());
    novel.characters.insert("1".to_string(), ann);

    let mut harbor = Location::new("1");
    harbor.title = "Harbor".to_string();
    harbor.description = Some("Salt and rust.".to_string());
    novel.location_order.push("1".to_string());
    novel.locations.insert("1".to_string(), harbor);

    let mut rope = Item::new("1");
    rope.title = "Mooring rope".to_string();
    novel.item_order.push("1".to_string());
    novel.items.insert("1".to_string(), rope);

    novel
}

/// Write the fixture project into a temp dir and return its path.
fn project_on_disk(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("harbor.yw7");
    fs::write(&path, render_yw7(&sample_novel())).unwrap();
    path
}

fn reload(path: &PathBuf) -> Novel {
    parse_yw7(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Unedited round trips
// ============================================================================

#[test]
fn test_manuscript_unedited_round_trip() {
    let dir = TempDir::new().unwrap();
    let project = project_on_disk(&dir);

    let message = plume::export(&project, Target::Manuscript).unwrap();
    assert!(message.starts_with("SUCCESS"));

    let document = dir.path().join("harbor_manuscript.html");
    assert!(document.is_file());

    let message = plume::import(&document, Target::Manuscript).unwrap();
    assert!(message.starts_with("SUCCESS"));

    let reloaded = reload(&project);
    let original = sample_novel();

    assert!(
        Skeleton::narrative(&original)
            .verify_matches(&Skeleton::narrative(&reloaded))
            .is_ok()
    );
    for id in ["1", "2", "3"] {
        assert_eq!(reloaded.scenes[id].body(), original.scenes[id].body());
        assert_eq!(
            reloaded.scenes[id].word_count(),
            original.scenes[id].word_count()
        );
    }
    // Fields the manuscript does not own are untouched.
    assert_eq!(
        reloaded.scenes["1"].description,
        original.scenes["1"].description
    );
    assert_eq!(
        reloaded.chapters["2"].description,
        original.chapters["2"].description
    );
}

#[test]
fn test_empty_body_stays_empty_not_placeholder() {
    let dir = TempDir::new().unwrap();
    let project = project_on_disk(&dir);

    plume::export(&project, Target::Manuscript).unwrap();
    let document = dir.path().join("harbor_manuscript.html");

    // The exported document must not show a placeholder space as content.
    let html = fs::read_to_string(&document).unwrap();
    assert!(html.contains("<p class=\"textbody\"></p>"));

    plume::import(&document, Target::Manuscript).unwrap();
    let reloaded = reload(&project);
    assert_eq!(reloaded.scenes["2"].body(), "");
    assert_eq!(reloaded.scenes["2"].letter_count(), 0);

    // On disk the empty body is stored as the single-space CDATA
    // placeholder, which never reaches the model.
    let xml = fs::read_to_string(&project).unwrap();
    assert!(xml.contains("<SceneContent><![CDATA[ ]]></SceneContent>"));
}

#[test]
fn test_description_flavors_round_trip() {
    for target in [
        Target::ChapterDescriptions,
        Target::SceneDescriptions,
        Target::CharacterSheet,
        Target::LocationSheet,
        Target::ItemSheet,
    ] {
        let dir = TempDir::new().unwrap();
        let project = project_on_disk(&dir);

        plume::export(&project, target).unwrap();
        let document = dir
            .path()
            .join(format!("harbor{}.{}", target.suffix(), target.extension()));
        plume::import(&document, target).unwrap();

        let reloaded = reload(&project);
        let original = sample_novel();
        assert_eq!(
            reloaded.chapters["2"].description, original.chapters["2"].description,
            "chapter description drifted for {target:?}"
        );
        assert_eq!(
            reloaded.scenes["1"].description, original.scenes["1"].description,
            "scene description drifted for {target:?}"
        );
        assert_eq!(
            reloaded.characters["1"].description, original.characters["1"].description,
            "character description drifted for {target:?}"
        );
    }
}

#[test]
fn test_table_flavors_round_trip() {
    for target in [
        Target::SceneList,
        Target::CharacterList,
        Target::LocationList,
        Target::ItemList,
    ] {
        let dir = TempDir::new().unwrap();
        let project = project_on_disk(&dir);

        plume::export(&project, target).unwrap();
        let document = dir
            .path()
            .join(format!("harbor{}.{}", target.suffix(), target.extension()));
        plume::import(&document, target).unwrap();

        let reloaded = reload(&project);
        let original = sample_novel();
        assert_eq!(reloaded.scenes["1"].title, original.scenes["1"].title);
        assert_eq!(reloaded.scenes["1"].tags, original.scenes["1"].tags);
        assert_eq!(
            reloaded.characters["1"].full_name,
            original.characters["1"].full_name
        );
        assert_eq!(
            reloaded.characters["1"].is_major,
            original.characters["1"].is_major
        );
    }
}

// ============================================================================
// Edits and new projects
// ============================================================================

#[test]
fn test_edited_body_recounts_on_import() {
    let dir = TempDir::new().unwrap();
    let project = project_on_disk(&dir);

    plume::export(&project, Target::Manuscript).unwrap();
    let document = dir.path().join("harbor_manuscript.html");

    // Replace scene 3's body with a known two-word text.
    let html = fs::read_to_string(&document).unwrap();
    let edited = html.replace(
        "<p class=\"textbody\">Same moment, other eyes.</p>",
        "<p class=\"textbody\">Hello</p>\n<p><br /></p>\n<p>World</p>",
    );
    assert_ne!(html, edited);
    fs::write(&document, edited).unwrap();

    plume::import(&document, Target::Manuscript).unwrap();
    let reloaded = reload(&project);
    assert_eq!(reloaded.scenes["3"].body(), "Hello\n\nWorld");
    assert_eq!(reloaded.scenes["3"].word_count(), 2);
    assert_eq!(reloaded.scenes["3"].letter_count(), 10);
}

#[test]
fn test_convert_detects_direction_from_path() {
    let dir = TempDir::new().unwrap();
    let project = project_on_disk(&dir);

    // .yw7 → export.
    let message = plume::convert(&project).unwrap();
    assert!(message.starts_with("SUCCESS"));

    // _manuscript.html → import.
    let document = dir.path().join("harbor_manuscript.html");
    let message = plume::convert(&document).unwrap();
    assert!(message.starts_with("SUCCESS"));
}

#[test]
fn test_new_project_from_plain_document_round_trips() {
    let dir = TempDir::new().unwrap();
    let document = dir.path().join("fresh.html");
    fs::write(
        &document,
        "<html><body>\n<h2>Chapter A</h2>\n\
         <p>Some opening text that is long enough to count as a draft scene.</p>\n\
         <h4>* * *</h4>\n<p>Another scene.</p>\n</body></html>",
    )
    .unwrap();

    // A plain .html without a flavor suffix creates a new project.
    let message = plume::convert(&document).unwrap();
    assert!(message.starts_with("SUCCESS"));

    let project = dir.path().join("fresh.yw7");
    let novel = reload(&project);
    assert_eq!(novel.chapter_order, vec!["1"]);
    assert_eq!(novel.chapters["1"].scenes, vec!["1", "2"]);
    assert_eq!(novel.scenes["2"].body(), "Another scene.");

    // The new project round-trips like any other.
    plume::export(&project, Target::Manuscript).unwrap();
    plume::import(
        &dir.path().join("fresh_manuscript.html"),
        Target::Manuscript,
    )
    .unwrap();
    let reloaded = reload(&project);
    assert_eq!(reloaded.scenes["2"].body(), "Another scene.");
}

#[test]
fn test_unused_nodes_are_left_out_but_kept_in_project() {
    let dir = TempDir::new().unwrap();
    let mut novel = sample_novel();
    novel
        .chapters
        .get_mut("2")
        .unwrap()
        .scenes
        .push("4".to_string());
    let mut hidden = Scene::new("4");
    hidden.title = "Hidden".to_string();
    hidden.is_unused = true;
    hidden.set_body("Not for export.");
    novel.scenes.insert("4".to_string(), hidden);

    let project = dir.path().join("harbor.yw7");
    fs::write(&project, render_yw7(&novel)).unwrap();

    plume::export(&project, Target::Manuscript).unwrap();
    let html = fs::read_to_string(dir.path().join("harbor_manuscript.html")).unwrap();
    assert!(!html.contains("[ScID:4]"));
    assert!(!html.contains("Not for export."));

    // The document carries no trace of scene 4; import still succeeds and
    // the unused scene survives untouched.
    plume::import(
        &dir.path().join("harbor_manuscript.html"),
        Target::Manuscript,
    )
    .unwrap();
    let reloaded = reload(&project);
    assert_eq!(reloaded.scenes["4"].body(), "Not for export.");
}

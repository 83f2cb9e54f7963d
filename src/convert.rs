//! The conversion runner.
//!
//! One call per file pair, direction chosen by the source file's name: a
//! `.yw7` path exports a document, a path ending in a known
//! `<suffix>.<extension>` imports that document back into the sibling
//! project file. Import never mutates the project until the document's
//! skeleton has been verified and every id matched.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::merge::{self, DocumentPatch};
use crate::novel::Novel;
use crate::structure::Skeleton;
use crate::util::{read_text_file, write_text_file};
use crate::{csv, html, yw7};

/// The document flavors a project can be exported to and imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Full editable manuscript with invisible structural markers.
    Manuscript,
    /// Manuscript variant with visible markers, for printed proofs.
    Proof,
    /// Chapter descriptions.
    ChapterDescriptions,
    /// Scene descriptions, nested under their chapters.
    SceneDescriptions,
    /// Character descriptions.
    CharacterSheet,
    /// Location descriptions.
    LocationSheet,
    /// Item descriptions.
    ItemSheet,
    /// Scene table with counts, tags, and notes.
    SceneList,
    /// Character table.
    CharacterList,
    /// Location table.
    LocationList,
    /// Item table.
    ItemList,
}

impl Target {
    pub const ALL: [Target; 11] = [
        Target::Manuscript,
        Target::Proof,
        Target::ChapterDescriptions,
        Target::SceneDescriptions,
        Target::CharacterSheet,
        Target::LocationSheet,
        Target::ItemSheet,
        Target::SceneList,
        Target::CharacterList,
        Target::LocationList,
        Target::ItemList,
    ];

    /// The file name suffix selecting this flavor.
    pub fn suffix(self) -> &'static str {
        match self {
            Target::Manuscript => "_manuscript",
            Target::Proof => "_proof",
            Target::ChapterDescriptions => "_chapters",
            Target::SceneDescriptions => "_scenes",
            Target::CharacterSheet => "_characters",
            Target::LocationSheet => "_locations",
            Target::ItemSheet => "_items",
            Target::SceneList => "_scenelist",
            Target::CharacterList => "_charlist",
            Target::LocationList => "_loclist",
            Target::ItemList => "_itemlist",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Target::Manuscript
            | Target::Proof
            | Target::ChapterDescriptions
            | Target::SceneDescriptions
            | Target::CharacterSheet
            | Target::LocationSheet
            | Target::ItemSheet => html::EXTENSION,
            Target::SceneList
            | Target::CharacterList
            | Target::LocationList
            | Target::ItemList => csv::EXTENSION,
        }
    }

    /// Match a suffix argument like `_manuscript` (leading underscore
    /// optional).
    pub fn from_suffix(suffix: &str) -> Option<Target> {
        let normalized = suffix.strip_prefix('_').unwrap_or(suffix);
        Target::ALL
            .into_iter()
            .find(|t| t.suffix().trim_start_matches('_') == normalized)
    }

    /// Recognize a document path like `book_manuscript.html`.
    pub fn from_document_path(path: &Path) -> Option<Target> {
        let name = path.file_name()?.to_str()?;
        Target::ALL
            .into_iter()
            .find(|t| name.ends_with(&format!("{}.{}", t.suffix(), t.extension())))
    }

    /// The skeleton scope this flavor is verified against.
    fn expected_skeleton(self, novel: &Novel) -> Skeleton {
        match self {
            Target::Manuscript | Target::Proof | Target::SceneDescriptions => {
                Skeleton::narrative(novel)
            }
            Target::ChapterDescriptions => Skeleton::chapters(novel),
            Target::CharacterSheet | Target::CharacterList => Skeleton::characters(novel),
            Target::LocationSheet | Target::LocationList => Skeleton::locations(novel),
            Target::ItemSheet | Target::ItemList => Skeleton::items(novel),
            Target::SceneList => Skeleton::scene_rows(novel),
        }
    }
}

/// Convert one file, direction chosen by its name.
///
/// A `.yw7` source exports the manuscript; use [`export`] for other
/// flavors. A recognized document source imports into the sibling
/// project, and a plain `.html` file without a flavor suffix creates a
/// brand-new project from its headings and dividers.
pub fn convert(source: &Path) -> Result<String> {
    if has_extension(source, yw7::EXTENSION) {
        return export(source, Target::Manuscript);
    }
    match Target::from_document_path(source) {
        Some(target) => import(source, target),
        None if has_extension(source, html::EXTENSION) => new_project(source),
        None => Err(Error::UnsupportedFormat(source.display().to_string())),
    }
}

/// Create a new project from a marker-free document.
pub fn new_project(document: &Path) -> Result<String> {
    let text = read_text_file(document)?;
    let title = document
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("New Project");

    let novel = html::read_new_project(&text, title)?;
    let project = document.with_extension(yw7::EXTENSION);
    yw7::write_yw7(&novel, &project)?;

    Ok(format!(
        "SUCCESS: {} nodes written to \"{}\".",
        novel.chapter_order.len() + novel.scenes.len(),
        project.display()
    ))
}

/// Export a project to one document flavor. Returns the success message.
pub fn export(project: &Path, target: Target) -> Result<String> {
    if !has_extension(project, yw7::EXTENSION) {
        return Err(Error::UnsupportedFormat(project.display().to_string()));
    }

    let novel = yw7::read_yw7(project)?;
    let document = document_path(project, target);

    let text = match target {
        Target::Manuscript => html::manuscript(&novel),
        Target::Proof => html::proof(&novel),
        Target::ChapterDescriptions => html::chapter_descriptions(&novel),
        Target::SceneDescriptions => html::scene_descriptions(&novel),
        Target::CharacterSheet => html::character_sheet(&novel),
        Target::LocationSheet => html::location_sheet(&novel),
        Target::ItemSheet => html::item_sheet(&novel),
        Target::SceneList => csv::write_scene_list(&novel, &document),
        Target::CharacterList => csv::write_character_list(&novel),
        Target::LocationList => csv::write_location_list(&novel),
        Target::ItemList => csv::write_item_list(&novel),
    };
    write_text_file(&document, &text)?;

    let nodes = target.expected_skeleton(&novel).len();
    Ok(format!(
        "SUCCESS: {} nodes written to \"{}\".",
        nodes,
        document.display()
    ))
}

/// Import an edited document back into its project.
///
/// Pipeline: read project, read document, decode, verify the skeleton,
/// merge by id, write the project. Any failure before the final write
/// leaves the project file untouched.
pub fn import(document: &Path, target: Target) -> Result<String> {
    let project = project_path(document, target)?;
    let mut novel = yw7::read_yw7(&project)?;

    let text = read_text_file(document)?;
    let (skeleton, patch) = read_document(&text, target)?;

    // An invented id is reported as such, not as a positional mismatch.
    verify_known_ids(&novel, &skeleton)?;
    target
        .expected_skeleton(&novel)
        .verify_matches(&skeleton)?;
    let count = merge::apply(&mut novel, &patch)?;
    yw7::write_yw7(&novel, &project)?;

    Ok(format!(
        "SUCCESS: {} nodes written to \"{}\".",
        count,
        project.display()
    ))
}

/// Every id the edited document mentions must exist in the project.
fn verify_known_ids(novel: &Novel, skeleton: &Skeleton) -> Result<()> {
    use crate::novel::NodeKind;

    for node in skeleton.nodes() {
        let known = match node.kind {
            NodeKind::Chapter => novel.chapters.contains_key(&node.id),
            NodeKind::Scene => novel.scenes.contains_key(&node.id),
            NodeKind::Character => novel.characters.contains_key(&node.id),
            NodeKind::Location => novel.locations.contains_key(&node.id),
            NodeKind::Item => novel.items.contains_key(&node.id),
        };
        if !known {
            return Err(Error::UnknownIdentifier {
                kind: node.kind.label(),
                id: node.id.clone(),
            });
        }
    }
    Ok(())
}

fn read_document(text: &str, target: Target) -> Result<(Skeleton, DocumentPatch)> {
    match target {
        Target::Manuscript | Target::Proof => html::read_manuscript(text),
        Target::ChapterDescriptions => html::read_chapter_descriptions(text),
        Target::SceneDescriptions => html::read_scene_descriptions(text),
        Target::CharacterSheet => html::read_character_sheet(text),
        Target::LocationSheet => html::read_location_sheet(text),
        Target::ItemSheet => html::read_item_sheet(text),
        Target::SceneList => csv::read_scene_list(text),
        Target::CharacterList => csv::read_character_list(text),
        Target::LocationList => csv::read_location_list(text),
        Target::ItemList => csv::read_item_list(text),
    }
}

/// `book.yw7` + `_manuscript` → `book_manuscript.html`, next to the
/// project.
pub fn document_path(project: &Path, target: Target) -> PathBuf {
    let stem = project
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    project.with_file_name(format!("{stem}{}.{}", target.suffix(), target.extension()))
}

/// `book_manuscript.html` → `book.yw7`.
fn project_path(document: &Path, target: Target) -> Result<PathBuf> {
    let name = document
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::UnsupportedFormat(document.display().to_string()))?;

    let ending = format!("{}.{}", target.suffix(), target.extension());
    let stem = name
        .strip_suffix(&ending)
        .ok_or_else(|| Error::UnsupportedFormat(document.display().to_string()))?;

    Ok(document.with_file_name(format!("{stem}.{}", yw7::EXTENSION)))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

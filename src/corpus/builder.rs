//! Document tree → page set.
//!
//! Every chapter becomes a namespace with an intro page holding the
//! chapter's own paragraphs. Every direct section of a chapter becomes a
//! page of its own; deeper sections are rendered inline as sub-headings.

use std::collections::HashSet;

use crate::model::{Document, NodeId, NodeKind};
use crate::wiki::{SectionRenderer, disambiguate, slugify};

use super::page::Page;

/// Configuration for [`CorpusBuilder`].
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Name of each chapter's intro page.
    pub intro_page: String,
    /// Page file extension (without the dot).
    pub extension: String,
    /// Name prefix for chapters without a usable title.
    pub untitled_chapter: String,
    /// Name prefix for sections without a usable title.
    pub untitled_section: String,
    /// Recursion limit for section and inline nesting.
    pub max_depth: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            intro_page: "start".to_string(),
            extension: "txt".to_string(),
            untitled_chapter: "unbenanntes_kapitel".to_string(),
            untitled_section: "unbenannt".to_string(),
            max_depth: crate::wiki::extract::DEFAULT_MAX_DEPTH,
        }
    }
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intro_page(mut self, name: impl Into<String>) -> Self {
        self.intro_page = name.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Two siblings whose titles produced the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    /// Namespace the clash happened in (empty for chapter directories).
    pub namespace: Vec<String>,
    /// The name both titles sanitized to.
    pub slug: String,
    /// The name given to the later sibling instead.
    pub assigned: String,
}

/// Pages produced from one document.
#[derive(Debug, Clone, Default)]
pub struct BuiltCorpus {
    /// Pages in document order: each chapter's intro page, then its sections.
    pub pages: Vec<Page>,
    pub collisions: Vec<SlugCollision>,
}

/// Names already handed out within one directory.
#[derive(Debug, Default)]
struct NameScope {
    taken: HashSet<String>,
}

impl NameScope {
    fn reserving(names: &[&str]) -> Self {
        Self {
            taken: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Claim `base`, or the first free `base_N` (N ≥ 2) if it is taken.
    fn claim(&mut self, base: &str) -> (String, bool) {
        if self.taken.insert(base.to_string()) {
            return (base.to_string(), false);
        }
        let mut occurrence = 2;
        loop {
            let candidate = disambiguate(base, occurrence);
            if self.taken.insert(candidate.clone()) {
                return (candidate, true);
            }
            occurrence += 1;
        }
    }
}

/// Builds the page set for a document.
#[derive(Debug, Clone, Default)]
pub struct CorpusBuilder {
    config: BuildConfig,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Render all pages of `doc`.
    ///
    /// Pure and deterministic: the same document always yields the same
    /// pages with the same names, including disambiguated ones.
    pub fn build(&self, doc: &Document) -> BuiltCorpus {
        let renderer = SectionRenderer::new(doc).with_max_depth(self.config.max_depth);
        let mut corpus = BuiltCorpus::default();
        let mut chapter_names = NameScope::default();

        for (index, chapter) in doc.chapters().enumerate() {
            let base = self.name_for(
                &renderer,
                chapter,
                &self.config.untitled_chapter,
                index + 1,
            );
            let (dir, collided) = chapter_names.claim(&base);
            if collided {
                log::warn!("Chapter name {base:?} already used, writing to {dir:?}");
                corpus.collisions.push(SlugCollision {
                    namespace: Vec::new(),
                    slug: base,
                    assigned: dir.clone(),
                });
            }

            corpus.pages.push(Page::new(
                vec![dir.clone(), self.config.intro_page.clone()],
                renderer.render_intro(chapter),
            ));

            self.build_sections(doc, &renderer, chapter, &dir, &mut corpus);
        }

        log::debug!(
            "Rendered {} pages ({} name collisions)",
            corpus.pages.len(),
            corpus.collisions.len()
        );
        corpus
    }

    fn build_sections(
        &self,
        doc: &Document,
        renderer: &SectionRenderer<'_>,
        chapter: NodeId,
        dir: &str,
        corpus: &mut BuiltCorpus,
    ) {
        let mut names = NameScope::reserving(&[self.config.intro_page.as_str()]);

        for (index, section) in doc.children_of_kind(chapter, NodeKind::Section).enumerate() {
            let base = self.name_for(
                renderer,
                section,
                &self.config.untitled_section,
                index + 1,
            );
            let (name, collided) = names.claim(&base);
            if collided {
                log::warn!("Page name {dir}/{base} already used, writing to {dir}/{name}");
                corpus.collisions.push(SlugCollision {
                    namespace: vec![dir.to_string()],
                    slug: base,
                    assigned: name.clone(),
                });
            }

            corpus.pages.push(Page::new(
                vec![dir.to_string(), name],
                renderer.render(section, 1),
            ));
        }
    }

    /// Slug of the node's title, or `{prefix}_{position}` when it has none.
    fn name_for(
        &self,
        renderer: &SectionRenderer<'_>,
        node: NodeId,
        prefix: &str,
        position: usize,
    ) -> String {
        match renderer.title_text(node) {
            Some(title) => slugify(&title),
            None => {
                let name = format!("{prefix}_{position}");
                log::warn!("Node {} has no title, naming it {name:?}", node.0);
                name
            }
        }
    }
}

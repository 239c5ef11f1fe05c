//! Style Cascade & Resolver
//!
//! Computes the declarations that apply to a component by:
//! 1. Matching every active style definition against the component
//! 2. Sorting matches by priority, then source order
//! 3. Merging declarations in that order, with important declarations protected

use serde::{Deserialize, Serialize};

use crate::declarations::{DeclarationSet, VariableSet};
use crate::matcher::StyleTree;
use crate::parser::Stylesheet;
use crate::rules::{FontFace, OutputFormat, PageGroup, PageSelector, Rule, StyleDefinition};
use crate::selector::ComponentState;

/// Resolution settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Selects which `@media` groups are active
    pub output: OutputFormat,
}

/// The merged result for one component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle {
    pub declarations: DeclarationSet,
    pub variables: VariableSet,
}

/// A style definition that matched, with the priority it matched at
#[derive(Debug, Clone, Copy)]
pub struct MatchedRule<'s> {
    pub priority: i64,
    /// Position among the active definitions
    pub order: usize,
    pub definition: &'s StyleDefinition,
}

/// Resolves styles from a parsed rule list
#[derive(Debug, Clone)]
pub struct StyleResolver<'s> {
    options: ResolveOptions,
    definitions: Vec<&'s StyleDefinition>,
    pages: Vec<&'s PageGroup>,
    font_faces: Vec<&'s FontFace>,
}

impl<'s> StyleResolver<'s> {
    pub fn new(stylesheet: &'s Stylesheet) -> Self {
        Self::with_options(&stylesheet.rules, ResolveOptions::default())
    }

    /// Flatten `rules`, keeping only media groups active for `options.output`
    pub fn with_options(rules: &'s [Rule], options: ResolveOptions) -> Self {
        let mut resolver = Self {
            options,
            definitions: Vec::new(),
            pages: Vec::new(),
            font_faces: Vec::new(),
        };
        resolver.collect(rules);
        resolver
    }

    fn collect(&mut self, rules: &'s [Rule]) {
        for rule in rules {
            match rule {
                Rule::Style(definition) => self.definitions.push(definition),
                Rule::Page(page) => self.pages.push(page),
                Rule::FontFace(face) => self.font_faces.push(face),
                Rule::Media(group) if group.matches(self.options.output) => self.collect(&group.rules),
                Rule::Media(group) => {
                    tracing::trace!(media = %group.predicate_text, "inactive media group");
                }
            }
        }
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Active style definitions in source order
    pub fn definitions(&self) -> &[&'s StyleDefinition] {
        &self.definitions
    }

    /// Matching definitions in cascade order (lowest precedence first)
    pub fn matching<T: StyleTree + ?Sized>(
        &self,
        tree: &T,
        node: T::NodeId,
        state: ComponentState,
    ) -> Vec<MatchedRule<'s>> {
        let mut matches: Vec<MatchedRule<'s>> = self
            .definitions
            .iter()
            .copied()
            .enumerate()
            .filter_map(|(order, definition)| {
                definition
                    .matcher
                    .is_matched(tree, node, state)
                    .map(|priority| MatchedRule {
                        priority,
                        order,
                        definition,
                    })
            })
            .collect();

        matches.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.order.cmp(&b.order)));
        matches
    }

    /// Merge every matching declaration for `node` rendered in `state`
    pub fn resolve<T: StyleTree + ?Sized>(&self, tree: &T, node: T::NodeId, state: ComponentState) -> ResolvedStyle {
        let mut resolved = ResolvedStyle::default();
        for matched in self.matching(tree, node, state) {
            resolved.declarations.merge_all(&matched.definition.declarations);
            resolved.variables.merge_all(&matched.definition.variables);
        }
        resolved
    }

    /// Resolve each node in the given order, using the state each component reports
    pub fn resolve_all<T, I>(&self, tree: &T, nodes: I) -> Vec<(T::NodeId, ResolvedStyle)>
    where
        T: StyleTree + ?Sized,
        I: IntoIterator<Item = T::NodeId>,
    {
        nodes
            .into_iter()
            .filter_map(|node| {
                let state = tree.component(node)?.state;
                Some((node, self.resolve(tree, node, state)))
            })
            .collect()
    }

    /// Page declarations: match-all groups first, then groups naming the page class
    pub fn resolve_page(&self, page_class: Option<&str>) -> DeclarationSet {
        let mut declarations = DeclarationSet::new();
        let general = self.pages.iter().filter(|page| page.selector == PageSelector::All);
        let named = self
            .pages
            .iter()
            .filter(|page| page.selector != PageSelector::All && page.matches(page_class));
        for page in general.chain(named) {
            declarations.merge_all(&page.declarations);
        }
        declarations
    }

    /// Every active `@font-face`, in source order
    pub fn font_faces(&self) -> &[&'s FontFace] {
        &self.font_faces
    }
}

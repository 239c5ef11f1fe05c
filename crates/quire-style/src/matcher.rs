//! Selector matching against a component tree
//!
//! The host document is reached through [`StyleTree`]: components are identified by
//! a copyable handle and the tree answers "what are this node's style attributes" and
//! "who is its parent". Nodes that answer `None` for their attributes are not styled
//! and are stepped over when walking ancestors.

use std::fmt;

use crate::error::SelectorError;
use crate::selector::{Combinator, ComponentState, Compound, Selector};

/// The style-relevant attributes of one component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentContext<'a> {
    pub id: Option<&'a str>,
    /// Element (tag) name
    pub element: Option<&'a str>,
    /// Whitespace separated class list
    pub style_class: Option<&'a str>,
    /// State the component currently renders in
    pub state: ComponentState,
    /// True for the document root
    pub is_document: bool,
}

impl<'a> ComponentContext<'a> {
    pub fn element(element: &'a str) -> Self {
        Self {
            element: Some(element),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_class(mut self, style_class: &'a str) -> Self {
        self.style_class = Some(style_class);
        self
    }

    pub fn with_state(mut self, state: ComponentState) -> Self {
        self.state = state;
        self
    }

    pub fn document(mut self) -> Self {
        self.is_document = true;
        self
    }

    /// Whether `class` is one of the whitespace separated names in the class list
    pub fn has_class(&self, class: &str) -> bool {
        self.style_class.is_some_and(|list| has_class(list, class))
    }
}

/// Whether `class` appears in `class_list` as a whole word
pub fn has_class(class_list: &str, class: &str) -> bool {
    class_list.split_whitespace().any(|name| name == class)
}

/// Read access to the component hierarchy being styled
pub trait StyleTree {
    type NodeId: Copy;

    /// Style attributes of a node, or `None` if the node is not styled
    fn component(&self, node: Self::NodeId) -> Option<ComponentContext<'_>>;

    /// Parent of a node, `None` at the root
    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;
}

/// Walks the styled ancestors of a node, nearest first
pub struct StyledAncestors<'t, T: StyleTree + ?Sized> {
    tree: &'t T,
    next: Option<T::NodeId>,
}

impl<'t, T: StyleTree + ?Sized> StyledAncestors<'t, T> {
    pub fn new(tree: &'t T, node: T::NodeId) -> Self {
        Self {
            tree,
            next: tree.parent(node),
        }
    }
}

impl<'t, T: StyleTree + ?Sized> Iterator for StyledAncestors<'t, T> {
    type Item = (T::NodeId, ComponentContext<'t>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.next {
            self.next = self.tree.parent(node);
            if let Some(component) = self.tree.component(node) {
                return Some((node, component));
            }
        }
        None
    }
}

impl Compound {
    /// Test this compound alone; cheapest checks first
    pub fn matches_component(&self, component: &ComponentContext<'_>, state: ComponentState) -> bool {
        if self.state != ComponentState::Normal && self.state != state {
            return false;
        }
        if let Some(id) = &self.id {
            if component.id != Some(id.as_str()) {
                return false;
            }
        }
        if let Some(element) = &self.element {
            if component.element != Some(element.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| component.has_class(class)) {
            return false;
        }
        !self.document_root || component.is_document
    }
}

impl Selector {
    /// Priority of the match if `node`, rendered in `state`, satisfies the selector.
    ///
    /// A direct parent is tested in the normal state; other ancestors are tested in
    /// `state`, the same state as the subject.
    pub fn is_matched<T: StyleTree + ?Sized>(&self, tree: &T, node: T::NodeId, state: ComponentState) -> Option<i64> {
        let component = tree.component(node)?;
        self.matches_at(0, tree, node, &component, state)
            .then(|| self.priority())
    }

    fn matches_at<T: StyleTree + ?Sized>(
        &self,
        idx: usize,
        tree: &T,
        node: T::NodeId,
        component: &ComponentContext<'_>,
        state: ComponentState,
    ) -> bool {
        let Some(compound) = self.compound(idx) else {
            return false;
        };
        if !compound.matches_component(component, state) {
            return false;
        }
        let Some(ancestor) = compound.ancestor else {
            return true;
        };

        let mut ancestors = StyledAncestors::new(tree, node);
        match compound.combinator {
            Combinator::Child => ancestors
                .next()
                .is_some_and(|(parent, ctx)| self.matches_at(ancestor, tree, parent, &ctx, ComponentState::Normal)),
            Combinator::Descendant => {
                ancestors.any(|(above, ctx)| self.matches_at(ancestor, tree, above, &ctx, state))
            }
        }
    }
}

/// A compiled selector list as used by a style definition
#[derive(Debug, Clone, PartialEq)]
pub enum StyleMatcher {
    /// `*`: matches everything
    Universal,
    /// `:root`: matches the document root
    Root,
    Single(Selector),
    /// First alternative of a comma list followed by the rest
    Multiple(Selector, Box<StyleMatcher>),
    /// Selector text that failed to compile; never matches
    Never(String),
}

impl StyleMatcher {
    /// Compile a selector list such as `h1, h2.title, div > p`
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let trimmed = text.trim();
        if trimmed == "*" {
            return Ok(Self::Universal);
        }
        if trimmed.eq_ignore_ascii_case(":root") {
            return Ok(Self::Root);
        }

        let mut selectors = Vec::new();
        for alternative in trimmed.split(',') {
            selectors.push(Selector::parse(alternative)?);
        }

        let mut matcher = match selectors.pop() {
            Some(last) => Self::Single(last),
            None => return Err(SelectorError::Empty),
        };
        while let Some(previous) = selectors.pop() {
            matcher = Self::Multiple(previous, Box::new(matcher));
        }
        Ok(matcher)
    }

    /// Compile, falling back to a matcher that never matches
    pub fn parse_or_never(text: &str) -> (Self, Option<SelectorError>) {
        match Self::parse(text) {
            Ok(matcher) => (matcher, None),
            Err(err) => (Self::Never(text.trim().to_string()), Some(err)),
        }
    }

    /// Priority of the first alternative, in source order, that matches
    pub fn is_matched<T: StyleTree + ?Sized>(&self, tree: &T, node: T::NodeId, state: ComponentState) -> Option<i64> {
        match self {
            Self::Universal => tree.component(node).map(|_| 0),
            Self::Root => tree.component(node).filter(|c| c.is_document).map(|_| 0),
            Self::Single(selector) => selector.is_matched(tree, node, state),
            Self::Multiple(first, rest) => selector_or_rest(first, rest, tree, node, state),
            Self::Never(_) => None,
        }
    }

    /// The compiled alternatives, in source order
    pub fn selectors(&self) -> Vec<&Selector> {
        let mut out = Vec::new();
        let mut current = self;
        loop {
            match current {
                Self::Single(selector) => {
                    out.push(selector);
                    break;
                }
                Self::Multiple(first, rest) => {
                    out.push(first);
                    current = rest;
                }
                Self::Universal | Self::Root | Self::Never(_) => break,
            }
        }
        out
    }
}

fn selector_or_rest<T: StyleTree + ?Sized>(
    first: &Selector,
    rest: &StyleMatcher,
    tree: &T,
    node: T::NodeId,
    state: ComponentState,
) -> Option<i64> {
    first
        .is_matched(tree, node, state)
        .or_else(|| rest.is_matched(tree, node, state))
}

impl fmt::Display for StyleMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("*"),
            Self::Root => f.write_str(":root"),
            Self::Single(selector) => selector.fmt(f),
            Self::Multiple(first, rest) => write!(f, "{first}, {rest}"),
            Self::Never(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parent-indexed vector of optional components
    struct Flat(Vec<(Option<usize>, Option<ComponentContext<'static>>)>);

    impl StyleTree for Flat {
        type NodeId = usize;

        fn component(&self, node: usize) -> Option<ComponentContext<'_>> {
            self.0.get(node).and_then(|(_, c)| *c)
        }

        fn parent(&self, node: usize) -> Option<usize> {
            self.0.get(node).and_then(|(p, _)| *p)
        }
    }

    fn tree() -> Flat {
        Flat(vec![
            (None, Some(ComponentContext::element("doc").document())),
            (Some(0), Some(ComponentContext::element("div").with_class("outer"))),
            (Some(1), None),
            (Some(2), Some(ComponentContext::element("p").with_class("note wide").with_id("intro"))),
        ])
    }

    fn matched(selector: &str, node: usize) -> Option<i64> {
        StyleMatcher::parse(selector)
            .unwrap()
            .is_matched(&tree(), node, ComponentState::Normal)
    }

    #[test]
    fn test_class_word_boundaries() {
        assert!(has_class("note wide", "note"));
        assert!(has_class("  note\twide ", "wide"));
        assert!(!has_class("notes", "note"));
        assert!(!has_class("my-note", "note"));
        assert!(!has_class("", "note"));
    }

    #[test]
    fn test_subject_match() {
        assert_eq!(matched("p", 3), Some(1));
        assert_eq!(matched(".note", 3), Some(2));
        assert_eq!(matched(".note.wide", 3), Some(3));
        assert_eq!(matched("#intro", 3), Some(5));
        assert_eq!(matched(".missing", 3), None);
        assert_eq!(matched("p", 2), None);
    }

    #[test]
    fn test_direct_parent_skips_unstyled_nodes() {
        assert_eq!(matched("div > p", 3), Some(1 + 20));
        assert_eq!(matched("div > .note", 3), Some(41));
        assert_eq!(matched("doc > p", 3), None);
    }

    #[test]
    fn test_descendant_walks_all_ancestors() {
        assert_eq!(matched("doc p", 3), Some(11));
        assert_eq!(matched("doc .note", 3), Some(21));
        assert_eq!(matched("doc .outer p", 3), Some(1 + 2 * 10 + 100));
        assert_eq!(matched("span p", 3), None);
    }

    #[test]
    fn test_root_and_universal() {
        assert_eq!(matched(":root", 0), Some(0));
        assert_eq!(matched(":root", 3), None);
        assert_eq!(matched("*", 3), Some(0));
        assert_eq!(matched(":root p", 3), Some(10));
    }

    #[test]
    fn test_list_takes_first_matching_alternative() {
        assert_eq!(matched("h1, .note, #intro", 3), Some(2));
        assert_eq!(matched("h1, h2", 3), None);
    }

    #[test]
    fn test_state_filter() {
        let tree = tree();
        let matcher = StyleMatcher::parse("p::before").unwrap();
        assert_eq!(matcher.is_matched(&tree, 3, ComponentState::Normal), None);
        assert_eq!(matcher.is_matched(&tree, 3, ComponentState::Before), Some(1));
        let plain = StyleMatcher::parse("p").unwrap();
        assert_eq!(plain.is_matched(&tree, 3, ComponentState::Hover), Some(1));
    }

    #[test]
    fn test_ancestor_states() {
        let tree = tree();
        let descendant = StyleMatcher::parse("div:hover p").unwrap();
        assert_eq!(descendant.is_matched(&tree, 3, ComponentState::Normal), None);
        assert_eq!(descendant.is_matched(&tree, 3, ComponentState::Hover), Some(11));

        let child = StyleMatcher::parse("div:hover > p").unwrap();
        assert_eq!(child.is_matched(&tree, 3, ComponentState::Hover), None);
        let plain_child = StyleMatcher::parse("div > p").unwrap();
        assert_eq!(plain_child.is_matched(&tree, 3, ComponentState::Hover), Some(21));
    }

    #[test]
    fn test_never_matcher() {
        let (matcher, err) = StyleMatcher::parse_or_never("div >");
        assert!(err.is_some());
        assert_eq!(matcher, StyleMatcher::Never("div >".to_string()));
        assert_eq!(matcher.is_matched(&tree(), 3, ComponentState::Normal), None);
        assert!(StyleMatcher::parse("a, , b").is_err());
    }

    #[test]
    fn test_display() {
        let matcher = StyleMatcher::parse("h1 ,div>p.a").unwrap();
        assert_eq!(matcher.to_string(), "h1, div > p.a");
        assert_eq!(matcher.selectors().len(), 2);
        assert_eq!(StyleMatcher::parse(&matcher.to_string()).unwrap(), matcher);
    }
}

//! Compiled selectors
//!
//! A selector is a chain of compounds held in a flat arena. Index 0 is the subject
//! (the element being styled); each compound points at the ancestor compound it must
//! be nested inside, either anywhere above it or as its nearest styled parent.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::SelectorError;

const ELEMENT_PRIORITY: i64 = 1;
const CLASS_PRIORITY: i64 = 2;
const DOUBLE_CLASS_PRIORITY: i64 = 3;
const TRIPLE_CLASS_PRIORITY: i64 = 4;
const ID_PRIORITY: i64 = 5;

/// Weight multipliers by depth from the outermost compound
const ANCESTOR_FACTORS: [i64; 8] = [1, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000];
const DIRECT_ANCESTOR_FACTORS: [i64; 8] = [2, 20, 200, 2_000, 20_000, 200_000, 2_000_000, 20_000_000];

/// Interaction state a component is being styled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    #[default]
    Normal,
    Before,
    After,
    Hover,
}

impl ComponentState {
    /// Map a pseudo selector (`:hover`, `::before`, `:after`, ...) to a state
    pub fn from_pseudo(pseudo: &str) -> Option<Self> {
        let name = pseudo.trim_start_matches(':');
        match name.to_ascii_lowercase().as_str() {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "hover" => Some(Self::Hover),
            _ => None,
        }
    }

    fn pseudo_text(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Before => Some("::before"),
            Self::After => Some("::after"),
            Self::Hover => Some(":hover"),
        }
    }
}

/// How a compound relates to its ancestor compound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Combinator {
    /// Any styled ancestor (`a b`)
    #[default]
    Descendant,
    /// The nearest styled parent (`a > b`)
    Child,
}

/// One compound of a selector chain
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    pub element: Option<String>,
    pub id: Option<String>,
    /// All of these classes must be present
    pub classes: Vec<String>,
    pub state: ComponentState,
    /// Only matches the document root (`:root`)
    pub document_root: bool,
    /// Relationship to `ancestor`
    pub combinator: Combinator,
    /// Index of the ancestor compound in the owning selector
    pub ancestor: Option<usize>,
}

impl Compound {
    /// Specificity contributed by this compound alone
    pub fn weight(&self) -> i64 {
        let mut weight = 0;
        if self.element.is_some() {
            weight += ELEMENT_PRIORITY;
        }
        weight += match self.classes.len() {
            0 => 0,
            1 => CLASS_PRIORITY,
            2 => DOUBLE_CLASS_PRIORITY,
            _ => TRIPLE_CLASS_PRIORITY,
        };
        if self.id.is_some() {
            weight += ID_PRIORITY;
        }
        weight
    }

    /// True when the compound places no constraint at all (`*`)
    pub fn is_universal(&self) -> bool {
        self.element.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.state == ComponentState::Normal
            && !self.document_root
    }

    fn parse(token: &str) -> Result<Self, SelectorError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Part {
            Element,
            Class,
            Id,
        }

        let mut compound = Compound::default();
        let mut part = Part::Element;
        let mut name_start = 0;
        let mut universal = false;
        let mut pseudo_at = None;

        let flush = |compound: &mut Compound, part: Part, name: &str| -> Result<(), SelectorError> {
            match part {
                Part::Element if name.is_empty() => Ok(()),
                Part::Element => {
                    compound.element = Some(name.to_string());
                    Ok(())
                }
                Part::Class if name.is_empty() => Err(SelectorError::MissingName('.')),
                Part::Class => {
                    compound.classes.push(name.to_string());
                    Ok(())
                }
                Part::Id if name.is_empty() => Err(SelectorError::MissingName('#')),
                Part::Id if compound.id.is_some() => Err(SelectorError::DuplicateId),
                Part::Id => {
                    compound.id = Some(name.to_string());
                    Ok(())
                }
            }
        };

        for (i, c) in token.char_indices() {
            match c {
                '.' | '#' | ':' => {
                    flush(&mut compound, part, &token[name_start..i])?;
                    if c == ':' {
                        pseudo_at = Some(i);
                        break;
                    }
                    part = if c == '.' { Part::Class } else { Part::Id };
                    name_start = i + 1;
                }
                '*' if part == Part::Element && i == name_start && !universal => {
                    universal = true;
                    name_start = i + 1;
                }
                c if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => {}
                other => return Err(SelectorError::InvalidCharacter(other)),
            }
        }

        match pseudo_at {
            Some(at) => {
                let pseudo = &token[at..];
                if pseudo.eq_ignore_ascii_case(":root") {
                    compound.document_root = true;
                } else {
                    compound.state = ComponentState::from_pseudo(pseudo)
                        .ok_or_else(|| SelectorError::UnsupportedPseudo(pseudo.to_string()))?;
                }
            }
            None => flush(&mut compound, part, &token[name_start..])?,
        }
        Ok(compound)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_universal() {
            return f.write_str("*");
        }
        if let Some(element) = &self.element {
            f.write_str(element)?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        if self.document_root {
            f.write_str(":root")?;
        }
        if let Some(pseudo) = self.state.pseudo_text() {
            f.write_str(pseudo)?;
        }
        Ok(())
    }
}

/// A single compiled selector (no comma alternatives)
#[derive(Debug, Clone)]
pub struct Selector {
    compounds: Vec<Compound>,
    priority: OnceLock<i64>,
}

impl Selector {
    /// Build from compounds ordered subject first. Ancestor links are set here.
    pub fn from_compounds(mut compounds: Vec<Compound>) -> Result<Self, SelectorError> {
        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }
        let count = compounds.len();
        for (idx, compound) in compounds.iter_mut().enumerate() {
            compound.ancestor = (idx + 1 < count).then_some(idx + 1);
        }
        Ok(Self {
            compounds,
            priority: OnceLock::new(),
        })
    }

    /// Compile one selector such as `div.note > p#intro::before`
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let spaced = text.replace('>', " > ");
        let tokens: Vec<&str> = spaced.split_whitespace().collect();

        let mut compounds: Vec<Compound> = Vec::with_capacity(tokens.len());
        let mut awaiting_ancestor = false;
        for token in tokens.iter().rev() {
            if *token == ">" {
                let child = compounds.last_mut().ok_or(SelectorError::DanglingCombinator)?;
                if awaiting_ancestor {
                    return Err(SelectorError::DanglingCombinator);
                }
                child.combinator = Combinator::Child;
                awaiting_ancestor = true;
                continue;
            }
            compounds.push(Compound::parse(token)?);
            awaiting_ancestor = false;
        }
        if awaiting_ancestor {
            return Err(SelectorError::DanglingCombinator);
        }
        Self::from_compounds(compounds)
    }

    /// The compound matched against the element being styled
    pub fn subject(&self) -> &Compound {
        &self.compounds[0]
    }

    pub fn compound(&self, idx: usize) -> Option<&Compound> {
        self.compounds.get(idx)
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// Number of compounds in the chain
    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }

    /// Specificity; computed once and cached.
    ///
    /// Each compound's weight is scaled by its depth below the outermost compound
    /// (capped at 7), doubled when it is a direct child of its ancestor.
    pub fn priority(&self) -> i64 {
        *self.priority.get_or_init(|| self.calc_priority())
    }

    fn calc_priority(&self) -> i64 {
        let last_depth = ANCESTOR_FACTORS.len() - 1;
        let mut value = 0;
        for (depth, compound) in self.compounds.iter().rev().enumerate() {
            let depth = depth.min(last_depth);
            let weight = compound.weight();
            if depth == 0 {
                value = weight;
            } else if compound.combinator == Combinator::Child {
                value += weight * DIRECT_ANCESTOR_FACTORS[depth];
            } else {
                value += weight * ANCESTOR_FACTORS[depth];
            }
        }
        value
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.compounds == other.compounds
    }
}

impl Eq for Selector {}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in (0..self.compounds.len()).rev() {
            let compound = &self.compounds[idx];
            write!(f, "{compound}")?;
            if idx > 0 {
                match self.compounds[idx - 1].combinator {
                    Combinator::Child => f.write_str(" > ")?,
                    Combinator::Descendant => f.write_str(" ")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priority(text: &str) -> i64 {
        Selector::parse(text).unwrap().priority()
    }

    #[test]
    fn test_compound_parts() {
        let selector = Selector::parse("p.note.wide#intro::before").unwrap();
        let subject = selector.subject();
        assert_eq!(subject.element.as_deref(), Some("p"));
        assert_eq!(subject.classes, vec!["note", "wide"]);
        assert_eq!(subject.id.as_deref(), Some("intro"));
        assert_eq!(subject.state, ComponentState::Before);
        assert_eq!(subject.ancestor, None);
    }

    #[test]
    fn test_chain_links() {
        let selector = Selector::parse("body div > p").unwrap();
        assert_eq!(selector.len(), 3);
        assert_eq!(selector.subject().element.as_deref(), Some("p"));
        assert_eq!(selector.subject().combinator, Combinator::Child);
        assert_eq!(selector.subject().ancestor, Some(1));
        assert_eq!(selector.compound(1).unwrap().combinator, Combinator::Descendant);
        assert_eq!(selector.compound(2).unwrap().ancestor, None);
    }

    #[test]
    fn test_child_combinator_without_spaces() {
        let selector = Selector::parse("div>p").unwrap();
        assert_eq!(selector.to_string(), "div > p");
    }

    #[test]
    fn test_priorities() {
        assert_eq!(priority("div"), 1);
        assert_eq!(priority(".a"), 2);
        assert_eq!(priority(".a.b"), 3);
        assert_eq!(priority(".a.b.c"), 4);
        assert_eq!(priority(".a.b.c.d"), 4);
        assert_eq!(priority("#x"), 5);
        assert_eq!(priority("div.a#x"), 8);
        assert_eq!(priority("div .a"), 21);
        assert_eq!(priority("div > .a"), 41);
        assert_eq!(priority("*"), 0);
    }

    #[test]
    fn test_deep_chains_cap_the_factor() {
        let deep = "a b c d e f g h i j";
        let selector = Selector::parse(deep).unwrap();
        assert_eq!(selector.len(), 10);
        // depths 0..=7 use their own factor, deeper ones reuse the last
        let expected: i64 = ANCESTOR_FACTORS.iter().sum::<i64>() + 2 * ANCESTOR_FACTORS[7];
        assert_eq!(selector.priority(), expected);
    }

    #[test]
    fn test_pseudo_and_root() {
        let selector = Selector::parse(":root .a").unwrap();
        assert!(selector.compound(1).unwrap().document_root);
        assert_eq!(Selector::parse("a:hover").unwrap().subject().state, ComponentState::Hover);
        assert_eq!(Selector::parse("a:after").unwrap().subject().state, ComponentState::After);
    }

    #[test]
    fn test_invalid_selectors() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("> p"), Err(SelectorError::DanglingCombinator));
        assert_eq!(Selector::parse("p >"), Err(SelectorError::DanglingCombinator));
        assert_eq!(Selector::parse("a > > b"), Err(SelectorError::DanglingCombinator));
        assert_eq!(Selector::parse("div."), Err(SelectorError::MissingName('.')));
        assert_eq!(Selector::parse("#a#b"), Err(SelectorError::DuplicateId));
        assert_eq!(Selector::parse("a[href]"), Err(SelectorError::InvalidCharacter('[')));
        assert_eq!(Selector::parse("a + b"), Err(SelectorError::InvalidCharacter('+')));
        assert!(matches!(
            Selector::parse("li:first-child"),
            Err(SelectorError::UnsupportedPseudo(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["div", ".a.b", "p#x", "body div > p.note", "a:hover", "p::before", ":root", "*"] {
            let selector = Selector::parse(text).unwrap();
            assert_eq!(selector.to_string(), text);
            assert_eq!(Selector::parse(&selector.to_string()).unwrap(), selector);
        }
    }

    #[test]
    fn test_priority_is_stable() {
        let selector = Selector::parse("div > .a").unwrap();
        assert_eq!(selector.priority(), selector.priority());
        assert_eq!(selector.clone().priority(), 41);
    }
}

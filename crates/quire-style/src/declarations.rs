//! Declarations and custom variables
//!
//! A [`DeclarationSet`] keeps declarations in the order they were written. A name may
//! appear more than once while a rule is being read; lookups return the last entry.

use std::fmt;

use crate::values::StyleValue;

/// A single typed `name: value` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: StyleValue,
    pub important: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: StyleValue) -> Self {
        Self {
            name: name.into(),
            value,
            important: false,
        }
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// Ordered collection of declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationSet {
    entries: Vec<Declaration>,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.entries.iter()
    }

    /// Append without replacing earlier entries of the same name
    pub fn push(&mut self, name: impl Into<String>, value: StyleValue) {
        self.entries.push(Declaration::new(name, value));
    }

    pub fn push_declaration(&mut self, declaration: Declaration) {
        self.entries.push(declaration);
    }

    /// Last value written for `name`
    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.get_declaration(name).map(|d| &d.value)
    }

    pub fn get_declaration(&self, name: &str) -> Option<&Declaration> {
        self.entries.iter().rev().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|d| d.name == name)
    }

    /// Replace every entry named like `declaration` with it, keeping the first position
    pub fn set(&mut self, declaration: Declaration) {
        match self.entries.iter().position(|d| d.name == declaration.name) {
            Some(idx) => {
                let name = declaration.name.clone();
                self.entries[idx] = declaration;
                let mut seen = 0usize;
                self.entries.retain(|d| {
                    if d.name != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.entries.push(declaration),
        }
    }

    /// Cascade merge: a later declaration wins unless the existing one is important
    /// and the incoming one is not.
    ///
    /// Returns true if the declaration was taken.
    pub fn merge(&mut self, declaration: &Declaration) -> bool {
        if let Some(existing) = self.get_declaration(&declaration.name) {
            if existing.important && !declaration.important {
                return false;
            }
        }
        self.set(declaration.clone());
        true
    }

    /// Merge every entry of `other` in order
    pub fn merge_all(&mut self, other: &DeclarationSet) {
        for declaration in other {
            self.merge(declaration);
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|d| d.name != name);
        before != self.entries.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.name.as_str())
    }
}

impl fmt::Display for DeclarationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, declaration) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{declaration};")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DeclarationSet {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for DeclarationSet {
    type Item = Declaration;
    type IntoIter = std::vec::IntoIter<Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<Declaration> for DeclarationSet {
    fn extend<I: IntoIterator<Item = Declaration>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<Declaration> for DeclarationSet {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A custom variable (`--name: value`), value kept as raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Variables declared by a rule, last write wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    entries: Vec<Variable>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.entries.iter()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|v| v.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Variable { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|v| v.name == name).map(|v| v.value.as_str())
    }

    pub fn merge_all(&mut self, other: &VariableSet) {
        for variable in &other.entries {
            self.set(variable.name.clone(), variable.value.clone());
        }
    }
}

impl<'a> IntoIterator for &'a VariableSet {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Color, Unit};

    fn red() -> StyleValue {
        StyleValue::Color(Color::rgb(255, 0, 0))
    }

    fn blue() -> StyleValue {
        StyleValue::Color(Color::rgb(0, 0, 255))
    }

    #[test]
    fn test_push_keeps_duplicates_get_returns_last() {
        let mut set = DeclarationSet::new();
        set.push("color", red());
        set.push("color", blue());
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("color"), Some(&blue()));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut set = DeclarationSet::new();
        set.push("color", red());
        set.push("width", StyleValue::Unit(Unit::Points(1.0)));
        set.push("color", red());
        set.set(Declaration::new("color", blue()));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["color", "width"]);
        assert_eq!(set.get("color"), Some(&blue()));
    }

    #[test]
    fn test_merge_respects_important() {
        let mut set = DeclarationSet::new();
        assert!(set.merge(&Declaration::new("color", red()).important()));
        assert!(!set.merge(&Declaration::new("color", blue())));
        assert_eq!(set.get("color"), Some(&red()));
        assert!(set.merge(&Declaration::new("color", blue()).important()));
        assert_eq!(set.get("color"), Some(&blue()));
    }

    #[test]
    fn test_display() {
        let mut set = DeclarationSet::new();
        set.push("color", red());
        set.push_declaration(Declaration::new("width", StyleValue::Unit(Unit::Points(10.0))).important());
        assert_eq!(set.to_string(), "color: #ff0000; width: 10pt !important;");
    }

    #[test]
    fn test_variables_last_write_wins() {
        let mut vars = VariableSet::new();
        vars.set("--main", "red");
        vars.set("--size", "10pt");
        vars.set("--main", "blue");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("--main"), Some("blue"));
    }
}

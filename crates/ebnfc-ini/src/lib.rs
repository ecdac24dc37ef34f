//! ebnfc-ini - INI Configuration Parser
//!
//! A concrete consumer of the lexical core: a state-machine parser for
//! INI documents, built on [`ebnfc_lex::Scanner`] with the INI comment
//! dialect (`;` and `#` start line comments, block comments disabled).
//! It uses no combinators; everything is scanner matchers and a scope
//! state machine.
//!
//! Document shape:
//!
//! ```ini
//! [Section]
//! key = scalar            ; a single value
//! +items = a              ; `+` appends to a list item
//! +items = b
//! point = (x=1, y=[2,3])  # values nest: maps and lists
//! ```
//!
//! Values are scalars, `(k=v, ...)` maps, or `[v, ...]` lists, nesting
//! arbitrarily. Keys and sections keep their document order.

mod parser;

use std::fmt;
use std::hash::BuildHasherDefault;

use ebnfc_util::IniError;
use indexmap::IndexMap;
use rustc_hash::FxHasher;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// One INI value: a scalar, a list, or a map. Lists and maps nest.
#[derive(Clone, Debug, PartialEq)]
pub enum IniValue {
    Scalar(String),
    List(Vec<IniValue>),
    Map(FxIndexMap<String, IniValue>),
}

impl IniValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            IniValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[IniValue]> {
        match self {
            IniValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FxIndexMap<String, IniValue>> {
        match self {
            IniValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for IniValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IniValue::Scalar(s) => write!(f, "{s}"),
            IniValue::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            IniValue::Map(map) => {
                write!(f, "(")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// One entry of a section: a single value, or the list built up by
/// repeated `+key = ...` lines.
#[derive(Clone, Debug, PartialEq)]
pub enum IniItem {
    Single(IniValue),
    List(Vec<IniValue>),
}

impl IniItem {
    /// The value of a `Single` item.
    pub fn single(&self) -> Option<&IniValue> {
        match self {
            IniItem::Single(value) => Some(value),
            _ => None,
        }
    }

    /// The values of a `+key` list item.
    pub fn list(&self) -> Option<&[IniValue]> {
        match self {
            IniItem::List(values) => Some(values),
            _ => None,
        }
    }

    /// Shortcut for a single scalar value.
    pub fn scalar(&self) -> Option<&str> {
        self.single().and_then(IniValue::as_scalar)
    }
}

impl fmt::Display for IniItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IniItem::Single(value) => write!(f, "{value}"),
            IniItem::List(values) => write!(f, "{}", IniValue::List(values.clone())),
        }
    }
}

/// A named section with its items in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IniSection {
    name: String,
    items: FxIndexMap<String, IniItem>,
}

impl IniSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: FxIndexMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn item(&self, name: &str) -> Option<&IniItem> {
        self.items.get(name)
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, &IniItem)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn items_mut(&mut self) -> &mut FxIndexMap<String, IniItem> {
        &mut self.items
    }
}

/// A parsed INI document.
///
/// # Examples
///
/// ```
/// use ebnfc_ini::IniFile;
///
/// let ini = IniFile::parse("demo.ini", b"[net]\nhost = localhost\n").unwrap();
/// let net = ini.section("net").unwrap();
/// assert_eq!(net.item("host").unwrap().scalar(), Some("localhost"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IniFile {
    sections: FxIndexMap<String, IniSection>,
}

impl IniFile {
    /// Parses an INI document, failing with the first error.
    pub fn parse(file: &str, input: &[u8]) -> Result<IniFile, IniError> {
        parser::parse(file, input)
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &IniSection> {
        self.sections.values()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn add_section(&mut self, section: IniSection) -> bool {
        if self.sections.contains_key(section.name()) {
            return false;
        }
        self.sections.insert(section.name().to_string(), section);
        true
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut IniSection> {
        self.sections.get_mut(name)
    }
}

impl fmt::Display for IniFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in self.sections.values() {
            writeln!(f, "[{}]", section.name())?;
            for (key, item) in section.items() {
                writeln!(f, "\t{key} -> {item}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

use std::convert::TryFrom;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// Ground proposition: a predicate with bound arguments, e.g. `At(C1, SFO)`.
/// Held in canonical text form, so equal atoms compare equal as strings.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Atom(Rc<str>);

impl Atom {
    pub fn new(predicate: &str, args: &[&str]) -> Self {
        if args.is_empty() {
            Atom(Rc::from(predicate))
        } else {
            Atom(Rc::from(format!("{}({})", predicate, args.join(", "))))
        }
    }

    pub fn predicate(&self) -> &str {
        self.0.split('(').next().unwrap_or(&self.0)
    }

    pub fn args(&self) -> Vec<&str> {
        match self.0.find('(') {
            Some(open) => self.0[open + 1..self.0.len() - 1].split(", ").collect(),
            None => Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn positive(&self) -> Literal {
        Literal { atom: self.clone(), positive: true }
    }

    pub fn negative(&self) -> Literal {
        Literal { atom: self.clone(), positive: false }
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl FromStr for Atom {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let err = |reason: &str| Error::InvalidLiteral { text: text.to_owned(), reason: reason.to_owned() };
        let trimmed = text.trim();
        match trimmed.find('(') {
            None if is_name(trimmed) => Ok(Atom::new(trimmed, &[])),
            None => Err(err("expected a predicate name")),
            Some(open) => {
                let predicate = trimmed[..open].trim();
                if !is_name(predicate) {
                    return Err(err("expected a predicate name"));
                }
                let inner = trimmed[open + 1..].strip_suffix(')').ok_or_else(|| err("expected matched ')'"))?;
                let args: Vec<&str> = inner.split(',').map(str::trim).collect();
                if args.iter().any(|a| !is_name(a)) {
                    return Err(err("expected comma separated arguments"));
                }
                Ok(Atom::new(predicate, &args))
            }
        }
    }
}

impl TryFrom<String> for Atom {
    type Error = Error;
    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed ground proposition. `~At(C1, SFO)` is the negation of `At(C1, SFO)`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Literal {
    pub atom: Atom,
    pub positive: bool,
}

impl Literal {
    pub fn negated(&self) -> Literal {
        Literal { atom: self.atom.clone(), positive: !self.positive }
    }

    pub fn is_complement_of(&self, other: &Literal) -> bool {
        self.atom == other.atom && self.positive != other.positive
    }
}

impl FromStr for Literal {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        match trimmed.strip_prefix('~') {
            Some(rest) => Ok(rest.parse::<Atom>()?.negative()),
            None => Ok(trimmed.parse::<Atom>()?.positive()),
        }
    }
}

impl TryFrom<String> for Literal {
    type Error = Error;
    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.atom)
        } else {
            write!(f, "~{}", self.atom)
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

use std::{borrow::Cow, fmt, str::FromStr};

use crate::errors::ParseServiceIdError;

/// Structural identifier of a registered service
///
/// A service is identified by its name plus, for generic services, its list of type arguments.
/// Two identifiers are compared structurally - no textual prefix heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId {
    name: Cow<'static, str>,
    args: Vec<TypeArg>,
}

/// A single generic argument of a [ServiceId]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeArg {
    /// A bound argument, e.g. `Foo` in `Repository<Foo>`
    Concrete(ServiceId),
    /// An unbound generic parameter, e.g. `'T` in `Repository<'T>`
    Param(Cow<'static, str>),
}

impl ServiceId {
    /// Identifier without generic arguments
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        ServiceId {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Identifier with generic arguments
    pub fn generic<A: Into<TypeArg>>(
        name: impl Into<Cow<'static, str>>,
        args: impl IntoIterator<Item = A>,
    ) -> Self {
        ServiceId {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Derives the identifier of a Rust type from its type name
    ///
    /// Generic paths like `alloc::vec::Vec<app::Foo>` are split into name and arguments.
    /// Anything that isn't a plain path (tuples, arrays, slices) is kept as one opaque name.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let type_name = std::any::type_name::<T>();
        if type_name.contains(['(', '[', ';']) {
            return ServiceId::named(type_name);
        }

        type_name
            .parse()
            .unwrap_or_else(|_| ServiceId::named(type_name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Canonical textual form, e.g. `Repository<Foo, 'T>`
    pub fn full_name(&self) -> String {
        self.to_string()
    }

    /// Returns true if a registration for `self` can supply a dependency on `required`
    ///
    /// Names and arity must be equal. Unbound parameters on `self` accept any argument,
    /// so an open generic registration satisfies every instantiation of it.
    pub fn satisfies(&self, required: &ServiceId) -> bool {
        self.name == required.name
            && self.args.len() == required.args.len()
            && self
                .args
                .iter()
                .zip(&required.args)
                .all(|(offered, wanted)| offered.accepts(wanted))
    }

    /// The only argument, if this is a generic with exactly one bound argument
    pub(crate) fn single_concrete_arg(&self) -> Option<&ServiceId> {
        match self.args.as_slice() {
            [TypeArg::Concrete(inner)] => Some(inner),
            _ => None,
        }
    }
}

impl TypeArg {
    pub fn param(name: impl Into<Cow<'static, str>>) -> Self {
        TypeArg::Param(name.into())
    }

    fn accepts(&self, wanted: &TypeArg) -> bool {
        match (self, wanted) {
            (TypeArg::Param(_), _) => true,
            (TypeArg::Concrete(offered), TypeArg::Concrete(wanted)) => offered.satisfies(wanted),
            (TypeArg::Concrete(_), TypeArg::Param(_)) => false,
        }
    }
}

impl From<ServiceId> for TypeArg {
    fn from(id: ServiceId) -> Self {
        TypeArg::Concrete(id)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }

        f.write_str("<")?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Concrete(id) => write!(f, "{id}"),
            TypeArg::Param(name) => write!(f, "'{name}"),
        }
    }
}

/// Deepest generic nesting accepted when parsing
pub const MAX_NESTING: usize = 64;

impl FromStr for ServiceId {
    type Err = ParseServiceIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            input,
            position: 0,
            depth: 0,
        };
        let id = parser.service_id()?;

        parser.skip_whitespace();
        if parser.position != input.len() {
            return Err(ParseServiceIdError::TrailingInput {
                position: parser.position,
            });
        }

        Ok(id)
    }
}

/// Recursive descent over `Name<Arg, Arg<Inner>, 'Param>`
struct Parser<'a> {
    input: &'a str,
    position: usize,
    /// Currently open `<`
    depth: usize,
}

impl Parser<'_> {
    fn service_id(&mut self) -> Result<ServiceId, ParseServiceIdError> {
        let name = self.name()?;

        if self.peek() != Some('<') {
            return Ok(ServiceId::named(name));
        }
        self.bump();

        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseServiceIdError::TooDeep {
                limit: MAX_NESTING,
                position: self.position - 1,
            });
        }

        let mut args = Vec::new();
        loop {
            args.push(self.type_arg()?);
            self.skip_whitespace();

            match self.bump() {
                Some(',') => continue,
                Some('>') => break,
                Some(character) => {
                    return Err(ParseServiceIdError::UnexpectedCharacter {
                        character,
                        position: self.position - character.len_utf8(),
                    })
                }
                None => return Err(ParseServiceIdError::UnclosedArguments { name }),
            }
        }
        self.depth -= 1;

        Ok(ServiceId::generic(name, args))
    }

    fn type_arg(&mut self) -> Result<TypeArg, ParseServiceIdError> {
        self.skip_whitespace();
        if self.peek() == Some('\'') {
            self.bump();
            let name = self.name()?;
            if self.peek() == Some('<') {
                return Err(ParseServiceIdError::UnexpectedCharacter {
                    character: '<',
                    position: self.position,
                });
            }
            return Ok(TypeArg::param(name));
        }

        self.service_id().map(TypeArg::Concrete)
    }

    /// Reads up to the next delimiter, names may contain `::` and spaces (`dyn app::Foo`)
    fn name(&mut self) -> Result<String, ParseServiceIdError> {
        let start = self.position;
        let rest = &self.input[start..];
        let length = rest.find(['<', '>', ',']).unwrap_or(rest.len());
        self.position += length;

        let name = rest[..length].trim();
        if name.is_empty() {
            return Err(ParseServiceIdError::EmptyName { position: start });
        }

        Ok(name.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let character = self.peek()?;
        self.position += character.len_utf8();
        Some(character)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }
}

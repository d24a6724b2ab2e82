use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::history::error::Error;

/// Flat identity of an invocation within a history.
///
/// Identities are dense: a history with `K` invocations uses `0..K`, assigned
/// in sequence-major, invocation-minor order (see
/// [`Schema::index_invocations`]).
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvocationId(pub usize);

impl Display for InvocationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

/// Declared type of a method parameter.
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(deny_unknown_fields)
)]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: String,
}

/// Method descriptor of the object under test.
///
/// Only `name` is required. `parameters`, when present, fixes the arity of
/// every invocation of the method. A `void` method returns nothing, so its
/// recorded result is never compared. A `readonly` method does not change the
/// object's state.
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(deny_unknown_fields)
)]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub parameters: Option<Vec<Parameter>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "core::ops::Not::not")
    )]
    pub void: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "core::ops::Not::not")
    )]
    pub readonly: bool,
}

impl Method {
    /// A method with unknown arity that returns a value and may mutate.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: None,
            void: false,
            readonly: false,
        }
    }

    #[must_use]
    pub fn with_parameters<T: Into<String>>(mut self, types: impl IntoIterator<Item = T>) -> Self {
        self.parameters = Some(
            types
                .into_iter()
                .map(|ty| Parameter { ty: ty.into() })
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn void(mut self) -> Self {
        self.void = true;
        self
    }

    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Declared number of arguments, if the parameters are declared.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        self.parameters.as_ref().map(Vec::len)
    }
}

/// The methods of a class, used to resolve method names found in a trace.
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(deny_unknown_fields)
)]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub class: String,
    pub methods: Vec<Method>,
}

impl MethodSpec {
    /// Looks up a method by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMethod`] if no method has that name.
    pub fn resolve(&self, name: &str) -> Result<&Method, Error> {
        self.methods
            .iter()
            .find(|method| method.name == name)
            .ok_or_else(|| Error::UnknownMethod {
                class: self.class.clone(),
                name: name.into(),
            })
    }
}

/// One recorded operation occurrence.
///
/// `result` is what the operation returned; `None` means it returned
/// nothing (an absent value, or a `void` method). `index` is assigned once by
/// [`Schema::index_invocations`].
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(
        deny_unknown_fields,
        bound(deserialize = "Value: ::serde::Deserialize<'de>")
    )
)]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<Value> {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,
    pub method: Method,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arguments: Vec<Value>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub result: Option<Value>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub index: Option<usize>,
}

impl<Value> Invocation<Value> {
    #[must_use]
    pub const fn new(method: Method, arguments: Vec<Value>, result: Option<Value>) -> Self {
        Self {
            id: None,
            method,
            arguments,
            result,
            index: None,
        }
    }

    /// Structural admissibility: the argument count matches the declared
    /// parameters (when declared) and `void` methods carry no result.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.method
            .arity()
            .is_none_or(|arity| arity == self.arguments.len())
            && !(self.method.void && self.result.is_some())
    }
}

impl<Value> Display for Invocation<Value>
where
    Value: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}(", self.method.name)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{argument}")?;
        }
        write!(f, ")")?;
        if let Some(index) = self.index {
            write!(f, "#{index}")?;
        }
        Ok(())
    }
}

/// The invocations of one process or client, in real-time order.
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(
        deny_unknown_fields,
        bound(deserialize = "Value: ::serde::Deserialize<'de>")
    )
)]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence<Value> {
    /// 1-based position of the sequence in its history.
    pub index: u64,
    pub invocations: Vec<Invocation<Value>>,
}

impl<Value> Sequence<Value> {
    #[must_use]
    pub const fn new(index: u64, invocations: Vec<Invocation<Value>>) -> Self {
        Self { index, invocations }
    }
}

/// A recorded history of an object under test.
///
/// `order` lists extra `(before, after)` constraints between sequences, by
/// sequence index: the last invocation of `before` precedes the first
/// invocation of `after`.
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(
        deny_unknown_fields,
        bound(deserialize = "Value: ::serde::Deserialize<'de>")
    )
)]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema<Value> {
    pub class: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Vec<Value>,
    pub sequences: Vec<Sequence<Value>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: Vec<(u64, u64)>,
}

impl<Value> Schema<Value> {
    /// A history without constructor parameters or explicit ordering.
    pub fn new(class: impl Into<String>, sequences: Vec<Sequence<Value>>) -> Self {
        Self {
            class: class.into(),
            parameters: Vec::new(),
            sequences,
            order: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: Vec<(u64, u64)>) -> Self {
        self.order = order;
        self
    }

    /// Finds a sequence by its 1-based index.
    #[must_use]
    pub fn sequence(&self, index: u64) -> Option<&Sequence<Value>> {
        self.sequences.iter().find(|sequence| sequence.index == index)
    }

    /// All invocations in flat order: sequence by sequence, then in order
    /// within each sequence.
    pub fn invocations(&self) -> impl Iterator<Item = &Invocation<Value>> {
        self.sequences
            .iter()
            .flat_map(|sequence| sequence.invocations.iter())
    }

    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.sequences
            .iter()
            .map(|sequence| sequence.invocations.len())
            .sum()
    }

    /// Assigns every invocation its flat index `0..K`, sequence-major.
    pub fn index_invocations(&mut self) {
        let invocations = self
            .sequences
            .iter_mut()
            .flat_map(|sequence| sequence.invocations.iter_mut());
        for (index, invocation) in invocations.enumerate() {
            invocation.index = Some(index);
        }
    }

    /// Replaces every invocation's method descriptor by the entry of the same
    /// name in `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMethod`] for the first invocation whose method
    /// name `spec` does not define. The history is left unchanged then.
    pub fn resolve_methods(&mut self, spec: &MethodSpec) -> Result<(), Error> {
        let resolved = self
            .invocations()
            .map(|invocation| spec.resolve(&invocation.method.name).cloned())
            .collect::<Result<Vec<Method>, Error>>()?;

        let invocations = self
            .sequences
            .iter_mut()
            .flat_map(|sequence| sequence.invocations.iter_mut());
        for (invocation, method) in invocations.zip(resolved) {
            invocation.method = method;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> MethodSpec {
        MethodSpec {
            class: "Stack".into(),
            methods: vec![
                Method::new("push").with_parameters(["int"]).void(),
                Method::new("pop").with_parameters::<&str>([]),
            ],
        }
    }

    fn schema() -> Schema<i64> {
        Schema::new(
            "Stack",
            vec![
                Sequence::new(
                    1,
                    vec![
                        Invocation::new(Method::new("push"), vec![1], None),
                        Invocation::new(Method::new("pop"), vec![], Some(1)),
                    ],
                ),
                Sequence::new(2, vec![Invocation::new(Method::new("pop"), vec![], None)]),
            ],
        )
    }

    #[test]
    fn test_invocation_display() {
        let mut invocation = Invocation::new(Method::new("put"), vec![1, 2], Some(3));
        assert_eq!(invocation.to_string(), "put(1,2)");
        invocation.index = Some(4);
        assert_eq!(invocation.to_string(), "put(1,2)#4");

        let empty: Invocation<i64> = Invocation::new(Method::new("poll"), vec![], None);
        assert_eq!(empty.to_string(), "poll()");
    }

    #[test]
    fn test_invocation_id_display() {
        assert_eq!(InvocationId(7).to_string(), "#7");
    }

    #[test]
    fn test_index_invocations() {
        let mut schema = schema();
        assert!(schema.invocations().all(|i| i.index.is_none()));
        schema.index_invocations();
        let indices: Vec<_> = schema.invocations().map(|i| i.index).collect();
        assert_eq!(indices, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(schema.invocation_count(), 3);
    }

    #[test]
    fn test_resolve_methods() {
        let mut schema = schema();
        schema.resolve_methods(&spec()).expect("all methods are known");
        let first = schema.invocations().next().unwrap();
        assert!(first.method.void);
        assert_eq!(first.method.arity(), Some(1));
    }

    #[test]
    fn test_resolve_unknown_method() {
        let mut schema = schema();
        schema.sequences[1]
            .invocations
            .push(Invocation::new(Method::new("peek"), vec![], None));
        let before = schema.clone();

        let err = schema.resolve_methods(&spec()).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownMethod {
                class: "Stack".into(),
                name: "peek".into()
            }
        );
        assert_eq!(schema, before);
    }

    #[test]
    fn test_well_formed() {
        let push = Method::new("push").with_parameters(["int"]).void();
        assert!(Invocation::new(push.clone(), vec![1], None).is_well_formed());
        assert!(!Invocation::<i32>::new(push.clone(), vec![], None).is_well_formed());
        assert!(!Invocation::new(push, vec![1], Some(1)).is_well_formed());
        // undeclared parameters accept any arity
        assert!(Invocation::new(Method::new("pop"), vec![1, 2], Some(3)).is_well_formed());
    }

    #[test]
    fn test_sequence_lookup() {
        let schema = schema();
        assert_eq!(schema.sequence(2).map(|s| s.invocations.len()), Some(1));
        assert!(schema.sequence(3).is_none());
    }
}

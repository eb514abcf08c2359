//! Named, type-checked parameter dispatch
//!
//! Every modifier exposes its setters through a [`MethodTable`] so that a host
//! holding only a generic [`ModifierNode`](crate::nodes::ModifierNode) can
//! change filter-specific parameters by name. Parameters travel as a closed
//! [`Param`] enum; the table checks the variant against the method's declared
//! [`ParamKind`] before calling anything.
//!
//! Names resolve to a stable index. Hosts that drive nodes from another thread
//! resolve once on the control side and send a [`MethodCall`] carrying only
//! the index and the value, so the audio thread never hashes a string.

use core::fmt;

use hashbrown::HashMap;

use crate::error::ModifierError;

/// The type tag of a [`Param`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Unit,
    Float,
    Bool,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Unit => "unit",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A parameter value passed to a named method.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Param {
    Unit,
    Float(f64),
    Bool(bool),
}

impl Param {
    #[inline]
    pub fn kind(&self) -> ParamKind {
        match self {
            Param::Unit => ParamKind::Unit,
            Param::Float(_) => ParamKind::Float,
            Param::Bool(_) => ParamKind::Bool,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Param::Float(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Param::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Float(v)
    }
}

impl From<f32> for Param {
    fn from(v: f32) -> Self {
        Param::Float(v as f64)
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<()> for Param {
    fn from(_: ()) -> Self {
        Param::Unit
    }
}

/// Name and parameter type of one exposed method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: &'static str,
    pub kind: ParamKind,
}

/// A method call already resolved against a table: safe to send to the audio
/// thread and cheap to apply there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MethodCall {
    pub index: usize,
    pub param: Param,
}

/// A setter exposed through a [`MethodTable`].
///
/// Mutators receive a [`Param`] whose kind has already been checked, and return
/// an error if the value itself is unusable.
pub type Mutator<T> = fn(&mut T, Param) -> Result<(), ModifierError>;

/// Registry of the named setters of one node type.
pub struct MethodTable<T> {
    by_name: HashMap<&'static str, usize>,
    signatures: Vec<MethodSignature>,
    mutators: Vec<Mutator<T>>,
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            signatures: Vec::new(),
            mutators: Vec::new(),
        }
    }

    /// Build a table from a fixed list of entries.
    ///
    /// Fails with [`ModifierError::DuplicateMethod`] if two entries share a name.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (&'static str, ParamKind, Mutator<T>)>,
    ) -> Result<Self, ModifierError> {
        let mut table = Self::new();
        for (name, kind, mutator) in entries {
            table.register(name, kind, mutator)?;
        }
        Ok(table)
    }

    /// Add a method. Existing entries are never overwritten.
    pub fn register(&mut self, name: &'static str, kind: ParamKind, mutator: Mutator<T>) -> Result<usize, ModifierError> {
        if self.by_name.contains_key(name) {
            return Err(ModifierError::DuplicateMethod { name });
        }

        let index = self.signatures.len();
        self.by_name.insert(name, index);
        self.signatures.push(MethodSignature { name, kind });
        self.mutators.push(mutator);
        Ok(index)
    }

    /// Look up `name` and check `param` against its declared kind.
    pub fn resolve(&self, name: &str, param: Param) -> Result<MethodCall, ModifierError> {
        self.view().resolve(name, param)
    }

    /// Call `name` on `target`.
    pub fn invoke(&self, target: &mut T, name: &str, param: Param) -> Result<(), ModifierError> {
        let call = self.resolve(name, param)?;
        self.invoke_at(target, call.index, call.param)
    }

    /// Call the method at `index` on `target`, checking the parameter kind.
    ///
    /// An out-of-range index reports [`ModifierError::UnknownMethod`].
    pub fn invoke_at(&self, target: &mut T, index: usize, param: Param) -> Result<(), ModifierError> {
        let mutator = self.checked_mutator(index, param)?;
        mutator(target, param)
    }

    /// The mutator at `index`, after checking that `param` fits it.
    ///
    /// Returning the plain function pointer lets a node whose table lives in
    /// one of its own fields release the borrow before mutating itself.
    pub fn checked_mutator(&self, index: usize, param: Param) -> Result<Mutator<T>, ModifierError> {
        let signature = self.signatures.get(index).ok_or(ModifierError::UnknownIndex { index })?;

        if signature.kind != param.kind() {
            return Err(ModifierError::TypeMismatch {
                method: signature.name,
                expected: signature.kind,
                found: param.kind(),
            });
        }

        tracing::trace!(method = signature.name, ?param, "dispatch");
        Ok(self.mutators[index])
    }

    /// Read-only view for discovery.
    pub fn view(&self) -> MethodView<'_> {
        MethodView {
            by_name: &self.by_name,
            signatures: &self.signatures,
        }
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MethodTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.signatures.iter()).finish()
    }
}

/// A borrowed, type-erased view of a [`MethodTable`].
#[derive(Clone, Copy)]
pub struct MethodView<'a> {
    by_name: &'a HashMap<&'static str, usize>,
    signatures: &'a [MethodSignature],
}

impl<'a> MethodView<'a> {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn signature(&self, name: &str) -> Option<MethodSignature> {
        self.index_of(name).map(|i| self.signatures[i])
    }

    /// All methods, in registration order.
    pub fn signatures(&self) -> &'a [MethodSignature] {
        self.signatures
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn resolve(&self, name: &str, param: Param) -> Result<MethodCall, ModifierError> {
        let index = self.index_of(name).ok_or_else(|| ModifierError::UnknownMethod { name: name.into() })?;
        let signature = self.signatures[index];

        if signature.kind != param.kind() {
            return Err(ModifierError::TypeMismatch {
                method: signature.name,
                expected: signature.kind,
                found: param.kind(),
            });
        }

        Ok(MethodCall { index, param })
    }

    /// Copy the view into an owned directory that can move to another thread.
    pub fn to_directory(&self) -> MethodDirectory {
        MethodDirectory {
            by_name: self.by_name.clone(),
            signatures: self.signatures.to_vec(),
        }
    }
}

impl fmt::Debug for MethodView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.signatures.iter()).finish()
    }
}

/// An owned copy of a table's signatures, used by controllers on the control
/// thread to validate calls before they are queued.
#[derive(Clone, Debug, Default)]
pub struct MethodDirectory {
    by_name: HashMap<&'static str, usize>,
    signatures: Vec<MethodSignature>,
}

impl MethodDirectory {
    pub fn view(&self) -> MethodView<'_> {
        MethodView {
            by_name: &self.by_name,
            signatures: &self.signatures,
        }
    }
}

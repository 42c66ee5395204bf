use std::{
    cell::{Cell, Ref, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
};

use crate::interpreter::value::{callable::Callable, core::Value};

/// What a [`Class`] node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// An ordinary, instantiable class.
    Class,
    /// A module: a bag of members that can be included, never instantiated.
    Module,
    /// The anonymous node spliced into a chain when a module is included.
    /// It owns no members; lookups read the module's tables.
    Mixin,
}

/// The member tables of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Instance methods.
    Methods,
    /// `name { ... }` getters.
    Getters,
    /// `name=(v) { ... }` setters.
    Setters,
    /// `class name(...)` methods, called on the class itself.
    Statics,
}

#[derive(Default)]
struct Tables {
    methods: HashMap<String, Callable>,
    getters: HashMap<String, Callable>,
    setters: HashMap<String, Callable>,
    statics: HashMap<String, Callable>,
}

impl Tables {
    const fn get(&self, table: Table) -> &HashMap<String, Callable> {
        match table {
            Table::Methods => &self.methods,
            Table::Getters => &self.getters,
            Table::Setters => &self.setters,
            Table::Statics => &self.statics,
        }
    }

    const fn get_mut(&mut self, table: Table) -> &mut HashMap<String, Callable> {
        match table {
            Table::Methods => &mut self.methods,
            Table::Getters => &mut self.getters,
            Table::Setters => &mut self.setters,
            Table::Statics => &mut self.statics,
        }
    }
}

/// A class, module or mixin node in an inheritance chain.
///
/// Chains are singly linked through `superclass`. Including a module
/// rewrites the links, so they live behind a `RefCell`.
pub struct Class {
    /// The declared name; a mixin carries its module's name.
    pub name:     String,
    /// Class, module or mixin.
    pub kind:     ClassKind,
    /// Properties stored on the class value itself.
    pub props:    RefCell<HashMap<String, Value>>,
    superclass:   RefCell<Option<Rc<Self>>>,
    tables:       RefCell<Tables>,
    module:       Option<Rc<Self>>,
    included:     RefCell<Vec<Rc<Self>>>,
    instantiable: Cell<bool>,
}

impl Class {
    /// Creates a class or module node.
    ///
    /// Classes start instantiable, modules never are.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ClassKind, superclass: Option<Rc<Self>>) -> Rc<Self> {
        Rc::new(Self { name: name.into(),
                       kind,
                       props: RefCell::new(HashMap::new()),
                       superclass: RefCell::new(superclass),
                       tables: RefCell::new(Tables::default()),
                       module: None,
                       included: RefCell::new(Vec::new()),
                       instantiable: Cell::new(kind == ClassKind::Class) })
    }

    /// Creates the mixin node standing for `module` in some chain.
    fn mixin(module: &Rc<Self>, superclass: Option<Rc<Self>>) -> Rc<Self> {
        Rc::new(Self { name: module.name.clone(),
                       kind: ClassKind::Mixin,
                       props: RefCell::new(HashMap::new()),
                       superclass: RefCell::new(superclass),
                       tables: RefCell::new(Tables::default()),
                       module: Some(Rc::clone(module)),
                       included: RefCell::new(Vec::new()),
                       instantiable: Cell::new(false) })
    }

    /// The next node up the chain.
    #[must_use]
    pub fn superclass(&self) -> Option<Rc<Self>> {
        self.superclass.borrow().clone()
    }

    /// The module a mixin stands for.
    #[must_use]
    pub const fn module(&self) -> Option<&Rc<Self>> {
        self.module.as_ref()
    }

    /// Returns `true` if calling the class may create an instance.
    #[must_use]
    pub fn is_instantiable(&self) -> bool {
        self.instantiable.get()
    }

    /// Forbids instantiation, used for built-ins such as `Number`.
    pub fn forbid_instances(&self) {
        self.instantiable.set(false);
    }

    /// Returns `true` if `self` is `other`, or is a mixin of `other`.
    #[must_use]
    pub fn represents(&self, other: &Rc<Self>) -> bool {
        std::ptr::eq(self, Rc::as_ptr(other)) || self.module.as_ref().is_some_and(|m| Rc::ptr_eq(m, other))
    }

    fn tables(&self) -> Ref<'_, Tables> {
        self.module.as_ref().map_or_else(|| self.tables.borrow(), |m| m.tables())
    }

    /// Adds or replaces a member.
    pub fn define(&self, table: Table, name: impl Into<String>, member: Callable) {
        match &self.module {
            Some(module) => module.define(table, name, member),
            None => {
                self.tables.borrow_mut().get_mut(table).insert(name.into(), member);
            },
        }
    }

    /// Looks a member up in this node only.
    #[must_use]
    pub fn own(&self, table: Table, name: &str) -> Option<Callable> {
        self.tables().get(table).get(name).cloned()
    }

    /// Sorted names of this node's members in `table`.
    #[must_use]
    pub fn own_names(&self, table: Table) -> Vec<String> {
        let mut names: Vec<String> = self.tables().get(table).keys().cloned().collect();
        names.sort();
        names
    }

    /// Looks a member up along the chain starting at `self`.
    ///
    /// # Example
    /// ```
    /// use kestrel::interpreter::value::class::{Class, ClassKind, Table};
    ///
    /// let base = Class::new("Base", ClassKind::Class, None);
    /// let derived = Class::new("Derived", ClassKind::Class, Some(base.clone()));
    ///
    /// assert!(derived.find(Table::Methods, "missing").is_none());
    /// assert_eq!(derived.ancestors().len(), 2);
    /// ```
    #[must_use]
    pub fn find(self: &Rc<Self>, table: Table, name: &str) -> Option<Callable> {
        Self::find_from(Some(Rc::clone(self)), table, name)
    }

    /// Looks a member up along the chain starting at `start`.
    #[must_use]
    pub fn find_from(start: Option<Rc<Self>>, table: Table, name: &str) -> Option<Callable> {
        let mut current = start;
        while let Some(class) = current {
            if let Some(member) = class.own(table, name) {
                return Some(member);
            }
            current = class.superclass();
        }
        None
    }

    /// Every node of the chain, `self` first.
    #[must_use]
    pub fn ancestors(self: &Rc<Self>) -> Vec<Rc<Self>> {
        let mut chain = vec![Rc::clone(self)];
        let mut current = self.superclass();
        while let Some(class) = current {
            current = class.superclass();
            chain.push(class);
        }
        chain
    }

    /// The is-a test: `other` or a mixin of `other` appears in the chain.
    #[must_use]
    pub fn is_a(self: &Rc<Self>, other: &Rc<Self>) -> bool {
        self.ancestors().iter().any(|c| c.represents(other))
    }

    /// The nearest superclass that is not a mixin.
    #[must_use]
    pub fn nearest_superclass(&self) -> Option<Rc<Self>> {
        let mut current = self.superclass();
        while let Some(class) = current {
            if class.kind != ClassKind::Mixin {
                return Some(class);
            }
            current = class.superclass();
        }
        None
    }

    /// Where a `super` lookup starts for a method defined by `owner` and
    /// running with a receiver of class `self`: the node above the chain
    /// entry that represents `owner`.
    #[must_use]
    pub fn super_start(self: &Rc<Self>, owner: &Rc<Self>) -> Option<Rc<Self>> {
        self.ancestors()
            .into_iter()
            .find(|c| c.represents(owner))
            .map_or_else(|| owner.superclass(), |entry| entry.superclass())
    }

    /// Modules included into this module, in inclusion order.
    #[must_use]
    pub fn included(&self) -> Vec<Rc<Self>> {
        self.included.borrow().clone()
    }

    /// Includes `module` into `self`.
    ///
    /// For a class, a mixin node for `module` is spliced directly above
    /// `self`, then every module `module` itself includes is spliced directly
    /// above that mixin, recursively and in inclusion order. For a module
    /// target the inclusion is recorded and applied whenever the target is
    /// later included somewhere.
    ///
    /// # Returns
    /// `false` without changing anything when `module` is already part of
    /// the chain.
    pub fn include(self: &Rc<Self>, module: &Rc<Self>) -> bool {
        if self.kind == ClassKind::Module {
            if Rc::ptr_eq(self, module) || self.included.borrow().iter().any(|m| Rc::ptr_eq(m, module)) {
                return false;
            }
            self.included.borrow_mut().push(Rc::clone(module));
            tracing::debug!(into = %self.name, module = %module.name, "module recorded inclusion");
            return true;
        }
        if self.is_a(module) {
            return false;
        }

        let mixin = Self::mixin(module, self.superclass());
        *self.superclass.borrow_mut() = Some(Rc::clone(&mixin));
        tracing::debug!(into = %self.name, module = %module.name, "module included");

        for nested in module.included() {
            mixin.include(&nested);
        }
        true
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
         .field("name", &self.name)
         .field("kind", &self.kind)
         .field("superclass", &self.superclass().map(|s| s.name.clone()))
         .finish_non_exhaustive()
    }
}

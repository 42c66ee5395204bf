use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
};

use crate::interpreter::value::{class::Class, core::Value, map_key::MapTable};

/// Engine storage attached to an instance.
///
/// Invisible to property lookup and method dispatch; only native methods
/// read or write it.
#[derive(Debug, Clone, Default)]
pub enum Internal {
    /// A plain object.
    #[default]
    None,
    /// The buffer of a String instance.
    Str(String),
    /// The elements of an Array instance.
    Array(Vec<Value>),
    /// The entries of a Map instance.
    Map(MapTable),
}

/// An object: its class, its user-visible properties and hidden storage.
pub struct Instance {
    /// The class the instance was created from.
    pub class:    Rc<Class>,
    /// User-visible properties.
    pub props:    RefCell<HashMap<String, Value>>,
    /// Native storage, see [`Internal`].
    pub internal: RefCell<Internal>,
    frozen:       Cell<bool>,
}

impl Instance {
    /// Creates an unfrozen instance with no properties.
    #[must_use]
    pub fn new(class: Rc<Class>, internal: Internal) -> Self {
        Self { class,
               props: RefCell::new(HashMap::new()),
               internal: RefCell::new(internal),
               frozen: Cell::new(false) }
    }

    /// Returns `true` once [`Instance::freeze`] has been called.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    /// Marks the instance frozen. Checked mutation sites refuse to change a
    /// frozen instance from then on.
    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    /// Reads an own property.
    #[must_use]
    pub fn get_prop(&self, name: &str) -> Option<Value> {
        self.props.borrow().get(name).cloned()
    }

    /// Writes an own property without the frozen check.
    pub fn set_prop(&self, name: impl Into<String>, value: Value) {
        self.props.borrow_mut().insert(name.into(), value);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
         .field("class", &self.class.name)
         .field("internal", &self.internal)
         .field("frozen", &self.frozen.get())
         .finish_non_exhaustive()
    }
}

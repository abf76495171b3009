pub(crate) mod argument;
pub(crate) mod directive;
pub(crate) mod document;
pub(crate) mod name;
pub(crate) mod operation;
pub(crate) mod selection;
pub(crate) mod ty;
pub(crate) mod type_system;
pub(crate) mod value;

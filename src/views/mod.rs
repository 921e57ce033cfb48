//! Concrete views, one per capability set

mod callable;
mod containers;
mod info;
mod records;
mod scalar;
mod string;

pub use callable::{FunctionView, ProcedureView};
pub(crate) use callable::{new_function, new_procedure};
pub use containers::{DictView, ListIter, ListView};
pub use info::{ErrorInfoView, VersionInfoView};
pub use records::{EnumerationView, StructView};
pub use scalar::{BoolView, FloatView, IntegerView, RatioView};
pub use string::StringView;

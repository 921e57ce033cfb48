//! Capability registry and dynamic narrowing
//!
//! Maps each core type tag to the capability set its objects are expected to
//! implement. `Handle::narrow` consults it, then lets the native core verify
//! the capability through `query_as`.

use std::collections::HashMap;

use coretypes_runtime::abi::InterfaceId;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::core_type::CoreType;
use crate::error::{CoreError, CoreResult};
use crate::handle::Handle;
use crate::view::View;
use crate::views::{
    BoolView, DictView, EnumerationView, FloatView, FunctionView, IntegerView, ListView,
    ProcedureView, RatioView, StringView, StructView,
};

/// Capability set registered for a core type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub core_type: CoreType,
    pub interface: InterfaceId,
    /// Name of the view `narrow` produces
    pub view: &'static str,
}

fn entry<T: View>(core_type: CoreType) -> (CoreType, Capability) {
    (
        core_type,
        Capability { core_type, interface: T::INTERFACE, view: T::NAME },
    )
}

static REGISTRY: Lazy<HashMap<CoreType, Capability>> = Lazy::new(|| {
    HashMap::from([
        entry::<BoolView>(CoreType::Bool),
        entry::<IntegerView>(CoreType::Int),
        entry::<FloatView>(CoreType::Float),
        entry::<StringView>(CoreType::String),
        entry::<ListView>(CoreType::List),
        entry::<DictView>(CoreType::Dict),
        entry::<RatioView>(CoreType::Ratio),
        entry::<ProcedureView>(CoreType::Proc),
        entry::<Handle>(CoreType::Object),
        entry::<FunctionView>(CoreType::Func),
        entry::<StructView>(CoreType::Struct),
        entry::<EnumerationView>(CoreType::Enumeration),
    ])
});

/// Capability registered for `core_type`, if it has a view
pub fn capability(core_type: CoreType) -> Option<Capability> {
    REGISTRY.get(&core_type).copied()
}

/// Core types with a view, in tag order
pub fn supported_types() -> Vec<CoreType> {
    let mut types: Vec<CoreType> = REGISTRY.keys().copied().collect();
    types.sort();
    types
}

/// Any typed view, as produced by `Handle::narrow`
#[derive(Debug, Clone)]
pub enum AnyView {
    Bool(BoolView),
    Int(IntegerView),
    Float(FloatView),
    String(StringView),
    List(ListView),
    Dict(DictView),
    Ratio(RatioView),
    Proc(ProcedureView),
    /// Generic object: no narrowing beyond the handle itself
    Object(Handle),
    Func(FunctionView),
    Struct(StructView),
    Enumeration(EnumerationView),
}

impl AnyView {
    pub fn core_type(&self) -> CoreType {
        match self {
            AnyView::Bool(_) => CoreType::Bool,
            AnyView::Int(_) => CoreType::Int,
            AnyView::Float(_) => CoreType::Float,
            AnyView::String(_) => CoreType::String,
            AnyView::List(_) => CoreType::List,
            AnyView::Dict(_) => CoreType::Dict,
            AnyView::Ratio(_) => CoreType::Ratio,
            AnyView::Proc(_) => CoreType::Proc,
            AnyView::Object(_) => CoreType::Object,
            AnyView::Func(_) => CoreType::Func,
            AnyView::Struct(_) => CoreType::Struct,
            AnyView::Enumeration(_) => CoreType::Enumeration,
        }
    }

    pub fn handle(&self) -> &Handle {
        match self {
            AnyView::Bool(v) => v.handle(),
            AnyView::Int(v) => v.handle(),
            AnyView::Float(v) => v.handle(),
            AnyView::String(v) => v.handle(),
            AnyView::List(v) => v.handle(),
            AnyView::Dict(v) => v.handle(),
            AnyView::Ratio(v) => v.handle(),
            AnyView::Proc(v) => v.handle(),
            AnyView::Object(h) => h,
            AnyView::Func(v) => v.handle(),
            AnyView::Struct(v) => v.handle(),
            AnyView::Enumeration(v) => v.handle(),
        }
    }
}

impl Handle {
    /// Narrow to the view registered for the object's tag
    ///
    /// Tags without a view (BinaryData, ComplexNumber, Undefined) report
    /// `UnsupportedType`.
    pub fn narrow(&self) -> CoreResult<AnyView> {
        let tag = self.core_type()?;
        let capability = capability(tag).ok_or(CoreError::UnsupportedType(tag))?;
        debug!(core_type = %tag, view = capability.view, "narrowing handle");

        match tag {
            CoreType::Bool => self.query_as().map(AnyView::Bool),
            CoreType::Int => self.query_as().map(AnyView::Int),
            CoreType::Float => self.query_as().map(AnyView::Float),
            CoreType::String => self.query_as().map(AnyView::String),
            CoreType::List => self.query_as().map(AnyView::List),
            CoreType::Dict => self.query_as().map(AnyView::Dict),
            CoreType::Ratio => self.query_as().map(AnyView::Ratio),
            CoreType::Proc => self.query_as().map(AnyView::Proc),
            CoreType::Object => self.query_as().map(AnyView::Object),
            CoreType::Func => self.query_as().map(AnyView::Func),
            CoreType::Struct => self.query_as().map(AnyView::Struct),
            CoreType::Enumeration => self.query_as().map(AnyView::Enumeration),
            CoreType::BinaryData | CoreType::ComplexNumber | CoreType::Undefined => {
                Err(CoreError::UnsupportedType(tag))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_viewable_tags() {
        assert_eq!(supported_types().len(), 12);
        for tag in [CoreType::BinaryData, CoreType::ComplexNumber, CoreType::Undefined] {
            assert!(capability(tag).is_none());
        }

        let int = capability(CoreType::Int).unwrap();
        assert_eq!(int.interface, InterfaceId::INTEGER);
        assert_eq!(int.view, "IntegerView");
        assert_eq!(capability(CoreType::Object).unwrap().view, "Object");
    }
}

//! Core type tags reported by every native object

use std::fmt;

use coretypes_runtime::core_type as raw;

/// Declared kind of a native object
///
/// Numeric values follow the native ABI. The tag is set once at construction
/// and is advisory; capability checks happen at query time.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoreType {
    Bool = raw::BOOL,
    Int = raw::INT,
    Float = raw::FLOAT,
    String = raw::STRING,
    List = raw::LIST,
    Dict = raw::DICT,
    Ratio = raw::RATIO,
    /// Callable without a return value
    Proc = raw::PROC,
    /// Generic, untyped object
    Object = raw::OBJECT,
    BinaryData = raw::BINARY_DATA,
    /// Callable with a return value
    Func = raw::FUNC,
    ComplexNumber = raw::COMPLEX_NUMBER,
    Struct = raw::STRUCT,
    Enumeration = raw::ENUMERATION,
    /// Tag could not be resolved
    Undefined = raw::UNDEFINED,
}

impl CoreType {
    pub const ALL: [CoreType; 15] = [
        CoreType::Bool,
        CoreType::Int,
        CoreType::Float,
        CoreType::String,
        CoreType::List,
        CoreType::Dict,
        CoreType::Ratio,
        CoreType::Proc,
        CoreType::Object,
        CoreType::BinaryData,
        CoreType::Func,
        CoreType::ComplexNumber,
        CoreType::Struct,
        CoreType::Enumeration,
        CoreType::Undefined,
    ];

    /// Map a native tag; unknown values become `Undefined`
    pub const fn from_raw(value: u32) -> Self {
        match value {
            raw::BOOL => CoreType::Bool,
            raw::INT => CoreType::Int,
            raw::FLOAT => CoreType::Float,
            raw::STRING => CoreType::String,
            raw::LIST => CoreType::List,
            raw::DICT => CoreType::Dict,
            raw::RATIO => CoreType::Ratio,
            raw::PROC => CoreType::Proc,
            raw::OBJECT => CoreType::Object,
            raw::BINARY_DATA => CoreType::BinaryData,
            raw::FUNC => CoreType::Func,
            raw::COMPLEX_NUMBER => CoreType::ComplexNumber,
            raw::STRUCT => CoreType::Struct,
            raw::ENUMERATION => CoreType::Enumeration,
            _ => CoreType::Undefined,
        }
    }

    #[inline]
    pub const fn as_raw(self) -> u32 {
        self as u32
    }

    pub const fn name(self) -> &'static str {
        match self {
            CoreType::Bool => "Bool",
            CoreType::Int => "Int",
            CoreType::Float => "Float",
            CoreType::String => "String",
            CoreType::List => "List",
            CoreType::Dict => "Dict",
            CoreType::Ratio => "Ratio",
            CoreType::Proc => "Proc",
            CoreType::Object => "Object",
            CoreType::BinaryData => "BinaryData",
            CoreType::Func => "Func",
            CoreType::ComplexNumber => "ComplexNumber",
            CoreType::Struct => "Struct",
            CoreType::Enumeration => "Enumeration",
            CoreType::Undefined => "Undefined",
        }
    }
}

impl From<u32> for CoreType {
    fn from(value: u32) -> Self {
        Self::from_raw(value)
    }
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

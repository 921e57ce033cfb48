//! Struct and Enumeration views

use std::ptr;

use coretypes_runtime::abi::{EnumerationVTable, InterfaceId, StructVTable};

use crate::error::{check, CoreResult};
use crate::factory::create_string;
use crate::handle::Handle;
use crate::view::{define_view, owned_result};

use super::containers::{DictView, ListView};
use super::string::read_string;

define_view!(
    /// View over an immutable Struct object
    StructView,
    StructVTable,
    InterfaceId::STRUCT
);

define_view!(
    /// View over an Enumeration value
    EnumerationView,
    EnumerationVTable,
    InterfaceId::ENUMERATION
);

impl StructView {
    pub fn type_name(&self) -> CoreResult<String> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_type_name)(raw, &mut out) }, "struct_get_type_name")?;
        read_string(&owned_result(out, "struct_get_type_name")?)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> CoreResult<Vec<String>> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_field_names)(raw, &mut out) }, "struct_get_field_names")?;
        owned_result(out, "struct_get_field_names")?
            .query_as::<ListView>()?
            .iter()?
            .map(|name| read_string(&name?))
            .collect()
    }

    pub fn field_values(&self) -> CoreResult<Vec<Handle>> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_field_values)(raw, &mut out) }, "struct_get_field_values")?;
        owned_result(out, "struct_get_field_values")?.query_as::<ListView>()?.to_vec()
    }

    /// Value of field `name`; an unknown field reports `NOTFOUND`
    pub fn get(&self, name: &str) -> CoreResult<Handle> {
        let raw = self.raw()?;
        let name = create_string(name)?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get)(raw, name.raw()?, &mut out) }, "struct_get")?;
        owned_result(out, "struct_get")
    }

    pub fn has_field(&self, name: &str) -> CoreResult<bool> {
        let raw = self.raw()?;
        let name = create_string(name)?;
        let mut out = false;
        check(unsafe { (self.table.has_field)(raw, name.raw()?, &mut out) }, "struct_has_field")?;
        Ok(out)
    }

    /// Fields as a new Dict keyed by name
    pub fn as_dictionary(&self) -> CoreResult<DictView> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_as_dictionary)(raw, &mut out) }, "struct_get_as_dictionary")?;
        owned_result(out, "struct_get_as_dictionary")?.query_as::<DictView>()
    }
}

impl EnumerationView {
    pub fn type_name(&self) -> CoreResult<String> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_type_name)(raw, &mut out) }, "enumeration_get_type_name")?;
        read_string(&owned_result(out, "enumeration_get_type_name")?)
    }

    /// Name of the enumerator
    pub fn value(&self) -> CoreResult<String> {
        let raw = self.raw()?;
        let mut out = ptr::null_mut();
        check(unsafe { (self.table.get_value)(raw, &mut out) }, "enumeration_get_value")?;
        read_string(&owned_result(out, "enumeration_get_value")?)
    }

    pub fn int_value(&self) -> CoreResult<i64> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_int_value)(raw, &mut out) }, "enumeration_get_int_value")?;
        Ok(out)
    }
}

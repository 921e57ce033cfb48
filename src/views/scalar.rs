//! Bool, Integer, Float and Ratio views

use coretypes_runtime::abi::{BoolVTable, FloatVTable, IntegerVTable, InterfaceId, RatioVTable};

use crate::error::{check, CoreResult};
use crate::view::define_view;

define_view!(
    /// View over a Bool object
    BoolView,
    BoolVTable,
    InterfaceId::BOOLEAN
);

define_view!(
    /// View over an Int object
    IntegerView,
    IntegerVTable,
    InterfaceId::INTEGER
);

define_view!(
    /// View over a Float object
    FloatView,
    FloatVTable,
    InterfaceId::FLOAT
);

define_view!(
    /// View over a Ratio object
    RatioView,
    RatioVTable,
    InterfaceId::RATIO
);

impl BoolView {
    pub fn value(&self) -> CoreResult<bool> {
        let raw = self.raw()?;
        let mut out = false;
        check(unsafe { (self.table.get_value)(raw, &mut out) }, "bool_get_value")?;
        Ok(out)
    }

    pub fn equals_value(&self, value: bool) -> CoreResult<bool> {
        let raw = self.raw()?;
        let mut out = false;
        check(unsafe { (self.table.equals_value)(raw, value, &mut out) }, "bool_equals_value")?;
        Ok(out)
    }
}

impl IntegerView {
    pub fn value(&self) -> CoreResult<i64> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_value)(raw, &mut out) }, "integer_get_value")?;
        Ok(out)
    }

    pub fn equals_value(&self, value: i64) -> CoreResult<bool> {
        let raw = self.raw()?;
        let mut out = false;
        check(unsafe { (self.table.equals_value)(raw, value, &mut out) }, "integer_equals_value")?;
        Ok(out)
    }
}

impl FloatView {
    pub fn value(&self) -> CoreResult<f64> {
        let raw = self.raw()?;
        let mut out = 0.0;
        check(unsafe { (self.table.get_value)(raw, &mut out) }, "float_get_value")?;
        Ok(out)
    }

    /// Numeric equality (`NaN` never compares equal)
    pub fn equals_value(&self, value: f64) -> CoreResult<bool> {
        let raw = self.raw()?;
        let mut out = false;
        check(unsafe { (self.table.equals_value)(raw, value, &mut out) }, "float_equals_value")?;
        Ok(out)
    }
}

impl RatioView {
    pub fn numerator(&self) -> CoreResult<i64> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_numerator)(raw, &mut out) }, "ratio_get_numerator")?;
        Ok(out)
    }

    pub fn denominator(&self) -> CoreResult<i64> {
        let raw = self.raw()?;
        let mut out = 0;
        check(unsafe { (self.table.get_denominator)(raw, &mut out) }, "ratio_get_denominator")?;
        Ok(out)
    }
}

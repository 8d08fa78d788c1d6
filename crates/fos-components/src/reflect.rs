//! Attribute reflection
//!
//! A reflected property keeps one authoritative value in memory and treats
//! the host attribute as a view of it. Writes go through
//! [`ReflectedProperty::set_if_changed`], so the attribute write a setter
//! makes comes back through `attribute_changed_callback` as a no-op and the
//! property/attribute cycle stops after one round.

use fos_dom::{DomResult, ElementContext};

use crate::Count;

/// A value that can live in an attribute
pub trait AttributeValue: Copy + PartialEq {
    /// Coerce an attribute string
    fn from_attribute(value: &str) -> Self;

    /// Canonical attribute string
    fn to_attribute(&self) -> String;

    /// Loose equality used by the change guard
    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

impl AttributeValue for Count {
    fn from_attribute(value: &str) -> Self {
        Count::parse(value)
    }

    fn to_attribute(&self) -> String {
        self.to_string()
    }

    /// `NaN` never equals itself
    fn same_as(&self, other: &Self) -> bool {
        !self.is_nan() && self == other
    }
}

/// Property mirrored into a host attribute
#[derive(Debug, Clone)]
pub struct ReflectedProperty<T> {
    attribute: &'static str,
    value: T,
}

impl<T: AttributeValue> ReflectedProperty<T> {
    pub fn new(attribute: &'static str, initial: T) -> Self {
        Self { attribute, value: initial }
    }

    pub fn get(&self) -> T {
        self.value
    }

    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    /// Store `value` and write it to the host attribute, unless it equals
    /// the current value. Returns whether anything changed.
    pub fn set_if_changed(&mut self, ctx: &mut ElementContext<'_>, value: T) -> DomResult<bool> {
        if value.same_as(&self.value) {
            return Ok(false);
        }
        self.value = value;
        ctx.set_host_attribute(self.attribute, &value.to_attribute())?;
        Ok(true)
    }

    /// Take an attribute change into the property. Returns whether the
    /// value changed.
    ///
    /// Removal leaves the value alone and writes it back, so the attribute
    /// is never missing once reactions settle. A string that coerces to a
    /// different canonical form is rewritten on the host.
    pub fn attribute_changed(
        &mut self,
        ctx: &mut ElementContext<'_>,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> DomResult<bool> {
        if old_value == new_value {
            return Ok(false);
        }
        let Some(raw) = new_value else {
            ctx.set_host_attribute(self.attribute, &self.value.to_attribute())?;
            return Ok(false);
        };

        let value = T::from_attribute(raw);
        let changed = !value.same_as(&self.value);
        self.value = value;

        let canonical = value.to_attribute();
        if canonical != raw {
            ctx.set_host_attribute(self.attribute, &canonical)?;
        }
        Ok(changed)
    }
}

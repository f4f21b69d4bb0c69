use super::{ItemHandle, ItemId};
use crate::error::RepositoryError;
use crate::session::store::ItemData;
use crate::session::Session;
use crate::value::{Binary, Decimal, PropertyValue, Value, ValueType};
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Handle to a property in a session
#[derive(Clone)]
pub struct Property {
    session: Session,
    id: ItemId,
}

impl Property {
    pub(crate) fn new(session: Session, id: ItemId) -> Self {
        Self { session, id }
    }

    /// Current content of the property.
    pub fn content(&self) -> Result<PropertyValue, RepositoryError> {
        let data = self.session.read().record(self.id)?.data.clone();
        match data {
            ItemData::Property(value) => Ok(value),
            ItemData::Node => Err(RepositoryError::ValueFormat(format!(
                "{} is not a property",
                self.path()
            ))),
        }
    }

    pub fn is_multiple(&self) -> Result<bool, RepositoryError> {
        self.content().map(|c| c.is_multiple())
    }

    /// The single value; fails for multi-valued properties.
    pub fn value(&self) -> Result<Value, RepositoryError> {
        match self.content()? {
            PropertyValue::Single(value) => Ok(value),
            PropertyValue::Multiple(_) => Err(RepositoryError::ValueFormat(format!(
                "{} is multi-valued",
                self.path()
            ))),
        }
    }

    /// All values; fails for single-valued properties.
    pub fn values(&self) -> Result<Vec<Value>, RepositoryError> {
        match self.content()? {
            PropertyValue::Multiple(values) => Ok(values),
            PropertyValue::Single(_) => Err(RepositoryError::ValueFormat(format!(
                "{} is single-valued",
                self.path()
            ))),
        }
    }

    pub fn set_value(&self, value: impl Into<PropertyValue>) -> Result<(), RepositoryError> {
        self.session.write().replace_value(self.id, value.into())
    }

    pub fn value_type(&self) -> Result<ValueType, RepositoryError> {
        self.content().map(|c| c.value_type())
    }

    pub fn get_string(&self) -> Result<String, RepositoryError> {
        self.value().map(|v| v.get_string())
    }

    pub fn get_long(&self) -> Result<i64, RepositoryError> {
        self.value()?.get_long()
    }

    pub fn get_double(&self) -> Result<f64, RepositoryError> {
        self.value()?.get_double()
    }

    pub fn get_decimal(&self) -> Result<Decimal, RepositoryError> {
        self.value()?.get_decimal()
    }

    pub fn get_boolean(&self) -> Result<bool, RepositoryError> {
        self.value()?.get_boolean()
    }

    pub fn get_date(&self) -> Result<DateTime<FixedOffset>, RepositoryError> {
        self.value()?.get_date()
    }

    pub fn get_binary(&self) -> Result<Binary, RepositoryError> {
        self.value()?.get_binary()
    }

    /// Length of the single value: byte size for binaries, character count otherwise.
    pub fn length(&self) -> Result<usize, RepositoryError> {
        self.value().map(|v| value_length(&v))
    }

    /// Lengths of each value of a multi-valued property.
    pub fn lengths(&self) -> Result<Vec<usize>, RepositoryError> {
        self.values()
            .map(|values| values.iter().map(value_length).collect())
    }
}

fn value_length(value: &Value) -> usize {
    match value {
        Value::Binary(binary) => binary.size(),
        other => other.get_string().chars().count(),
    }
}

impl ItemHandle for Property {
    fn session(&self) -> &Session {
        &self.session
    }

    fn id(&self) -> ItemId {
        self.id
    }

    fn is_node(&self) -> bool {
        false
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("path", &self.path())
            .finish()
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

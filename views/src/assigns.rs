use serde::Serialize;
use serde_json::Value;
use std::{
    borrow::Cow,
    collections::HashMap,
    ops::{Deref, DerefMut},
};

/**
Arbitrary key-value data for a page, exposed to templates as
`data`. Values are json so that anything serde-serializable can be
assigned.
*/
#[derive(Default, Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Assigns(HashMap<Cow<'static, str>, Value>);

impl Assigns {
    /// an empty set of assigns
    pub fn new() -> Self {
        Self::default()
    }

    /**
    Serializes `value` and stores it under `key`, replacing any
    previous value.
    */
    pub fn assign(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Serialize,
    ) -> Result<(), serde_json::Error> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }
}

impl Deref for Assigns {
    type Target = HashMap<Cow<'static, str>, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Assigns {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K, V> FromIterator<(K, V)> for Assigns
where
    K: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

//! Common serde helpers for Vapor API payloads

use serde::{Deserialize, Deserializer};

/// Laravel serializes some flags as booleans and others as 0/1 integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaporBool(pub bool);

impl<'de> Deserialize<'de> for VaporBool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum BoolOrInt {
            Bool(bool),
            Int(i64),
        }

        match BoolOrInt::deserialize(deserializer)? {
            BoolOrInt::Bool(b) => Ok(VaporBool(b)),
            BoolOrInt::Int(0) => Ok(VaporBool(false)),
            BoolOrInt::Int(_) => Ok(VaporBool(true)),
        }
    }
}

pub fn deserialize_vapor_bool_option<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<VaporBool>::deserialize(deserializer)?.map(|b| b.0))
}

/// Treats an explicit JSON null like a missing field
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn is_zero(value: &i64) -> bool {
    *value == 0
}

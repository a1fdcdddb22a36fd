use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Трейт для типов идентификаторов агрегатов
///
/// Все записи адресуются автоинкрементным `i64`, который назначает хранилище.
pub trait AggregateId:
    Clone + Copy + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Числовое значение первичного ключа
    fn value(&self) -> i64;

    /// Обернуть значение первичного ключа
    fn from_value(value: i64) -> Self;

    /// Преобразовать ID в строку
    fn as_string(&self) -> String {
        self.value().to_string()
    }

    /// Создать ID из строки
    fn from_string(s: &str) -> Result<Self, String> {
        s.trim()
            .parse::<i64>()
            .map(Self::from_value)
            .map_err(|e| format!("Invalid id: {}", e))
    }
}

/// Declares a transparent `i64` newtype implementing [`AggregateId`].
#[macro_export]
macro_rules! aggregate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl $crate::domain::common::AggregateId for $name {
            fn value(&self) -> i64 {
                self.0
            }

            fn from_value(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::AggregateId;

    crate::aggregate_id!(SampleId);

    #[test]
    fn test_from_string() {
        assert_eq!(SampleId::from_string(" 42 ").unwrap(), SampleId(42));
        assert!(SampleId::from_string("abc").is_err());
        assert_eq!(SampleId(7).as_string(), "7");
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&SampleId(5)).unwrap();
        assert_eq!(json, "5");
    }
}

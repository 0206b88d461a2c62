//! Convert serde_json::Value to a type sqlx can bind against SQLite.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::Database;

/// A value that can be bound to a SQLite statement. Arrays and objects are stored as JSON text.
#[derive(Clone, Debug, PartialEq)]
pub enum SqliteBindValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&Value> for SqliteBindValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => SqliteBindValue::Null,
            Value::Bool(b) => SqliteBindValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqliteBindValue::Integer(i),
                None => SqliteBindValue::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => SqliteBindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => SqliteBindValue::Text(v.to_string()),
        }
    }
}

impl<'q> Encode<'q, Sqlite> for SqliteBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self {
            SqliteBindValue::Null => Ok(IsNull::Yes),
            SqliteBindValue::Bool(b) => <bool as Encode<'q, Sqlite>>::encode_by_ref(b, buf),
            SqliteBindValue::Integer(n) => <i64 as Encode<'q, Sqlite>>::encode_by_ref(n, buf),
            SqliteBindValue::Real(n) => <f64 as Encode<'q, Sqlite>>::encode_by_ref(n, buf),
            SqliteBindValue::Text(s) => <String as Encode<'q, Sqlite>>::encode_by_ref(s, buf),
        }
    }
}

impl sqlx::Type<Sqlite> for SqliteBindValue {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }

    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_map_to_storage_classes() {
        assert_eq!(SqliteBindValue::from(&json!(null)), SqliteBindValue::Null);
        assert_eq!(SqliteBindValue::from(&json!(true)), SqliteBindValue::Bool(true));
        assert_eq!(SqliteBindValue::from(&json!(42)), SqliteBindValue::Integer(42));
        assert_eq!(SqliteBindValue::from(&json!(2.35)), SqliteBindValue::Real(2.35));
        assert_eq!(SqliteBindValue::from(&json!("Paris")), SqliteBindValue::Text("Paris".into()));
    }

    #[test]
    fn nested_values_become_json_text() {
        assert_eq!(
            SqliteBindValue::from(&json!({"a": [1, 2]})),
            SqliteBindValue::Text(r#"{"a":[1,2]}"#.into())
        );
    }

    #[test]
    fn large_unsigned_falls_back_to_real() {
        let v = SqliteBindValue::from(&json!(u64::MAX));
        assert!(matches!(v, SqliteBindValue::Real(_)));
    }
}

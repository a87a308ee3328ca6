//! Typed query description shared by every [`crate::store::MetricStore`].
//!
//! Columns are a closed set of marker types, so a filter on `vault` only
//! accepts an `i64` and an update can never target the primary key.

use chrono::NaiveDateTime;

use crate::models::PlayerMetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    PlayerUuid,
    PlayerName,
    Papi,
    Vault,
    Rank,
    CreateTime,
    UpdateTime,
}

impl Field {
    pub fn as_column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::PlayerUuid => "player_uuid",
            Self::PlayerName => "player_name",
            Self::Papi => "papi",
            Self::Vault => "vault",
            Self::Rank => "rank",
            Self::CreateTime => "create_time",
            Self::UpdateTime => "update_time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    Int(i32),
    BigInt(i64),
    Text(String),
    Timestamp(NaiveDateTime),
    Null,
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

mod private {
    pub trait Sealed {}
}

/// A column of `top_papi_player` together with the Rust type it holds.
pub trait Column: private::Sealed + Copy {
    const FIELD: Field;
    type Value: Into<Value>;
}

/// Columns that may appear on the left side of an update.
pub trait Assignable: Column {}

pub mod columns {
    use chrono::NaiveDateTime;

    use super::{Assignable, Column, Field, private::Sealed};

    macro_rules! column {
        ($name:ident, $field:ident, $ty:ty) => {
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Sealed for $name {}

            impl Column for $name {
                const FIELD: Field = Field::$field;
                type Value = $ty;
            }
        };
        ($name:ident, $field:ident, $ty:ty, assignable) => {
            column!($name, $field, $ty);

            impl Assignable for $name {}
        };
    }

    column!(Id, Id, i32);
    column!(PlayerUuid, PlayerUuid, String, assignable);
    column!(PlayerName, PlayerName, String, assignable);
    column!(Papi, Papi, String, assignable);
    column!(Vault, Vault, i64, assignable);
    column!(Rank, Rank, i32, assignable);
    column!(CreateTime, CreateTime, NaiveDateTime, assignable);
    column!(UpdateTime, UpdateTime, NaiveDateTime, assignable);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Field, Value),
    In(Field, Vec<Value>),
}

impl Condition {
    pub fn field(&self) -> Field {
        match self {
            Self::Eq(field, _) | Self::In(field, _) => *field,
        }
    }

    pub fn matches(&self, record: &PlayerMetric) -> bool {
        let actual = record.field_value(self.field());
        match self {
            Self::Eq(_, expected) => &actual == expected,
            Self::In(_, candidates) => candidates.contains(&actual),
        }
    }
}

/// Conjunction of conditions. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq<C: Column>(mut self, _column: C, value: impl Into<C::Value>) -> Self {
        let value: C::Value = value.into();
        self.conditions.push(Condition::Eq(C::FIELD, value.into()));
        self
    }

    pub fn is_in<C, I>(mut self, _column: C, values: I) -> Self
    where
        C: Column,
        I: IntoIterator,
        I::Item: Into<C::Value>,
    {
        let values: Vec<Value> = values
            .into_iter()
            .map(|v| {
                let v: C::Value = v.into();
                v.into()
            })
            .collect();
        self.conditions.push(Condition::In(C::FIELD, values));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, record: &PlayerMetric) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub field: Field,
    pub direction: Direction,
}

impl Order {
    pub fn asc<C: Column>(_column: C) -> Self {
        Self {
            field: C::FIELD,
            direction: Direction::Asc,
        }
    }

    pub fn desc<C: Column>(_column: C) -> Self {
        Self {
            field: C::FIELD,
            direction: Direction::Desc,
        }
    }
}

/// 1-based page. Page 0 is read as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments {
    values: Vec<(Field, Value)>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<C: Assignable>(mut self, _column: C, value: impl Into<C::Value>) -> Self {
        let value: C::Value = value.into();
        self.values.push((C::FIELD, value.into()));
        self
    }

    pub fn values(&self) -> &[(Field, Value)] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn apply(&self, record: &mut PlayerMetric) {
        for (field, value) in &self.values {
            record.assign(*field, value.clone());
        }
    }
}

impl PlayerMetric {
    pub fn field_value(&self, field: Field) -> Value {
        match field {
            Field::Id => Value::Int(self.id),
            Field::PlayerUuid => Value::Text(self.player_uuid.clone()),
            Field::PlayerName => Value::Text(self.player_name.clone()),
            Field::Papi => Value::Text(self.papi.clone()),
            Field::Vault => Value::BigInt(self.vault),
            Field::Rank => Value::Int(self.rank),
            Field::CreateTime => self.create_time.into(),
            Field::UpdateTime => self.update_time.into(),
        }
    }

    fn assign(&mut self, field: Field, value: Value) {
        match (field, value) {
            (Field::PlayerUuid, Value::Text(v)) => self.player_uuid = v,
            (Field::PlayerName, Value::Text(v)) => self.player_name = v,
            (Field::Papi, Value::Text(v)) => self.papi = v,
            (Field::Vault, Value::BigInt(v)) => self.vault = v,
            (Field::Rank, Value::Int(v)) => self.rank = v,
            (Field::CreateTime, Value::Timestamp(v)) => self.create_time = Some(v),
            (Field::UpdateTime, Value::Timestamp(v)) => self.update_time = Some(v),
            // Typed builders never produce any other pairing.
            _ => {}
        }
    }
}

//! # Typed Query Filters
//!
//! Equality-predicate builder for repository queries.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Filter Construction                              │
//! │                                                                         │
//! │  Filter::where_eq(UserColumn::Credentials, "jdoe")                     │
//! │        .or_eq(UserColumn::Email, "jdoe@example.com")                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... FROM users WHERE credentials = ? OR email = ?              │
//! │                                   │              │                      │
//! │                                bind #1        bind #2                   │
//! │                                                                         │
//! │  Column names come from closed per-table enums, never from caller      │
//! │  strings, so a filter can only ever reference real columns. Values     │
//! │  are always bound parameters, never interpolated.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only equality predicates chained with AND/OR are supported; that is the
//! whole query surface the management screens need.

use sqlx::{QueryBuilder, Sqlite};

// =============================================================================
// Column Enums
// =============================================================================

/// A closed set of queryable columns for one table.
pub trait FilterColumn: Copy {
    /// The column identifier as it appears in the schema.
    fn column_name(self) -> &'static str;
}

/// Queryable columns of the `addresses` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressColumn {
    Id,
    ZipCode,
    City,
}

impl FilterColumn for AddressColumn {
    fn column_name(self) -> &'static str {
        match self {
            AddressColumn::Id => "id",
            AddressColumn::ZipCode => "zip_code",
            AddressColumn::City => "city",
        }
    }
}

/// Queryable columns of the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Id,
    Credentials,
    Email,
}

impl FilterColumn for UserColumn {
    fn column_name(self) -> &'static str {
        match self {
            UserColumn::Id => "id",
            UserColumn::Credentials => "credentials",
            UserColumn::Email => "email",
        }
    }
}

/// Queryable columns of the `roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleColumn {
    Id,
    Name,
}

impl FilterColumn for RoleColumn {
    fn column_name(self) -> &'static str {
        match self {
            RoleColumn::Id => "id",
            RoleColumn::Name => "name",
        }
    }
}

/// Queryable columns of the `stores` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreColumn {
    Id,
    AddressId,
    ManagerId,
}

impl FilterColumn for StoreColumn {
    fn column_name(self) -> &'static str {
        match self {
            StoreColumn::Id => "id",
            StoreColumn::AddressId => "address_id",
            StoreColumn::ManagerId => "manager_id",
        }
    }
}

// =============================================================================
// Filter Values
// =============================================================================

/// A bindable comparison value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Integer(value as i64)
    }
}

// =============================================================================
// Filter
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

/// An equality-predicate chain over one table's columns.
///
/// ## Example
/// ```rust,ignore
/// let filter = Filter::where_eq(UserColumn::Credentials, login)
///     .or_eq(UserColumn::Email, login);
/// let matches = db.users().query(&filter).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Filter<C: FilterColumn> {
    clauses: Vec<(Connective, C, FilterValue)>,
}

impl<C: FilterColumn> Filter<C> {
    /// Starts a filter with a first equality clause.
    pub fn where_eq(column: C, value: impl Into<FilterValue>) -> Self {
        Filter {
            clauses: vec![(Connective::And, column, value.into())],
        }
    }

    /// Adds an AND-joined equality clause.
    pub fn and_eq(mut self, column: C, value: impl Into<FilterValue>) -> Self {
        self.clauses.push((Connective::And, column, value.into()));
        self
    }

    /// Adds an OR-joined equality clause.
    pub fn or_eq(mut self, column: C, value: impl Into<FilterValue>) -> Self {
        self.clauses.push((Connective::Or, column, value.into()));
        self
    }

    /// Appends this filter as a WHERE clause with bound parameters.
    ///
    /// Column names are pushed as raw SQL (they come from the closed
    /// [`FilterColumn`] enums); values always go through `push_bind`.
    pub(crate) fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        for (i, (connective, column, value)) in self.clauses.iter().enumerate() {
            if i == 0 {
                builder.push(" WHERE ");
            } else {
                builder.push(match connective {
                    Connective::And => " AND ",
                    Connective::Or => " OR ",
                });
            }

            builder.push(column.column_name());
            builder.push(" = ");
            match value {
                FilterValue::Text(text) => builder.push_bind(text.clone()),
                FilterValue::Integer(number) => builder.push_bind(*number),
            };
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

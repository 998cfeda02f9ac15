//! Identity values and metadata existence checks.
//!
//! The dialect decides which query fetches the next identity value; this
//! module binds it and hands it to the external connection layer through
//! the [`Executor`] seam.

use tracing::debug;

use crate::binder::{BoundCommand, ParameterBinder};
use crate::dialect::Dialect;
use crate::error::{DaoError, Result};
use crate::query::Query;

/// Runs bound commands that return a single integer.
///
/// Implemented by the host's connection layer. Transient failures are the
/// implementor's business; report what remains as [`DaoError::Backend`].
pub trait Executor {
    /// Executes `command` and returns the first column of the first row.
    ///
    /// # Errors
    ///
    /// Returns [`DaoError::Backend`] if the backend fails.
    fn query_int(&self, command: &BoundCommand) -> Result<i64>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn query_int(&self, command: &BoundCommand) -> Result<i64> {
        (**self).query_int(command)
    }
}

/// Checks that `name` is a plain, optionally owner-qualified identifier
/// that can be spliced into SQL text.
///
/// # Errors
///
/// Returns [`DaoError::MalformedSequenceName`] for empty names, empty
/// segments, or characters outside `[A-Za-z0-9_$#.]`.
pub fn validate_sequence_name(name: &str) -> Result<&str> {
    let malformed = |reason| DaoError::MalformedSequenceName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(malformed("name is empty"));
    }
    if name.split('.').any(str::is_empty) {
        return Err(malformed("empty name segment"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#' | '.'))
    {
        return Err(malformed("only letters, digits, '_', '$', '#' and '.' are allowed"));
    }
    Ok(name)
}

/// Splits a compound `OWNER.TABLE` name.
///
/// # Errors
///
/// Returns [`DaoError::MalformedSequenceName`] unless the name has exactly
/// two non-empty parts.
pub fn split_owner_table(name: &str) -> Result<(&str, &str)> {
    let mut parts = name.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(table), None) if !owner.is_empty() && !table.is_empty() => {
            Ok((owner, table))
        }
        _ => Err(DaoError::MalformedSequenceName {
            name: name.to_string(),
            reason: "expected OWNER.TABLE",
        }),
    }
}

/// Drops an `owner.` qualifier, if present.
#[must_use]
pub fn strip_owner(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, bare)| bare)
}

/// Fetches identity values and checks metadata through an [`Executor`].
#[derive(Debug)]
pub struct SequenceResolver<'d, D: Dialect + ?Sized> {
    dialect: &'d D,
}

impl<'d, D: Dialect + ?Sized> SequenceResolver<'d, D> {
    /// Creates a resolver for `dialect`.
    #[must_use]
    pub const fn new(dialect: &'d D) -> Self {
        Self { dialect }
    }

    fn run(&self, executor: &impl Executor, query: Query) -> Result<i64> {
        let command = ParameterBinder::new(self.dialect).bind_query(query)?;
        debug!(
            dialect = self.dialect.name(),
            sql = %command.sql,
            "issuing identity query"
        );
        executor.query_int(&command)
    }

    /// Returns the next value of `sequence`.
    ///
    /// # Errors
    ///
    /// Fails if the dialect rejects the name or the executor fails.
    pub fn next_value(&self, executor: &impl Executor, sequence: &str) -> Result<i64> {
        let query = self.dialect.sequence_value_query(sequence)?;
        self.run(executor, query)
    }

    /// Returns true if a table called `name` exists. Any owner qualifier is
    /// ignored, as is case.
    ///
    /// # Errors
    ///
    /// Fails if the executor fails.
    pub fn table_exists(&self, executor: &impl Executor, name: &str) -> Result<bool> {
        let query = self.dialect.table_exists_query(strip_owner(name));
        Ok(self.run(executor, query)? > 0)
    }

    /// Returns true if a sequence called `name` exists. Any owner qualifier
    /// is ignored, as is case.
    ///
    /// # Errors
    ///
    /// Fails if the executor fails.
    pub fn sequence_exists(&self, executor: &impl Executor, name: &str) -> Result<bool> {
        let query = self.dialect.sequence_exists_query(strip_owner(name));
        Ok(self.run(executor, query)? > 0)
    }
}

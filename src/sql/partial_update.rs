use super::error::SqlError;
use super::types::SqlValue;

/// A field of an entity that can be assigned in an UPDATE.
///
/// Each implementor is an enum of the entity's updatable fields, so the
/// logical-name to column mapping is fixed at compile time and no name can
/// reach the SQL text without going through it.
pub trait Column: Copy {
    fn column(self) -> &'static str;
}

/// SET clause body and the values for its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub set_cols: String,
    pub values: Vec<SqlValue>,
}

impl SetClause {
    /// Placeholder for the first parameter after the assignments
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}

/// Generate the SET clause for a partial update.
///
/// `[(FirstName, "Aliya"), (Age, 32)]` becomes `"first_name"=$1, "age"=$2`
/// with values `["Aliya", 32]`. Fails with [`SqlError::NoData`] when there
/// is nothing to assign.
pub fn sql_for_partial_update<C: Column>(
    data: impl IntoIterator<Item = (C, SqlValue)>,
) -> Result<SetClause, SqlError> {
    let (cols, values): (Vec<String>, Vec<SqlValue>) = data
        .into_iter()
        .enumerate()
        .map(|(idx, (field, value))| (format!("\"{}\"=${}", field.column(), idx + 1), value))
        .unzip();

    if cols.is_empty() {
        return Err(SqlError::NoData);
    }

    Ok(SetClause {
        set_cols: cols.join(", "),
        values,
    })
}

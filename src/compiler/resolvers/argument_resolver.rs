use serde_json::Value;

use crate::compiler::{ColumnRef, CompileContext, Operand, QueryError, ResolvedTable, Result};
use crate::template::{Argument, ArgumentType};

pub struct ArgumentResolver;

impl ArgumentResolver {
    /// Turn an argument into a bound column, a scalar, or a list.
    pub fn evaluate(arg: &Argument, ctx: &CompileContext) -> Result<Operand> {
        arg.validate()?;
        match arg.kind {
            ArgumentType::Scalar => Ok(Operand::Scalar(arg.value.clone())),
            ArgumentType::List => match &arg.value {
                Value::Array(items) => Ok(Operand::List(items.clone())),
                _ => Err(QueryError::validation("a 'list' argument value must be an array")),
            },
            ArgumentType::Column => {
                let reference = arg
                    .table
                    .as_ref()
                    .ok_or_else(|| QueryError::validation("a 'column' argument requires a table"))?;
                let column = arg
                    .value
                    .as_str()
                    .ok_or_else(|| QueryError::validation("a 'column' argument value must be a column name"))?;
                let table = ctx.table(reference)?;
                Self::column(table, column).map(Operand::Column)
            }
        }
    }

    pub fn column(table: &ResolvedTable, column: &str) -> Result<ColumnRef> {
        let info = table.descriptor.column(column).ok_or_else(|| QueryError::UnknownColumn {
            table: table.key.clone(),
            column: column.to_string(),
            candidates: table.descriptor.column_names(),
        })?;
        Ok(ColumnRef { table: table.key.clone(), column: column.to_string(), ty: info.ty, nullable: info.nullable })
    }

    /// Every column of a table, in schema order.
    pub fn all_columns(table: &ResolvedTable) -> Vec<ColumnRef> {
        table
            .descriptor
            .columns
            .iter()
            .map(|(name, info)| ColumnRef {
                table: table.key.clone(),
                column: name.clone(),
                ty: info.ty,
                nullable: info.nullable,
            })
            .collect()
    }
}

//! Storage mapping for the `Product` entity.
//!
//! The mapping is plain metadata: the Postgres store renders its SQL from it and
//! the in-memory store uses it to reject rows the database would reject.

use crate::domain::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    VarChar(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

/// Declarative description of a single table.
///
/// `columns` is ordered: the primary key comes first, and the rendered
/// statements bind parameters in this order.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub table_name: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [ColumnSpec],
}

pub const PRODUCTS: TableSpec = TableSpec {
    table_name: "Products",
    primary_key: "Id",
    columns: &[
        ColumnSpec {
            name: "Id",
            col_type: ColumnType::Uuid,
            nullable: false,
        },
        ColumnSpec {
            name: "Name",
            col_type: ColumnType::VarChar(200),
            nullable: false,
        },
    ],
};

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

pub fn column_type_to_sql(t: &ColumnType) -> String {
    match t {
        ColumnType::Uuid => "UUID".to_string(),
        ColumnType::VarChar(len) => format!("VARCHAR({})", len),
    }
}

impl TableSpec {
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn quoted_table(&self) -> String {
        quote(self.table_name)
    }

    fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| quote(c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn non_key_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(move |c| c.name != self.primary_key)
    }

    pub fn create_table_sql(&self) -> String {
        let mut defs: Vec<String> = Vec::with_capacity(self.columns.len());
        for c in self.columns {
            let mut def = format!("{} {}", quote(c.name), column_type_to_sql(&c.col_type));
            if c.name == self.primary_key {
                def.push_str(" PRIMARY KEY");
            } else if !c.nullable {
                def.push_str(" NOT NULL");
            }
            defs.push(def);
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.quoted_table(),
            defs.join(",\n    ")
        )
    }

    pub fn select_all_sql(&self) -> String {
        format!("SELECT {} FROM {}", self.column_list(), self.quoted_table())
    }

    pub fn select_by_key_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.column_list(),
            self.quoted_table(),
            quote(self.primary_key)
        )
    }

    pub fn insert_sql(&self) -> String {
        let placeholders: Vec<String> = (1..=self.columns.len()).map(|i| format!("${}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.quoted_table(),
            self.column_list(),
            placeholders.join(", ")
        )
    }

    /// `$1` is the primary key, the remaining columns follow in declaration order.
    pub fn update_by_key_sql(&self) -> String {
        let assignments: Vec<String> = self
            .non_key_columns()
            .enumerate()
            .map(|(idx, c)| format!("{} = ${}", quote(c.name), idx + 2))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = $1",
            self.quoted_table(),
            assignments.join(", "),
            quote(self.primary_key)
        )
    }

    pub fn delete_by_key_sql(&self) -> String {
        format!(
            "DELETE FROM {} WHERE {} = $1",
            self.quoted_table(),
            quote(self.primary_key)
        )
    }

    /// Checks a text value against the named column's nullability and length.
    pub fn check_text(&self, column: &str, value: Option<&str>) -> anyhow::Result<()> {
        let spec = self
            .column(column)
            .ok_or_else(|| anyhow::anyhow!("Unknown column {}.{}", self.table_name, column))?;
        match value {
            None if !spec.nullable => Err(anyhow::anyhow!(
                "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                spec.name,
                self.table_name
            )),
            None => Ok(()),
            Some(v) => match spec.col_type {
                ColumnType::VarChar(max) if v.chars().count() > max => Err(anyhow::anyhow!(
                    "value too long for type character varying({}) in column \"{}\"",
                    max,
                    spec.name
                )),
                _ => Ok(()),
            },
        }
    }
}

/// Applies the `Products` storage constraints to a product.
pub fn enforce(product: &Product) -> anyhow::Result<()> {
    PRODUCTS.check_text("Name", Some(&product.name))
}

//! The `Product` entity and its request payload.

use crate::domain::schema::PRODUCTS;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

pub const NAME_REQUIRED: &str = "The Name field is required.";
pub const NAME_TOO_LONG: &str = "The field Name must be a string with a maximum length of 200.";

/// A stored product. Rows of the `Products` table map one-to-one onto this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
}

/// Body accepted by `POST /product` and `PUT /product/{id}`.
///
/// `id` may be omitted on create; the server then generates one. On update the
/// path id wins over anything sent here.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(
        required(message = "The Name field is required."),
        length(max = 200, message = "The field Name must be a string with a maximum length of 200.")
    )]
    pub name: Option<String>,
}

impl ProductPayload {
    /// Validates the payload and returns a field -> messages map on failure.
    ///
    /// A present but blank name counts as missing.
    pub fn check(&self) -> Result<(), BTreeMap<String, Vec<String>>> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            let mut err = ValidationError::new("required");
            err.message = Some(Cow::Borrowed(NAME_REQUIRED));
            errors.add("name", err);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(field_messages(&errors))
        }
    }

    /// Builds the entity for an insert. A missing or nil id is replaced by a new v4 id.
    ///
    /// Call only after `check` succeeded.
    pub fn into_new_product(self) -> Product {
        let id = match self.id {
            Some(id) if !id.is_nil() => id,
            _ => Uuid::new_v4(),
        };
        Product {
            id,
            name: self.name.unwrap_or_default(),
        }
    }

    /// Builds the full replacement for an existing row.
    pub fn into_replacement(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name.unwrap_or_default(),
        }
    }
}

/// Maps a payload field to the member name clients see in validation problems,
/// which is the mapped column name (`name` -> `Name`).
fn member_name(field: &str) -> String {
    PRODUCTS
        .columns
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(field))
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| field.to_string())
}

pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect::<Vec<_>>();
        out.entry(member_name(&field)).or_default().extend(messages);
    }
    out
}

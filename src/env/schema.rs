use std::collections::HashMap;

use super::error::DeclarationError;
use super::field::Field;

/// The fields declared by a namespace type, keyed by bound name.
///
/// Built once per namespace type and shared by every instance of it.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new schema builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for a [`Schema`].
///
/// Each field is bound to its name here, exactly once.
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct SchemaBuilder {
    fields: Vec<(String, Field)>,
}

impl SchemaBuilder {
    /// Declares `field` under `name`.
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.push((name.into(), field.into()));
        self
    }

    /// Binds every field and validates the declaration.
    ///
    /// Fails on empty or duplicate names, and on allowed values that cannot
    /// be cast to the field's element type.
    pub fn build(self) -> Result<Schema, DeclarationError> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut index = HashMap::with_capacity(self.fields.len());

        for (position, (name, mut field)) in self.fields.into_iter().enumerate() {
            if name.is_empty() {
                return Err(DeclarationError::EmptyName(position));
            }
            if index.contains_key(&name) {
                return Err(DeclarationError::Duplicate(name));
            }

            let kind = field.kind().element();
            field
                .normalize_allowed()
                .map_err(|source| DeclarationError::AllowedValue {
                    variable: name.clone(),
                    kind,
                    source,
                })?;
            field.bind(name.clone());

            index.insert(name, fields.len());
            fields.push(field);
        }

        Ok(Schema { fields, index })
    }
}
